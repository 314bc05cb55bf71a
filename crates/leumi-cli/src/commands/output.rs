//! Report rendering shared by the process, batch and validate commands.

use console::style;

use leumi_core::{FieldSchema, FieldValue, Severity, ValidationResult};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(
    result: &ValidationResult,
    schema: &FieldSchema,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result, schema),
        OutputFormat::Text => Ok(format_text(result, schema)),
    }
}

fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Present(v) => v.to_string(),
        FieldValue::Unparseable { raw } => format!("{} (unrecognized)", raw),
        FieldValue::Absent => String::new(),
    }
}

fn format_csv(result: &ValidationResult, schema: &FieldSchema) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(vec![]);

    wtr.write_record(["field", "label_en", "label_he", "value"])?;
    for (key, value) in result.record().iter() {
        let Some(def) = schema.get(key) else {
            continue;
        };
        wtr.write_record([
            key.as_str(),
            def.label.en,
            def.label.he,
            display_value(value).as_str(),
        ])?;
    }

    if !result.issues().is_empty() {
        wtr.write_record([""])?;
        wtr.write_record(["issue_field", "severity", "message"])?;
        for issue in result.issues() {
            wtr.write_record([
                issue.field.as_str(),
                issue.severity.to_string().as_str(),
                issue.message.as_str(),
            ])?;
        }
    }

    let score = format!("{:.4}", result.completeness_score());
    wtr.write_record(["completeness_score", score.as_str()])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(result: &ValidationResult, schema: &FieldSchema) -> String {
    let mut output = String::new();

    let width = schema
        .iter()
        .map(|def| def.label.en.chars().count())
        .max()
        .unwrap_or(0);

    output.push_str("Fields:\n");
    for (key, value) in result.record().iter() {
        let Some(def) = schema.get(key) else {
            continue;
        };
        let shown = match value {
            FieldValue::Absent => "-".to_string(),
            other => display_value(other),
        };
        output.push_str(&format!(
            "  {:<width$}  {}  {}\n",
            def.label.en,
            shown,
            style(format!("({})", def.label.he)).dim(),
            width = width
        ));
    }

    output.push('\n');
    if result.issues().is_empty() {
        output.push_str(&format!("{} No issues found\n", style("✓").green()));
    } else {
        output.push_str("Issues:\n");
        for issue in result.issues() {
            let marker = match issue.severity {
                Severity::Error => style("✗").red(),
                Severity::Warning => style("!").yellow(),
            };
            output.push_str(&format!("  {} {}: {}\n", marker, issue.field, issue.message));
        }
    }

    output.push_str(&format!(
        "\nCompleteness: {:.1}%\n",
        result.completeness_score() * 100.0
    ));

    output
}
