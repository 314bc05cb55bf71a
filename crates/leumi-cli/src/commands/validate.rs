//! Validate command - check previously extracted fields without calling
//! any service.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::info;

use leumi_core::extraction::parse_response;
use leumi_core::{ClaimValidator, FieldSchema};

use super::config::load_config;
use super::output::{format_result, OutputFormat};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// JSON file with extracted fields (as returned by the language model)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Date treated as today for plausibility checks (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Exit with an error status when the record has error-level issues
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let raw = fs::read_to_string(&args.input)?;
    let schema = FieldSchema::national_insurance();
    let fields = parse_response(&raw, &schema)?;
    info!("Loaded {} fields from {}", fields.len(), args.input.display());

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let validator = ClaimValidator::new(schema, config.validation, today);
    let result = validator.validate(&fields);

    println!("{}", format_result(&result, validator.schema(), args.format)?);

    if args.strict && result.has_errors() {
        eprintln!("{}", style(result.summary()).red());
        anyhow::bail!("{} validation errors", result.errors().count());
    }

    Ok(())
}
