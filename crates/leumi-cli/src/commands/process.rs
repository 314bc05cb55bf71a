//! Process command - extract and validate a single claim form.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use leumi_core::ocr::content_type_for_extension;
use leumi_core::{
    AzureOpenAiExtractor, ClaimPipeline, ClaimValidator, DocumentIntelligenceClient, FieldSchema,
    LeumiConfig, ValidationResult,
};

use super::config::load_config;
use super::output::{format_result, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print validation issues to stderr
    #[arg(long)]
    show_issues: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let content_type = detect_content_type(&args.input)?;

    info!("Processing file: {}", args.input.display());

    let pipeline = Arc::new(build_pipeline(&config)?);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Analyzing document...");

    let data = fs::read(&args.input)?;
    let result = process_bytes(pipeline.clone(), data, content_type).await;

    match &result {
        Ok(_) => pb.finish_with_message("Done"),
        Err(_) => pb.finish_and_clear(),
    }
    let result = result?;

    if args.show_issues && !result.issues().is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in result.issues() {
            eprintln!("  - {}", issue);
        }
    }

    let output = format_result(&result, pipeline.schema(), args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Content type of a supported document, from its file extension.
pub fn detect_content_type(path: &Path) -> anyhow::Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    content_type_for_extension(&extension)
        .ok_or_else(|| anyhow::anyhow!("Unsupported file format: {}", extension))
}

/// Build the pipeline with the hosted OCR and extraction services.
pub fn build_pipeline(config: &LeumiConfig) -> anyhow::Result<ClaimPipeline> {
    config.validate_credentials()?;

    let validator = ClaimValidator::new(
        FieldSchema::national_insurance(),
        config.validation.clone(),
        chrono::Local::now().date_naive(),
    );
    let ocr = DocumentIntelligenceClient::new(config.ocr.clone())?;
    let extractor = AzureOpenAiExtractor::new(config.extraction.clone())?;

    Ok(ClaimPipeline::new(validator, ocr, extractor))
}

/// Run the blocking pipeline off the async runtime.
pub async fn process_bytes(
    pipeline: Arc<ClaimPipeline>,
    data: Vec<u8>,
    content_type: &'static str,
) -> anyhow::Result<ValidationResult> {
    let result = tokio::task::spawn_blocking(move || pipeline.process(&data, content_type)).await??;
    Ok(result)
}
