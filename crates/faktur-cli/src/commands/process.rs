//! Process command - extract data from a single faktur PDF.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use faktur_core::invoice::rules::{format_rupiah, format_thousands};
use faktur_core::models::invoice::{HeaderField, InvoiceHeader, LineItem, MergedRecord};
use faktur_core::recap::{detail_columns, Recap};
use faktur_core::{DocumentProcessor, ExtractionResult};

use super::{load_config, write_csv};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input faktur PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print extraction warnings to stderr
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV detail rows
    Csv,
    /// Plain text summary
    Text,
}

/// JSON view of one processed document.
#[derive(Serialize)]
struct DocumentOutput<'a> {
    header: &'a InvoiceHeader,
    items: &'a [LineItem],
    records: &'a [MergedRecord],
    warnings: &'a [String],
    processing_time_ms: u64,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting faktur...");

    let processor = DocumentProcessor::new(&config);
    let result = processor.process_file(&args.input);
    pb.finish_and_clear();
    let result = result?;

    let source_file = result.header.source_file.clone();
    let mut recap = Recap::from_config(&config.extraction);
    recap.push(&result, &source_file);

    if args.show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
    }

    let output = match args.format {
        OutputFormat::Json => format_json(&result, &recap)?,
        OutputFormat::Csv => format_csv(&recap, config.export.delimiter)?,
        OutputFormat::Text => format_text(&result, &recap),
    };

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

fn format_json(result: &ExtractionResult, recap: &Recap) -> anyhow::Result<String> {
    let output = DocumentOutput {
        header: &result.header,
        items: &result.items,
        records: recap.records(),
        warnings: &result.warnings,
        processing_time_ms: result.processing_time_ms,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn format_csv(recap: &Recap, delimiter: char) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, delimiter, &detail_columns(), &recap.detail_rows())?;
    Ok(String::from_utf8(buffer)?)
}

fn format_text(result: &ExtractionResult, recap: &Recap) -> String {
    let mut output = String::new();

    for field in HeaderField::ALL {
        output.push_str(&format!("{}: {}\n", field.label(), result.header.get(field)));
    }
    if let Some(date) = result.header.issue_date() {
        output.push_str(&format!("Issue date: {}\n", date));
    }
    output.push('\n');

    output.push_str(&format!("Line items ({}):\n", result.items.len()));
    for record in recap.records() {
        let tax = match (record.tax.dpp(), record.tax.ppn()) {
            (Some(dpp), Some(ppn)) => format!(
                "DPP {}  PPN {}",
                format_thousands(dpp),
                format_thousands(ppn)
            ),
            _ => "DPP/PPN not computed".to_string(),
        };
        let price = record
            .item
            .price
            .value
            .map(format_rupiah)
            .unwrap_or_else(|| record.item.price.raw.clone());
        output.push_str(&format!(
            "  {}. [{}] {}\n     Rp {}  {}\n",
            record.item.number, record.item.code, record.item.description, price, tax
        ));
    }

    if !result.excluded_items.is_empty() {
        output.push_str(&format!(
            "\nExcluded (non-zero PPnBM): {}\n",
            result.excluded_items.join(", ")
        ));
    }

    output
}
