//! Batch command - build a recap from many faktur PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use faktur_core::recap::{detail_columns, header_columns, Recap};
use faktur_core::DocumentProcessor;

use super::{load_config, write_csv};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "faktur/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of documents processed in parallel
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Also write the one-row-per-document header table
    #[arg(long)]
    header_table: bool,

    /// Also write the recap as JSON
    #[arg(long)]
    json: bool,

    /// Stop at the first document that fails
    #[arg(long)]
    fail_fast: bool,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let processor = Arc::new(DocumentProcessor::new(&config));
    let mut recap = Recap::from_config(&config.extraction);
    let mut warned = 0usize;

    // Results come back in input order even though documents overlap.
    let mut outcomes = stream::iter(files.into_iter().map(|path| {
        let processor = Arc::clone(&processor);
        async move {
            let task_path = path.clone();
            let outcome =
                tokio::task::spawn_blocking(move || processor.process_file(&task_path)).await;
            (path, outcome)
        }
    }))
    .buffered(args.jobs.max(1));

    while let Some((path, outcome)) = outcomes.next().await {
        let name = display_name(&path);

        let failure = match outcome {
            Ok(Ok(result)) => {
                if !result.warnings.is_empty() {
                    warned += 1;
                    for warning in &result.warnings {
                        debug!("{}: {}", name, warning);
                    }
                }
                recap.push(&result, &name);
                None
            }
            Ok(Err(e)) => Some(e.to_string()),
            Err(e) => Some(format!("worker failed: {}", e)),
        };

        if let Some(message) = failure {
            if args.fail_fast {
                pb.abandon();
                error!("Failed to process {}: {}", path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", name, message);
            }
            recap.push_failure(&name, &message);
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    // Detail table
    let detail_path = output_dir.join(&config.export.detail_file_name);
    write_csv(
        fs::File::create(&detail_path)?,
        config.export.delimiter,
        &detail_columns(),
        &recap.detail_rows(),
    )?;
    info!("Wrote {} detail rows to {}", recap.records().len(), detail_path.display());
    println!(
        "{} Recap written to {}",
        style("✓").green(),
        detail_path.display()
    );

    if args.header_table || config.export.header_table {
        let header_path = output_dir.join(&config.export.header_file_name);
        write_csv(
            fs::File::create(&header_path)?,
            config.export.delimiter,
            &header_columns(),
            &recap.header_rows(),
        )?;
        println!(
            "{} Header table written to {}",
            style("✓").green(),
            header_path.display()
        );
    }

    if args.json {
        let json_path = detail_path.with_extension("json");
        fs::write(&json_path, serde_json::to_string_pretty(&recap)?)?;
        println!(
            "{} JSON written to {}",
            style("✓").green(),
            json_path.display()
        );
    }

    // Print summary
    let failures = recap.failures();
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        recap.document_count() + failures.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} detail rows",
        style(recap.document_count()).green(),
        style(failures.len()).red(),
        recap.records().len()
    );
    if warned > 0 {
        println!(
            "   {} documents with extraction warnings (use -vv to list them)",
            style(warned).yellow()
        );
    }

    if !failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in failures {
            println!("  - {}: {}", failure.source_file, failure.error);
        }
    }

    Ok(())
}
