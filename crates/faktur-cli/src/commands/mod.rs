//! Subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use faktur_core::models::config::FakturConfig;
use tracing::debug;

/// Load the configuration from `--config`, else from the default path if
/// it exists, else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FakturConfig> {
    if let Some(path) = config_path {
        return Ok(FakturConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(FakturConfig::from_file(&default_path)?)
    } else {
        Ok(FakturConfig::default())
    }
}

/// Write rows as CSV with the given column header.
pub fn write_csv<W: std::io::Write>(
    writer: W,
    delimiter: char,
    columns: &[&str],
    rows: &[Vec<String>],
) -> anyhow::Result<()> {
    if !delimiter.is_ascii() {
        anyhow::bail!("CSV delimiter must be an ASCII character, got {:?}", delimiter);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(writer);

    wtr.write_record(columns)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
