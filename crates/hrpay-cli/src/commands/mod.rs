//! CLI subcommands and the helpers they share.

pub mod attendance;
pub mod batch;
pub mod config;
pub mod consolidated;
pub mod employees;
pub mod init;
pub mod payslip;
pub mod run;
pub mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::debug;

use hrpay_core::models::HrpayConfig;
use hrpay_core::pdf::{extract_document, DocumentKind, DocumentText};
use hrpay_core::PayrollContext;

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
}

impl GlobalOpts {
    /// Explicit `--config`, else the default file if present, else defaults.
    /// `--db` overrides the database path either way.
    pub fn load_config(&self) -> anyhow::Result<HrpayConfig> {
        let mut config = match &self.config {
            Some(path) => HrpayConfig::from_file(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    HrpayConfig::from_file(&default_path)?
                } else {
                    HrpayConfig::default()
                }
            }
        };

        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        Ok(config)
    }

    pub fn open_context(&self) -> anyhow::Result<PayrollContext> {
        Ok(PayrollContext::open(self.load_config()?)?)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hrpay")
        .join("config.json")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// A document read from disk together with its extracted text.
pub struct LoadedDocument {
    pub bytes: Vec<u8>,
    pub extension: String,
    pub text: DocumentText,
}

/// Read and extract a payslip or statement (`.pdf` or `.txt`).
pub fn load_document(path: &Path) -> anyhow::Result<LoadedDocument> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let bytes = fs::read(path)?;
    let kind = DocumentKind::from_path(path).unwrap_or_else(|| DocumentKind::sniff(&bytes));
    let text = extract_document(&bytes, kind)?;

    if text.is_blank() {
        anyhow::bail!("No text could be extracted from {}", path.display());
    }
    debug!("Extracted {} pages from {}", text.page_count(), path.display());

    let extension = match kind {
        DocumentKind::Pdf => "pdf",
        DocumentKind::Text => "txt",
    }
    .to_string();

    Ok(LoadedDocument { bytes, extension, text })
}

/// Write to `output` if given, otherwise print to stdout.
pub fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
