//! Configuration structures for the payroll pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::HrpayError;

/// Main configuration for the hrpay pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HrpayConfig {
    /// Relational store configuration.
    pub database: DatabaseConfig,

    /// Blob store configuration.
    pub storage: StorageConfig,

    /// Name matching configuration.
    pub matching: MatchingConfig,

    /// Payroll computation configuration.
    pub payroll: PayrollConfig,

    /// Document ingestion configuration.
    pub ingest: IngestConfig,
}

/// Relational store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("hrms.db"),
        }
    }
}

/// Blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for stored artifacts.
    pub root: PathBuf,

    /// Lifetime of presigned URLs in seconds.
    pub presign_ttl_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            presign_ttl_secs: 3600,
        }
    }
}

/// Name matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity ratio for a fuzzy match (0.0 - 1.0).
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: crate::matching::DEFAULT_THRESHOLD,
        }
    }
}

/// Payroll computation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Provident fund deduction rate applied to base salary.
    pub pf_rate: Decimal,

    /// Base salary for employees created without one.
    pub default_base_salary: Decimal,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            pf_rate: Decimal::new(12, 2),
            default_base_salary: Decimal::new(20000, 0),
        }
    }
}

/// Document ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Create roster entries for names that match nobody.
    pub create_missing_employees: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            create_missing_employees: true,
        }
    }
}

impl HrpayConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| HrpayError::Config(format!("{}: {}", path.display(), e)))?;
        config
            .validate()
            .map_err(|e| HrpayError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Check the values serde cannot constrain.
    pub fn validate(&self) -> Result<(), String> {
        let threshold = self.matching.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!(
                "matching.threshold must be between 0 and 1, got {}",
                threshold
            ));
        }
        if self.payroll.pf_rate < Decimal::ZERO {
            return Err(format!(
                "payroll.pf_rate must not be negative, got {}",
                self.payroll.pf_rate
            ));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
