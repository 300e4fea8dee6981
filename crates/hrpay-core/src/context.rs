//! Per-invocation wiring of configuration, database and blob store.

use std::fs;
use std::io::Read;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::ingest::{self, Assignments, ImportSummary, IngestOptions, PayslipImport, SourceDocument};
use crate::matching::NameMatcher;
use crate::models::{
    AttendanceSummary, ConsolidatedRow, HrpayConfig, MatchResult, ParsedPayslip, PayslipResult,
};
use crate::payroll::{self, RunOptions};
use crate::storage::{BlobStore, LocalBlobStore};
use crate::store::{self, Database};

/// Everything a payroll operation needs, built once and passed explicitly.
pub struct PayrollContext {
    config: HrpayConfig,
    db: Database,
    blobs: Box<dyn BlobStore>,
}

impl PayrollContext {
    /// Open the configured database (creating its schema) and the local
    /// blob store.
    pub fn open(config: HrpayConfig) -> Result<Self> {
        let parent = config.database.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database.path)?;
        db.init()?;
        let blobs = Box::new(LocalBlobStore::new(config.storage.root.clone()));

        debug!(
            "Context ready: db={} storage={}",
            config.database.path.display(),
            config.storage.root.display()
        );
        Ok(Self { config, db, blobs })
    }

    /// Assemble a context from already-opened parts.
    pub fn from_parts(config: HrpayConfig, db: Database, blobs: Box<dyn BlobStore>) -> Self {
        Self { config, db, blobs }
    }

    pub fn config(&self) -> &HrpayConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            pf_rate: self.config.payroll.pf_rate,
            presign_ttl: Duration::from_secs(self.config.storage.presign_ttl_secs),
        }
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions::from(&self.config)
    }

    /// Matcher over the whole roster at the configured threshold.
    pub fn matcher(&self) -> Result<NameMatcher> {
        let roster = store::list_employees(self.db.conn(), false)?;
        Ok(NameMatcher::new(&roster).with_threshold(self.config.matching.threshold))
    }

    pub fn match_rows(&self, rows: &[ConsolidatedRow]) -> Result<Vec<MatchResult>> {
        Ok(self.matcher()?.match_rows(rows))
    }

    pub fn run_payroll(&mut self, month: u32, year: i32) -> Result<Vec<PayslipResult>> {
        let options = self.run_options();
        payroll::run_payroll(&mut self.db, self.blobs.as_ref(), &options, month, year)
    }

    pub fn import_payslip(
        &mut self,
        parsed: &ParsedPayslip,
        source: Option<SourceDocument>,
        assign_code: Option<&str>,
    ) -> Result<PayslipImport> {
        let options = self.ingest_options();
        ingest::import_payslip(
            &mut self.db,
            self.blobs.as_ref(),
            &options,
            parsed,
            source,
            assign_code,
        )
    }

    pub fn import_consolidated(
        &mut self,
        rows: &[ConsolidatedRow],
        month: u32,
        year: i32,
        assignments: &Assignments,
    ) -> Result<ImportSummary> {
        let options = self.ingest_options();
        ingest::import_consolidated(&mut self.db, &options, rows, month, year, assignments)
    }

    pub fn import_attendance<R: Read>(&mut self, reader: R) -> Result<AttendanceSummary> {
        ingest::import_attendance(&mut self.db, reader)
    }
}
