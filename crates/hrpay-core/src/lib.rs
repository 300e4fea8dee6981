//! Core library for payroll document ingestion.
//!
//! This crate provides:
//! - Text extraction from payslip PDFs and text dumps
//! - Rule-based payslip field parsing and consolidated statement parsing
//! - Name normalization and fuzzy roster matching
//! - Payroll runs with rendered payslip PDFs, backed by SQLite and a blob store

pub mod consolidated;
pub mod context;
pub mod error;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod payroll;
pub mod payslip;
pub mod pdf;
pub mod storage;
pub mod store;

pub use consolidated::parse_consolidated;
pub use context::PayrollContext;
pub use error::{ExtractionError, HrpayError, IngestError, PersistenceError, Result, StorageError};
pub use ingest::{Assignments, ImportSummary, IngestOptions, PayslipImport, SourceDocument};
pub use matching::{normalize_name, NameMatcher, DEFAULT_THRESHOLD};
pub use models::{
    ConsolidatedRow, Employee, HrpayConfig, MatchResult, MatchType, NewEmployee, ParsedPayslip,
    PayrollRun, Payslip, PayslipResult, RunStatus,
};
pub use payroll::{render_payslip, PayFigures, PayslipArtifact, RunOptions};
pub use payslip::{PayslipParser, RulePayslipParser};
pub use pdf::{extract_document, DocumentKind, DocumentText, PdfExtractor, PlainTextExtractor, TextExtractor};
pub use storage::{BlobStore, LocalBlobStore};
pub use store::Database;
