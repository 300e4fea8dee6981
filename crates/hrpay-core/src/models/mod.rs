//! Data models shared across the pipeline.

pub mod attendance;
pub mod config;
pub mod document;
pub mod employee;
pub mod payroll;

pub use attendance::{AttendanceRecord, AttendanceSummary};
pub use config::HrpayConfig;
pub use document::{ConsolidatedRow, MatchResult, MatchType, ParsedPayslip};
pub use employee::{Employee, NewEmployee};
pub use payroll::{NewPayslip, PayrollRun, Payslip, PayslipResult, RunStatus};
