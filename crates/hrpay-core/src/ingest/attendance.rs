use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::models::{AttendanceRecord, AttendanceSummary};
use crate::store::{insert_attendance, list_employees, Database};

/// Import attendance rows (`code, day, punch_in, punch_out, source`).
///
/// Rows for unknown codes and rows that fail to deserialize are counted
/// as skipped. Everything is written in one transaction.
pub fn import_attendance<R: Read>(db: &mut Database, reader: R) -> Result<AttendanceSummary> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let tx = db.transaction()?;
    let ids: HashMap<String, i64> = list_employees(&tx, false)?
        .into_iter()
        .map(|e| (e.code, e.id))
        .collect();

    let mut summary = AttendanceSummary::default();
    for (line, record) in rdr.deserialize::<AttendanceRecord>().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(IngestError::Csv(e).into()),
            Err(e) => {
                warn!("Skipping attendance row {}: {}", line + 1, e);
                summary.skipped += 1;
                continue;
            }
        };

        match ids.get(&record.code) {
            Some(&employee_id) => {
                insert_attendance(&tx, employee_id, &record)?;
                summary.inserted += 1;
            }
            None => {
                debug!("Skipping attendance for unknown code {}", record.code);
                summary.skipped += 1;
            }
        }
    }

    tx.commit()?;
    info!(
        "Attendance import: {} inserted, {} skipped",
        summary.inserted, summary.skipped
    );
    Ok(summary)
}
