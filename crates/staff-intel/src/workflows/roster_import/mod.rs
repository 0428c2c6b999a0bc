//! Import of shift exports from the scheduling portal's CSV download.

mod parser;

use crate::workflows::staffing::{GuardId, ShiftRecord, ShiftStatus, SiteId};
use std::io::Read;
use std::path::Path;

use parser::ShiftRow;

#[derive(Debug)]
pub enum ShiftImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, reason: String },
}

impl std::fmt::Display for ShiftImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftImportError::Io(err) => write!(f, "failed to read shift export: {}", err),
            ShiftImportError::Csv(err) => write!(f, "invalid shift CSV data: {}", err),
            ShiftImportError::InvalidRow { row, reason } => {
                write!(f, "shift export row {}: {}", row, reason)
            }
        }
    }
}

impl std::error::Error for ShiftImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShiftImportError::Io(err) => Some(err),
            ShiftImportError::Csv(err) => Some(err),
            ShiftImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ShiftImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ShiftImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ShiftExportImporter;

impl ShiftExportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ShiftRecord>, ShiftImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows are numbered from 1, excluding the header line.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ShiftRecord>, ShiftImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| to_record(index + 1, row))
            .collect()
    }
}

fn to_record(row_number: usize, row: ShiftRow) -> Result<ShiftRecord, ShiftImportError> {
    let invalid = |reason: &str| ShiftImportError::InvalidRow {
        row: row_number,
        reason: reason.to_string(),
    };

    let date = match row.date.as_deref() {
        None => return Err(invalid("missing date")),
        Some(raw) => row
            .shift_date()
            .ok_or_else(|| invalid(&format!("unparseable date '{raw}'")))?,
    };
    let late = row.was_late();
    let id = row.shift_id.ok_or_else(|| invalid("missing shift id"))?;
    let site_id = row.site_id.ok_or_else(|| invalid("missing site id"))?;

    Ok(ShiftRecord {
        id,
        guard_id: row.guard_id.map(GuardId),
        site_id: SiteId(site_id),
        status: ShiftStatus::from_label(&row.status),
        date,
        start_time: row.start,
        end_time: row.end,
        late,
    })
}
