//! CSV report writing
//!
//! The column schema is fixed; downstream spreadsheets key on it.

use crate::error::{CoreError, Result};
use crate::resources::ResourceRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Report columns, in output order
pub const COLUMNS: [&str; 10] = [
    "account_profile",
    "account_alias",
    "account_id",
    "region",
    "resource_type",
    "identifier",
    "engine",
    "engine_version",
    "endpoint",
    "port",
];

/// A resource record tagged with the account it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub account_profile: String,
    /// Registered alias, or the configured alias when none is registered
    pub account_alias: String,
    pub account_id: String,
    #[serde(flatten)]
    pub record: ResourceRecord,
}

/// Flat borrowed view of a row, field order matching [`COLUMNS`]
#[derive(Serialize)]
struct CsvRow<'a> {
    account_profile: &'a str,
    account_alias: &'a str,
    account_id: &'a str,
    region: &'a str,
    resource_type: &'static str,
    identifier: &'a str,
    engine: &'a str,
    engine_version: &'a str,
    endpoint: &'a str,
    port: Option<i32>,
}

impl<'a> From<&'a ReportRow> for CsvRow<'a> {
    fn from(row: &'a ReportRow) -> Self {
        Self {
            account_profile: &row.account_profile,
            account_alias: &row.account_alias,
            account_id: &row.account_id,
            region: &row.record.region,
            resource_type: row.record.kind.as_str(),
            identifier: &row.record.identifier,
            engine: &row.record.engine,
            engine_version: &row.record.engine_version,
            endpoint: &row.record.endpoint,
            port: row.record.port,
        }
    }
}

/// File name for a report started at `started`, e.g. `rds_inventory_20240131T235959Z.csv`
pub fn report_file_name(started: DateTime<Utc>) -> String {
    format!("rds_inventory_{}.csv", started.format("%Y%m%dT%H%M%SZ"))
}

/// Default report path inside `dir`
pub fn report_path(dir: &Path, started: DateTime<Utc>) -> PathBuf {
    dir.join(report_file_name(started))
}

/// Write the header and `rows` as CSV to `writer`.
///
/// The header is always written, even with no rows. A missing port is an
/// empty field.
pub fn write_rows<W: Write>(writer: W, rows: &[ReportRow]) -> std::result::Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(CsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Mode of the finished report on unix, matching a plain `File::create`
#[cfg(unix)]
const REPORT_MODE: u32 = 0o644;

/// Write the report to `path`.
///
/// Rows go to a temporary file next to `path` which is renamed into place
/// once complete, so a failed write never leaves a partial report.
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |source: std::io::Error| CoreError::Io {
        path: path.display().to_string(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_error)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;

    write_rows(&mut tmp, rows).map_err(|source| CoreError::Report {
        path: path.display().to_string(),
        source,
    })?;
    tmp.as_file().sync_all().map_err(io_error)?;

    // Temp files are created owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(REPORT_MODE))
            .map_err(io_error)?;
    }

    tmp.persist(path).map_err(|e| io_error(e.error))?;

    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(())
}
