use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;

use super::buffer::TelemetrySnapshot;
use super::error::ScopeError;
use super::range::SensorKind;

pub const CSV_HEADER: &str = "Time (ms),X,Y,Z\n";

/// Serializes a snapshot as CSV, oldest sample first.
///
/// Floats use `Display`, which prints the shortest representation that
/// parses back to the same value, so nothing stored is lost.
pub fn export_csv(snapshot: &TelemetrySnapshot) -> String {
    let mut csv = String::with_capacity(CSV_HEADER.len() + snapshot.len() * 32);
    csv.push_str(CSV_HEADER);
    for s in snapshot.samples() {
        // Writing into a String cannot fail.
        let _ = writeln!(csv, "{},{},{},{}", s.timestamp_ms, s.x, s.y, s.z);
    }
    csv
}

/// True when `csv` carries no sample rows.
pub fn is_header_only(csv: &str) -> bool {
    csv.is_empty() || csv == CSV_HEADER
}

/// Writes exports as `<Sensor>_<yyyyMMdd_HHmmss>.csv` into one directory.
#[derive(Clone, Debug)]
pub struct CsvExporter {
    directory: PathBuf,
}

impl CsvExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_name(sensor: SensorKind) -> String {
        format!("{}_{}.csv", sensor.label(), Local::now().format("%Y%m%d_%H%M%S"))
    }

    pub fn write(&self, sensor: SensorKind, snapshot: &TelemetrySnapshot) -> Result<PathBuf, ScopeError> {
        let csv = export_csv(snapshot);
        if is_header_only(&csv) {
            return Err(ScopeError::NoData);
        }
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(Self::file_name(sensor));
        fs::write(&path, csv)?;
        info!("exported {} samples to {}", snapshot.len(), path.display());
        Ok(path)
    }
}
