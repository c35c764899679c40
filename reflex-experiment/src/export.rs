//! JSON export of trial records
//!
//! The document is a bare array of objects with the fields `timestamp`,
//! `reactionTimeMs`, `stimulusLabel` and `ignored`, in that order. There is no
//! envelope and no schema version.

use std::path::PathBuf;

use reflex_core::TrialRecord;
use tracing::{info, warn};

use crate::error::ExportError;

/// Default file name offered for exports.
pub const DEFAULT_EXPORT_FILE: &str = "ReactionData.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Indent the JSON document instead of writing it on one line.
    pub pretty: bool,
}

/// Somewhere an export can be written to.
pub trait Destination {
    /// Human readable name used in logs and reports.
    fn describe(&self) -> String;
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()>;
}

/// Writes the whole document to a file, replacing any previous contents.
#[derive(Debug, Clone)]
pub struct FileDestination {
    path: PathBuf,
}

impl FileDestination {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Destination for FileDestination {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::write(&self.path, bytes)
    }
}

/// In-memory sink; each export replaces the buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    buf: Vec<u8>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Destination for MemoryDestination {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub records: usize,
    pub bytes: usize,
    pub destination: String,
}

pub fn serialize<'a, I>(records: I, options: ExportOptions) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = &'a TrialRecord>,
{
    let records: Vec<&TrialRecord> = records.into_iter().collect();
    let bytes = if options.pretty {
        serde_json::to_vec_pretty(&records)?
    } else {
        serde_json::to_vec(&records)?
    };
    Ok(bytes)
}

pub fn parse(bytes: &[u8]) -> Result<Vec<TrialRecord>, ExportError> {
    serde_json::from_slice(bytes).map_err(ExportError::Decode)
}

/// Serializes `records` and writes them to `destination` in one shot.
///
/// Nothing is retried; on failure the destination may hold a partial write.
pub fn export_to_destination<'a, I, D>(
    records: I,
    destination: &mut D,
    options: ExportOptions,
) -> Result<ExportReport, ExportError>
where
    I: IntoIterator<Item = &'a TrialRecord>,
    D: Destination + ?Sized,
{
    let records: Vec<&TrialRecord> = records.into_iter().collect();
    let bytes = serialize(records.iter().copied(), options)?;
    let name = destination.describe();

    if let Err(source) = destination.write_bytes(&bytes) {
        warn!(destination = %name, error = %source, "export failed");
        return Err(ExportError::Io {
            destination: name,
            source,
        });
    }

    info!(destination = %name, records = records.len(), bytes = bytes.len(), "results exported");
    Ok(ExportReport {
        records: records.len(),
        bytes: bytes.len(),
        destination: name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ResultStore;
    use chrono::{Local, TimeZone};
    use reflex_core::StimulusVariant;

    struct FailingDestination;

    impl Destination for FailingDestination {
        fn describe(&self) -> String {
            "broken".into()
        }

        fn write_bytes(&mut self, _bytes: &[u8]) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    fn sample_store() -> ResultStore {
        let mut store = ResultStore::new();
        let base = Local.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).single().unwrap();
        let variants = [StimulusVariant::Red, StimulusVariant::Green, StimulusVariant::Blue];
        for (i, v) in variants.into_iter().enumerate() {
            let ts = base + chrono::Duration::milliseconds(1500 * i as i64 + 250);
            store.append(TrialRecord::new(ts, 200.0 + i as f64 * 12.5, v));
        }
        store
    }

    #[test]
    fn empty_export_is_empty_array() {
        let bytes = serialize(std::iter::empty(), ExportOptions::default()).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn document_shape() {
        let store = sample_store();
        let bytes = serialize(store.records(), ExportOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);

        let first = items[0].as_object().unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first["timestamp"], "2024-06-01 09:30:00");
        assert_eq!(first["reactionTimeMs"], 200.0);
        assert_eq!(first["stimulusLabel"], "Red");
        assert_eq!(first["ignored"], false);

        let text = String::from_utf8(bytes).unwrap();
        let order = ["\"timestamp\"", "\"reactionTimeMs\"", "\"stimulusLabel\"", "\"ignored\""]
            .map(|k| text.find(k).unwrap());
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn round_trip_truncates_to_seconds() {
        let store = sample_store();
        for pretty in [false, true] {
            let bytes = serialize(store.records(), ExportOptions { pretty }).unwrap();
            let back = parse(&bytes).unwrap();
            let expected: Vec<TrialRecord> =
                store.records().iter().map(TrialRecord::truncated_to_seconds).collect();
            assert_eq!(back, expected);
        }
    }

    #[test]
    fn exports_only_exportable_records() {
        let mut store = sample_store();
        store.ignore_latest(store.latest_id().unwrap()).unwrap();

        let mut dest = MemoryDestination::new();
        let report =
            export_to_destination(store.exportable(), &mut dest, ExportOptions::default()).unwrap();

        assert_eq!(report.records, 2);
        assert_eq!(report.bytes, dest.bytes().len());
        assert_eq!(report.destination, "memory");
        let back = parse(dest.bytes()).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.iter().all(|r| !r.is_ignored()));
    }

    #[test]
    fn failed_write_is_reported_and_store_untouched() {
        let store = sample_store();
        let before = store.records().to_vec();

        let err = export_to_destination(
            store.exportable(),
            &mut FailingDestination,
            ExportOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ExportError::Io { ref destination, .. } if destination == "broken"));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn file_destination_writes_document() {
        let store = sample_store();
        let path = std::env::temp_dir().join(format!("reflex-export-{}.json", std::process::id()));
        let mut dest = FileDestination::new(&path);

        let report =
            export_to_destination(store.exportable(), &mut dest, ExportOptions { pretty: true })
                .unwrap();

        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written.len(), report.bytes);
        assert_eq!(parse(&written).unwrap().len(), 3);
    }

    #[test]
    fn file_destination_reports_missing_directory() {
        let path = std::env::temp_dir()
            .join("reflex-missing-dir-for-export-test")
            .join("out.json");
        let mut dest = FileDestination::new(path);
        let err = export_to_destination(std::iter::empty(), &mut dest, ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn garbage_fails_to_parse() {
        assert!(matches!(parse(b"{\"not\": \"an array\"}"), Err(ExportError::Decode(_))));
    }
}
