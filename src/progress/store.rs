use std::path::{Path, PathBuf};

use crate::foundation::error::{StitchlineError, StitchlineResult};

/// Fixed key the single progress record is stored under.
pub const STORE_KEY: &str = "knittingProgress";

/// The sole persisted artifact: `{rows, lastUpdated}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProgressRecord {
    pub rows: u32,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// File-backed store for the one progress record.
///
/// Reads fail soft: a missing, unreadable or unparseable record loads as zero
/// rows and is never surfaced to the caller as an error. Writes overwrite the
/// whole record; there is no partial-write or versioning concern for a single
/// scalar.
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{STORE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted row count, defaulting to 0 on any failure.
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(Some(record)) => record.rows,
            Ok(None) => 0,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable progress record");
                0
            }
        }
    }

    /// Load the full record if one exists and parses.
    pub fn try_load(&self) -> StitchlineResult<Option<ProgressRecord>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StitchlineError::storage(format!(
                    "failed to read '{}': {err}",
                    self.path.display()
                )));
            }
        };
        let record: ProgressRecord = serde_json::from_str(&raw)
            .map_err(|err| StitchlineError::serde(format!("invalid progress record: {err}")))?;
        Ok(Some(record))
    }

    /// Overwrite the record with the given row count, stamped with the current
    /// RFC 3339 local time.
    pub fn save(&self, rows: u32) -> StitchlineResult<()> {
        let record = ProgressRecord {
            rows,
            last_updated: chrono::Local::now().to_rfc3339(),
        };
        self.save_record(&record)
    }

    pub fn reset(&self) -> StitchlineResult<()> {
        self.save(0)
    }

    fn save_record(&self, record: &ProgressRecord) -> StitchlineResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                StitchlineError::storage(format!(
                    "failed to create '{}': {err}",
                    parent.display()
                ))
            })?;
        }
        let json = serde_json::to_string_pretty(record)
            .map_err(|err| StitchlineError::serde(format!("encode progress record: {err}")))?;
        std::fs::write(&self.path, json).map_err(|err| {
            StitchlineError::storage(format!("failed to write '{}': {err}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "stitchline_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn record_serializes_with_camel_case_timestamp_key() {
        let record = ProgressRecord {
            rows: 42,
            last_updated: "2026-08-30T00:00:00+00:00".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"lastUpdated\""));
        assert!(json.contains("\"rows\":42"));
    }

    #[test]
    fn missing_record_loads_as_zero() {
        let tmp = temp_dir("missing");
        let store = ProgressStore::open(&tmp);
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn corrupt_record_loads_as_zero() {
        let tmp = temp_dir("corrupt");
        std::fs::create_dir_all(&tmp).unwrap();
        let store = ProgressStore::open(&tmp);
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), 0);
        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = temp_dir("roundtrip");
        let store = ProgressStore::open(&tmp);
        store.save(107).unwrap();
        assert_eq!(store.load(), 107);

        let record = store.try_load().unwrap().unwrap();
        assert_eq!(record.rows, 107);
        assert!(!record.last_updated.is_empty());
        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn reset_overwrites_with_zero() {
        let tmp = temp_dir("reset");
        let store = ProgressStore::open(&tmp);
        store.save(33).unwrap();
        store.reset().unwrap();
        assert_eq!(store.load(), 0);
        std::fs::remove_dir_all(&tmp).ok();
    }
}
