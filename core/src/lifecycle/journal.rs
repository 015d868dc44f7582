use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

pub const ZERO_HASH_64: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FixAction {
    Fixed,
    Reconfirmed,
    Ignored,
    Reopened,
}

/// One fix-lifecycle action, as persisted across dashboard sessions.
///
/// Records are hash-chained so a journal that was truncated or edited by
/// hand is detectable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalRecord {
    pub ts_utc: String,
    pub report_id: String,
    pub issue_ref: String,
    pub action: FixAction,
    pub note: String,
    pub developer: Option<String>,
    pub prev_entry_hash: String, // hex 64
    pub entry_hash: String,      // hex 64
}

/// Wall-clock timestamp for journal records, RFC3339 UTC.
pub fn now_rfc3339_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

/// SHA-256 over the record's canonical JSON bytes, with `entry_hash` forced
/// to the zero hash during hashing.
pub fn compute_entry_hash(record: &JournalRecord) -> CoreResult<String> {
    let mut r = record.clone();
    r.entry_hash = ZERO_HASH_64.to_string();
    let bytes = canonical_bytes(&r)?;
    let mut h = Sha256::new();
    h.update(bytes);
    Ok(hex::encode(h.finalize()))
}

/// Canonical JSON: keys sorted lexicographically, no insignificant
/// whitespace. Unlike a strict export format, fractional numbers are allowed
/// here; serde_json renders them with the shortest stable representation.
fn canonical_bytes<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&sort_keys(v))?.into_bytes())
}

fn sort_keys(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map.into_iter().collect();
            let mut out = serde_json::Map::new();
            for (k, vv) in sorted {
                out.insert(k, sort_keys(vv));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Append-only NDJSON journal of fix-lifecycle actions.
pub struct FixJournal {
    path: std::path::PathBuf,
    last_hash: String,
}

impl FixJournal {
    /// Opens an existing journal and recovers the chain tail from its last
    /// record, or creates an empty one.
    pub fn open_or_create(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            File::create(&path)?;
            return Ok(Self {
                path,
                last_hash: ZERO_HASH_64.to_string(),
            });
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut last_hash = ZERO_HASH_64.to_string();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let v: Value = serde_json::from_str(&line)?;
            let eh = v.get("entry_hash").and_then(Value::as_str).ok_or_else(|| {
                CoreError::InvalidInput("fix journal line missing entry_hash".to_string())
            })?;
            last_hash = eh.to_string();
        }
        Ok(Self { path, last_hash })
    }

    pub fn append(&mut self, mut record: JournalRecord) -> CoreResult<JournalRecord> {
        record.prev_entry_hash = self.last_hash.clone();
        record.entry_hash = compute_entry_hash(&record)?;
        let line = serde_json::to_string(&record)?;
        let mut f = OpenOptions::new().append(true).open(&self.path)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        self.last_hash = record.entry_hash.clone();
        Ok(record)
    }
}
