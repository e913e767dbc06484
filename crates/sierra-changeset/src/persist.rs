//! Persisted experiment definitions
//!
//! Each experiment directory holds one `exp_def.json` document:
//!
//! ```text
//! { "version": 1, "records": [ { "checksum": "<blake3 hex>", "changes": [...] }, ... ] }
//! ```
//!
//! A document may hold zero, one or many records. Readers union all of them
//! into the experiment's effective change set.

use crate::change::ChangeSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// File name of the definition inside an experiment directory
pub const EXP_DEF_FILENAME: &str = "exp_def.json";

#[derive(Debug, Serialize, Deserialize)]
struct ExpDefDocument {
    version: u32,
    records: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    checksum: String,
    changes: ChangeSet,
}

impl Record {
    fn seal(changes: &ChangeSet) -> Result<Self, PersistError> {
        Ok(Self {
            checksum: checksum(changes)?,
            changes: changes.clone(),
        })
    }
}

/// Blake3 checksum over the canonical JSON encoding of a change set
///
/// # Errors
/// Returns error if the set cannot be encoded
pub fn checksum(changes: &ChangeSet) -> Result<String, PersistError> {
    let bytes = serde_json::to_vec(changes)?;
    Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
}

/// Overwrite `path` with a document holding `records`
///
/// # Errors
/// Returns error on encoding or IO failure
pub fn write_records(path: &Path, records: &[ChangeSet]) -> Result<(), PersistError> {
    let doc = ExpDefDocument {
        version: FORMAT_VERSION,
        records: records.iter().map(Record::seal).collect::<Result<_, _>>()?,
    };
    write_document(path, &doc)
}

/// Read every record, in write order
///
/// # Errors
/// Returns error on IO failure, unknown version, or checksum mismatch
pub fn read_records(path: &Path) -> Result<Vec<ChangeSet>, PersistError> {
    let doc = read_document(path)?;
    doc.records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let actual = checksum(&record.changes)?;
            if actual != record.checksum {
                return Err(PersistError::ChecksumMismatch {
                    path: path.to_path_buf(),
                    index,
                });
            }
            Ok(record.changes)
        })
        .collect()
}

/// Union of every record in the document
///
/// # Errors
/// See [`read_records`]
pub fn read_union(path: &Path) -> Result<ChangeSet, PersistError> {
    let records = read_records(path)?;
    let mut union = ChangeSet::new();
    for record in &records {
        union.extend_from(record);
    }
    tracing::debug!(path = %path.display(), records = records.len(), "read experiment definition");
    Ok(union)
}

fn read_document(path: &Path) -> Result<ExpDefDocument, PersistError> {
    let text = fs::read_to_string(path).map_err(|source| PersistError::io(path, source))?;
    let doc: ExpDefDocument = serde_json::from_str(&text)?;
    if doc.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: doc.version,
        });
    }
    Ok(doc)
}

fn write_document(path: &Path, doc: &ExpDefDocument) -> Result<(), PersistError> {
    let tmp = path.with_extension("json.tmp");
    let text = serde_json::to_string_pretty(doc)?;
    fs::write(&tmp, text).map_err(|source| PersistError::io(&tmp, source))?;
    fs::rename(&tmp, path).map_err(|source| PersistError::io(path, source))?;
    Ok(())
}

/// Errors reading or writing experiment definitions
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// IO failure
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed document
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document written by an unknown format version
    #[error("{path}: unsupported experiment definition version {found}")]
    UnsupportedVersion {
        /// File involved
        path: PathBuf,
        /// Version found on disk
        found: u32,
    },

    /// Record content does not match its checksum
    #[error("{path}: checksum mismatch in record {index}")]
    ChecksumMismatch {
        /// File involved
        path: PathBuf,
        /// Zero-based record index
        index: usize,
    },
}

impl PersistError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
