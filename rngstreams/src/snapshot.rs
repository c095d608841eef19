//! Snapshot - Save/Load Stream Arrays
//!
//! Stream arrays are saved as JSON together with the family name and a
//! SHA-256 digest of their canonical serialization, so a saved array can only
//! be restored into the same family and a modified file is rejected.
//!
//! # Example
//! ```
//! use rngstreams::prelude::*;
//! use rngstreams::snapshot::{load_streams, save_streams};
//!
//! let mut creator = StreamCreator::<Xorwow>::create(None);
//! let mut streams = creator.create_streams(3).unwrap();
//! streams[1].next_raw();
//!
//! let json = save_streams(&streams).unwrap();
//! let restored: Vec<Stream<Xorwow>> = load_streams(&json).unwrap();
//! assert_eq!(restored, streams);
//! ```

use crate::error::{Result, RngError};
use crate::family::Family;
use crate::stream::Stream;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Saved stream array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StreamArraySnapshot<F: Family> {
    /// Family name the streams belong to
    pub family: String,

    /// All three cursors of every stream
    pub streams: Vec<Stream<F>>,

    /// SHA256 of the canonical JSON of `streams`
    pub digest: String,
}

impl<F: Family> StreamArraySnapshot<F> {
    pub fn capture(streams: &[Stream<F>]) -> Result<Self> {
        Ok(Self {
            family: F::NAME.to_string(),
            streams: streams.to_vec(),
            digest: compute_digest(&streams)?,
        })
    }

    /// Check family, digest and every cursor, then hand back the streams.
    pub fn restore(self) -> Result<Vec<Stream<F>>> {
        if self.family != F::NAME {
            return Err(RngError::invalid_value(
                "restore",
                format!("snapshot holds {} streams, expected {}", self.family, F::NAME),
            ));
        }

        let digest = compute_digest(&self.streams)?;
        if digest != self.digest {
            return Err(RngError::invalid_value(
                "restore",
                format!("digest mismatch: expected {}, got {}", self.digest, digest),
            ));
        }

        for (i, stream) in self.streams.iter().enumerate() {
            let cursors = [
                ("initial", stream.initial_state()),
                ("substream", stream.substream_state()),
                ("current", stream.current_state()),
            ];
            for (name, state) in cursors {
                F::validate_seed(state).map_err(|detail| {
                    let detail = format!("streams[{}].{}: {}", i, name, detail);
                    RngError::invalid_seed("restore", detail)
                })?;
            }
        }

        Ok(self.streams)
    }
}

// ============================================================================
// Digest
// ============================================================================

fn serialization_failed(func: &str, e: serde_json::Error) -> RngError {
    RngError::invalid_value(func, format!("serialization failed: {}", e))
}

fn malformed(e: serde_json::Error) -> RngError {
    RngError::invalid_value("load_streams", format!("malformed snapshot: {}", e))
}

/// Deterministic SHA256 of `value`, serialized as JSON with sorted keys.
pub fn compute_digest<T: Serialize>(value: &T) -> Result<String> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(value).map_err(|e| serialization_failed("compute_digest", e))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| serialization_failed("compute_digest", e))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Save / Load
// ============================================================================

pub fn save_streams<F: Family>(streams: &[Stream<F>]) -> Result<String> {
    let snapshot = StreamArraySnapshot::capture(streams)?;
    serde_json::to_string(&snapshot).map_err(|e| serialization_failed("save_streams", e))
}

/// Parse a saved array and restore it.
///
/// Malformed JSON, a different family or a digest mismatch fail with
/// `InvalidValue`; a cursor that is not a valid seed fails with `InvalidSeed`.
pub fn load_streams<F: Family>(json: &str) -> Result<Vec<Stream<F>>> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(malformed)?;

    match value.get("family").and_then(|f| f.as_str()) {
        Some(family) if family == F::NAME => {}
        Some(family) => {
            return Err(RngError::invalid_value(
                "load_streams",
                format!("snapshot holds {} streams, expected {}", family, F::NAME),
            ))
        }
        None => return Err(RngError::invalid_value("load_streams", "missing family")),
    }

    let snapshot: StreamArraySnapshot<F> = serde_json::from_value(value).map_err(malformed)?;
    snapshot.restore()
}
