// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot codec: item collection <-> pretty-printed JSON array

use curation_core::Item;
use serde_json::Value;
use thiserror::Error;

/// Why a snapshot could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON at all (including empty or truncated files)
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    /// Valid JSON whose top level is not an array
    #[error("expected a JSON array, found {0}")]
    NotAnArray(&'static str),
}

/// Items read from a snapshot
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    pub items: Vec<Item>,
    /// Positions of array entries that are not item objects
    pub skipped: Vec<usize>,
}

/// Serialize items as a 2-space indented JSON array
pub fn encode(items: &[Item]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(items)
}

/// Parse a snapshot, checking the top-level shape before the records.
///
/// Records are not validated: every object in the array becomes an item.
/// Entries that are not objects cannot hold an item and are skipped.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::Syntax)?;
    let records = match value {
        Value::Array(records) => records,
        other => return Err(DecodeError::NotAnArray(json_type(&other))),
    };

    let mut decoded = Decoded::default();
    for (index, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            tracing::warn!(index, found = json_type(&record), "skipping non-object record");
            decoded.skipped.push(index);
            continue;
        }
        match serde_json::from_value(record) {
            Ok(item) => decoded.items.push(item),
            Err(error) => {
                tracing::warn!(index, %error, "skipping undecodable record");
                decoded.skipped.push(index);
            }
        }
    }
    Ok(decoded)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
