use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AssetKey;

/// Per-asset high-watermark of parent events already reflected.
///
/// Missing entries read as `0.0`: an asset that has never been seen has not yet absorbed any
/// parent update. The map is keyed by [`AssetKey`] directly; canonical-string conversion only
/// happens at the [`CursorCodec`] boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cursor {
    watermarks: BTreeMap<AssetKey, f64>,
}

impl Cursor {
    pub fn new() -> Self {
        Cursor::default()
    }

    /// Returns the watermark for `key`, or `0.0` if `key` has never been recorded.
    pub fn get(&self, key: &AssetKey) -> f64 {
        self.watermarks.get(key).copied().unwrap_or(0.0)
    }

    /// Sets the watermark for `key`.
    pub fn set(&mut self, key: AssetKey, timestamp: f64) {
        self.watermarks.insert(key, timestamp);
    }

    pub fn is_empty(&self) -> bool {
        self.watermarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetKey, &f64)> {
        self.watermarks.iter()
    }
}

/// Failure decoding a persisted cursor blob.
#[derive(Debug, Error)]
#[error("failed to decode cursor: {0}")]
pub struct CursorDecodeError(#[from] serde_json::Error);

/// A stable, precision-preserving bidirectional mapping between [`Cursor`] and the opaque text
/// blob the sensor framework persists between ticks.
///
/// Encoded as JSON over a `canonical-string -> f64` map. `serde_json` round-trips `f64` without
/// loss of precision (it formats via the shortest-round-trip algorithm), and JSON is a reasonable
/// choice for a blob a framework may log or display verbatim, unlike a binary encoding.
pub struct CursorCodec;

impl CursorCodec {
    /// Encodes `cursor` into its opaque persisted form.
    pub fn encode(cursor: &Cursor) -> String {
        let as_strings: BTreeMap<String, f64> = cursor
            .iter()
            .map(|(key, ts)| (key.canonical(), *ts))
            .collect();
        // A `BTreeMap` of primitives serializes infallibly.
        serde_json::to_string(&as_strings).expect("cursor map serialization cannot fail")
    }

    /// Decodes a persisted blob into a [`Cursor`]. An empty or absent blob decodes to an empty
    /// cursor; callers with a genuinely corrupt blob should catch [`CursorDecodeError`] and treat
    /// it the same way (see `reconcile_core`'s tick orchestrator).
    pub fn decode(blob: &str) -> Result<Cursor, CursorDecodeError> {
        if blob.is_empty() {
            return Ok(Cursor::new());
        }
        let as_strings: BTreeMap<String, f64> = serde_json::from_str(blob)?;
        let mut cursor = Cursor::new();
        for (key, ts) in as_strings {
            cursor.set(AssetKey::from_canonical(&key), ts);
        }
        Ok(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_zero() {
        let cursor = Cursor::new();
        assert_eq!(cursor.get(&AssetKey::from_str("d")), 0.0);
    }

    #[test]
    fn empty_blob_decodes_to_empty_cursor() {
        let cursor = CursorCodec::decode("").unwrap();
        assert!(cursor.is_empty());
    }

    #[test]
    fn round_trips_through_encode_decode() {
        let mut cursor = Cursor::new();
        cursor.set(AssetKey::from_str("d"), 2.0);
        cursor.set(AssetKey::from_str("e"), 3.0);
        cursor.set(AssetKey::from_str("f"), 0.0);

        let blob = CursorCodec::encode(&cursor);
        let decoded = CursorCodec::decode(&blob).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn preserves_float_precision() {
        let mut cursor = Cursor::new();
        let precise = 1_700_000_000.123_456_7_f64;
        cursor.set(AssetKey::from_str("d"), precise);

        let blob = CursorCodec::encode(&cursor);
        let decoded = CursorCodec::decode(&blob).unwrap();
        assert_eq!(decoded.get(&AssetKey::from_str("d")), precise);
    }

    #[test]
    fn corrupt_blob_fails_to_decode() {
        assert!(CursorCodec::decode("not json").is_err());
    }
}
