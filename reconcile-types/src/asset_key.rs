use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator used when joining an [`AssetKey`]'s path segments into its canonical string form.
const PATH_SEPARATOR: char = '/';

/// An opaque, order-able identity for an asset.
///
/// Keys are structured as a non-empty sequence of path segments, mirroring how asset keys are
/// modeled upstream (a slash-joined path rather than a flat string), so that callers can group
/// related assets under a common prefix without the core caring about the grouping.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetKey {
    segments: Vec<String>,
}

impl AssetKey {
    /// Builds an `AssetKey` from path segments. Panics if `segments` is empty or any segment
    /// contains the path separator, since that would make the canonical string form ambiguous.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        assert!(!segments.is_empty(), "AssetKey must have at least one segment");
        assert!(
            segments.iter().all(|s| !s.contains(PATH_SEPARATOR)),
            "AssetKey segments must not contain {PATH_SEPARATOR:?}"
        );
        AssetKey { segments }
    }

    /// Builds a single-segment `AssetKey`. Convenience for the common case.
    pub fn from_str(segment: impl Into<String>) -> Self {
        AssetKey::new([segment.into()])
    }

    /// The key's canonical string form, used as the cursor map key and for deterministic
    /// topological tie-breaking.
    pub fn canonical(&self) -> String {
        self.segments.join(&PATH_SEPARATOR.to_string())
    }

    /// Parses a canonical string form back into an `AssetKey`.
    pub fn from_canonical(s: &str) -> Self {
        AssetKey::new(s.split(PATH_SEPARATOR).map(str::to_string))
    }

    /// The key's path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl fmt::Debug for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetKey({})", self.canonical())
    }
}

impl From<&str> for AssetKey {
    fn from(s: &str) -> Self {
        AssetKey::from_str(s)
    }
}

impl From<String> for AssetKey {
    fn from(s: String) -> Self {
        AssetKey::from_str(s)
    }
}
