use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a single execution of the external job system.
///
/// Opaque to the core: it is only ever compared for equality, passed back to the event-log
/// adapter, and threaded through log messages.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        RunId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunId({})", self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        RunId::new(s)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        RunId::new(s)
    }
}
