use reconcile_types::AssetKey;
use thiserror::Error;

/// Everything that can go wrong building or running a reconciliation sensor.
///
/// One enum per crate, following the convention used across the corpus this crate is built in
/// the style of (see `buck2_events`'s single `thiserror`-derived error type): callers match on a
/// variant rather than parsing a string.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Raised eagerly at sensor construction time; the name failed the framework's validity
    /// rule (non-empty, printable, no separators).
    #[error("invalid sensor name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The upstream map restricted to monitored children contains a cycle. This should not occur
    /// given acyclic asset definitions; surfacing it as an error rather than looping forever is
    /// the contract, not a recoverable condition a caller is expected to retry past.
    #[error("cycle detected among monitored assets, involving at least {0}")]
    CycleDetected(AssetKey),

    /// The event-log adapter failed an I/O call. The tick aborts without touching the persisted
    /// cursor; the next tick retries cleanly.
    #[error("event log adapter failed: {0}")]
    AdapterFailure(#[from] anyhow::Error),
}
