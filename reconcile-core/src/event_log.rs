use reconcile_types::{AssetKey, RunId};

/// A narrow, read-only capability set over the external event log and run database.
///
/// Expressed as a trait object boundary, following the spec's explicit guidance to isolate the
/// "dynamic dispatch over the event-log store" concern rather than depend on any concrete store
/// client. Production code implements this against a real event-log store; tests implement it
/// against an in-memory fake (see `test_support::FakeEventLog` below).
///
/// No operation here requires cross-call atomicity: each `latest_*` lookup reflects whatever is
/// durably recorded at the moment it is called.
pub trait EventLogAdapter {
    /// The most recent completed materialization of `key`, if any.
    fn latest_completed(&self, key: &AssetKey) -> anyhow::Result<Option<(f64, RunId)>>;

    /// The run id of the most recent planned materialization of `key`, if any, regardless of
    /// whether that run has finished.
    fn latest_planned(&self, key: &AssetKey) -> anyhow::Result<Option<RunId>>;

    /// Whether `run_id` is currently in a non-terminal state.
    fn run_in_progress(&self, run_id: &RunId) -> anyhow::Result<bool>;

    /// Every asset key planned to materialize inside `run_id`.
    fn planned_assets_in_run(&self, run_id: &RunId) -> anyhow::Result<Vec<AssetKey>>;
}
