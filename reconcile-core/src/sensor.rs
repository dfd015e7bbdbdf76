use std::collections::BTreeSet;

use reconcile_types::{AssetKey, Cursor, CursorCodec};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::decision::decide;
use crate::error::ReconcileError;
use crate::event_log::EventLogAdapter;
use crate::graph::build_upstream_map;
use crate::selection::{AssetSelection, AssetUniverse};
use crate::topo::topological_order;

/// Whether a sensor starts out running or stopped when its repository is first loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultStatus {
    Stopped,
    Running,
}

/// The constructor surface of a reconciliation sensor (§6).
///
/// Everything here is set once at definition time and passed through to the framework unchanged,
/// except `selection`, `and_condition`, and `wait_for_in_progress_runs`, which the core itself
/// consumes on every tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name: String,
    #[serde(skip)]
    pub selection: AssetSelection,
    pub and_condition: bool,
    pub wait_for_in_progress_runs: bool,
    pub minimum_interval_seconds: Option<u64>,
    pub description: Option<String>,
    pub default_status: DefaultStatus,
}

impl SensorConfig {
    /// Validates `name` against the framework's syntactic rule and constructs a config with the
    /// documented defaults (`and_condition = true`, `wait_for_in_progress_runs = true`).
    ///
    /// Note on limitation: when `and_condition` is `true` and an asset's parent set includes a
    /// source asset (one with no observable materialization), that asset can never launch via
    /// this rule, since the source asset's status never becomes `updated`. Use
    /// `and_condition = false` for such assets.
    pub fn new(name: impl Into<String>, selection: AssetSelection) -> Result<Self, ReconcileError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(SensorConfig {
            name,
            selection,
            and_condition: true,
            wait_for_in_progress_runs: true,
            minimum_interval_seconds: None,
            description: None,
            default_status: DefaultStatus::Stopped,
        })
    }
}

/// Enforces the framework's name validity rule: non-empty, printable, and free of the path
/// separator used by canonical asset-key strings (so a sensor name can never be confused with a
/// cursor key when the two appear together in logs).
fn validate_name(name: &str) -> Result<(), ReconcileError> {
    if name.is_empty() {
        return Err(ReconcileError::InvalidName {
            name: name.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if name.chars().any(|c| c.is_control() || c == '/') {
        return Err(ReconcileError::InvalidName {
            name: name.to_string(),
            reason: "must be printable and must not contain '/'".to_string(),
        });
    }
    Ok(())
}

/// At most one per tick: the set of assets to launch, keyed to a `run_key` that is stable and
/// unique across ticks that happen to produce the same `launch_set` from different cursors.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRequest {
    pub run_key: String,
    pub launch_set: Vec<AssetKey>,
}

/// Derives a stable, unique `run_key` from the post-tick cursor, so that two ticks which both
/// launch `{d, f}` but reached that conclusion from different cursor states do not dedup against
/// each other in the job execution system.
fn derive_run_key(cursor: &Cursor) -> String {
    let encoded = CursorCodec::encode(cursor);
    let mut hasher = Sha256::new();
    hasher.update(encoded.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Runs one tick of the reconciliation sensor: decodes the cursor, builds the graph, decides a
/// launch set, and returns the (possibly unchanged) cursor blob plus an optional run request.
///
/// A tick is a pure function of `(cursor_blob, universe, event log)`: no step here mutates
/// anything outside its own return value, so an aborted tick (the framework may cancel at any
/// suspension point) simply discards this call's result, leaving the persisted cursor untouched.
pub fn tick(
    config: &SensorConfig,
    cursor_blob: &str,
    universe: &dyn AssetUniverse,
    log: &dyn EventLogAdapter,
) -> Result<(String, Option<RunRequest>), ReconcileError> {
    let cursor = match CursorCodec::decode(cursor_blob) {
        Ok(cursor) => cursor,
        Err(err) => {
            warn!(sensor = %config.name, error = %err, "cursor failed to decode, falling back to empty cursor");
            Cursor::new()
        }
    };

    let upstream = build_upstream_map(&config.selection, universe);
    let order = topological_order(&upstream)?;

    let mut launch_set: BTreeSet<AssetKey> = BTreeSet::new();
    let mut launch_order: Vec<AssetKey> = Vec::new();
    let mut next_cursor = Cursor::new();

    for child in &order {
        let parents = &upstream[child];
        let cursor_ts = cursor.get(child);
        next_cursor.set(child.clone(), cursor_ts);

        let decision = decide(
            log,
            child,
            parents,
            cursor_ts,
            &launch_set,
            config.and_condition,
            config.wait_for_in_progress_runs,
        )?;

        if decision.launch {
            launch_set.insert(child.clone());
            launch_order.push(child.clone());
            next_cursor.set(child.clone(), decision.next_cursor);
        }
    }

    if launch_order.is_empty() {
        info!(sensor = %config.name, considered = order.len(), "tick produced no launches");
        return Ok((cursor_blob.to_string(), None));
    }

    let next_blob = CursorCodec::encode(&next_cursor);
    let run_key = derive_run_key(&next_cursor);
    info!(
        sensor = %config.name,
        considered = order.len(),
        launched = launch_order.len(),
        run_key = %run_key,
        "tick launched a run"
    );

    Ok((
        next_blob,
        Some(RunRequest { run_key, launch_set: launch_order }),
    ))
}
