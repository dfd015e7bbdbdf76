use std::collections::BTreeMap;
use std::collections::BTreeSet;

use reconcile_types::{AssetKey, ParentUpdateStatus};
use tracing::debug;

use crate::event_log::EventLogAdapter;

/// Evaluates a single parent's status for `child`, given that `parent` is not a member of the
/// launch set already decided this tick (the `p in L` case is handled by the caller, since it
/// needs no event-log lookup at all).
fn evaluate_parent(
    log: &dyn EventLogAdapter,
    child: &AssetKey,
    parent: &AssetKey,
    cursor_ts: f64,
) -> anyhow::Result<ParentUpdateStatus> {
    let Some((timestamp, run_id)) = log.latest_completed(parent)? else {
        return Ok(ParentUpdateStatus::NoChange);
    };
    if timestamp <= cursor_ts {
        return Ok(ParentUpdateStatus::NoChange);
    }
    let co_planned = log.planned_assets_in_run(&run_id)?;
    if co_planned.contains(child) {
        Ok(ParentUpdateStatus::CoMaterialized(timestamp))
    } else {
        Ok(ParentUpdateStatus::NewUpdate(timestamp))
    }
}

/// Whether any parent in `parents` (other than ones already slated to launch this tick) has a
/// planned materialization inside a run that is still in progress.
///
/// This is Step A of the decision rule: a fast abort that defers `child` entirely so it does not
/// race a parent's in-flight run.
fn any_parent_in_flight(
    log: &dyn EventLogAdapter,
    parents: &BTreeSet<AssetKey>,
    launch_set: &BTreeSet<AssetKey>,
) -> anyhow::Result<bool> {
    for parent in parents {
        if launch_set.contains(parent) {
            continue;
        }
        if let Some(run_id) = log.latest_planned(parent)? {
            if log.run_in_progress(&run_id)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// The result of evaluating one child for this tick: whether it launches, and the cursor it
/// should carry into the next tick regardless.
pub struct Decision {
    pub launch: bool,
    pub next_cursor: f64,
    pub statuses: BTreeMap<AssetKey, ParentUpdateStatus>,
}

/// The central per-asset decision rule (§4.4 of the design).
///
/// `and_condition` selects all-mode (every parent must be updated) vs any-mode (at least one
/// parent updated). `wait_for_in_progress_runs` enables Step A's in-flight deferral.
pub fn decide(
    log: &dyn EventLogAdapter,
    child: &AssetKey,
    parents: &BTreeSet<AssetKey>,
    cursor_ts: f64,
    launch_set: &BTreeSet<AssetKey>,
    and_condition: bool,
    wait_for_in_progress_runs: bool,
) -> anyhow::Result<Decision> {
    if parents.is_empty() {
        // all([]) is true, any([]) is false: in all-mode a parentless asset launches on every
        // tick; in any-mode it never does. No timestamps to fold either way.
        return Ok(Decision {
            launch: and_condition,
            next_cursor: cursor_ts,
            statuses: BTreeMap::new(),
        });
    }

    if wait_for_in_progress_runs && any_parent_in_flight(log, parents, launch_set)? {
        debug!(child = %child, "deferring: a parent has a planned materialization in an in-progress run");
        let statuses = parents.iter().map(|p| (p.clone(), ParentUpdateStatus::NoChange)).collect();
        return Ok(Decision { launch: false, next_cursor: cursor_ts, statuses });
    }

    let mut statuses = BTreeMap::new();
    for parent in parents {
        let status = if launch_set.contains(parent) {
            ParentUpdateStatus::WillLaunch
        } else {
            evaluate_parent(log, child, parent, cursor_ts)?
        };
        statuses.insert(parent.clone(), status);
    }

    let launch = if and_condition {
        statuses.values().all(ParentUpdateStatus::updated)
    } else {
        statuses.values().any(ParentUpdateStatus::updated)
    };

    let next_cursor = if launch {
        statuses
            .values()
            .map(ParentUpdateStatus::contributing_ts)
            .fold(cursor_ts, f64::max)
    } else {
        cursor_ts
    };

    debug!(child = %child, launch, next_cursor, "decided");

    Ok(Decision { launch, next_cursor, statuses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::test_support::FakeEventLog;

    fn key(s: &str) -> AssetKey {
        AssetKey::from_str(s)
    }

    fn parents(keys: &[&str]) -> BTreeSet<AssetKey> {
        keys.iter().map(|k| key(k)).collect()
    }

    #[test]
    fn launches_when_all_parents_updated_in_all_mode() {
        let log = FakeEventLog::new();
        log.complete("a", 1.0, "r1", &[]);
        log.complete("b", 2.0, "r2", &[]);

        let decision = decide(
            &log,
            &key("d"),
            &parents(&["a", "b"]),
            0.0,
            &BTreeSet::new(),
            true,
            true,
        )
        .unwrap();

        assert!(decision.launch);
        assert_eq!(decision.next_cursor, 2.0);
    }

    #[test]
    fn does_not_launch_when_one_parent_unchanged_in_all_mode() {
        let log = FakeEventLog::new();
        log.complete("a", 1.0, "r1", &[]);
        // b has no completions at all.

        let decision = decide(
            &log,
            &key("d"),
            &parents(&["a", "b"]),
            0.0,
            &BTreeSet::new(),
            true,
            true,
        )
        .unwrap();

        assert!(!decision.launch);
        assert_eq!(decision.next_cursor, 0.0);
    }

    #[test]
    fn any_mode_launches_on_a_single_updated_parent() {
        let log = FakeEventLog::new();
        log.complete("a", 1.0, "r1", &[]);

        let decision = decide(
            &log,
            &key("d"),
            &parents(&["a", "b"]),
            0.0,
            &BTreeSet::new(),
            false,
            true,
        )
        .unwrap();

        assert!(decision.launch);
        assert_eq!(decision.next_cursor, 1.0);
    }

    #[test]
    fn rides_along_with_a_parent_launching_this_tick() {
        let log = FakeEventLog::new();
        // a has no completions, but a will launch in this tick.
        let launch_set = BTreeSet::from([key("a")]);

        let decision = decide(
            &log,
            &key("d"),
            &parents(&["a"]),
            0.0,
            &launch_set,
            true,
            true,
        )
        .unwrap();

        assert!(decision.launch);
        // timestamp is unknown, so the cursor does not advance past the prior value.
        assert_eq!(decision.next_cursor, 0.0);
    }

    #[test]
    fn co_materialization_advances_cursor_without_launching() {
        let log = FakeEventLog::new();
        // b completed at 6, and the same run also produced d.
        log.complete("b", 6.0, "r1", &["d"]);

        let decision = decide(
            &log,
            &key("d"),
            &parents(&["b"]),
            0.0,
            &BTreeSet::new(),
            true,
            true,
        )
        .unwrap();

        assert!(!decision.launch);
        assert_eq!(decision.next_cursor, 6.0);
    }

    #[test]
    fn in_flight_parent_defers_regardless_of_other_parents() {
        let log = FakeEventLog::new();
        log.complete("a", 1.0, "r1", &[]);
        log.plan_in_progress("c", "r2");

        let decision = decide(
            &log,
            &key("e"),
            &parents(&["a", "c"]),
            0.0,
            &BTreeSet::new(),
            false, // any-mode: would otherwise launch on a's completion alone
            true,
        )
        .unwrap();

        assert!(!decision.launch);
        assert_eq!(decision.next_cursor, 0.0);
    }

    #[test]
    fn in_flight_check_is_skipped_when_disabled() {
        let log = FakeEventLog::new();
        log.complete("a", 1.0, "r1", &[]);
        log.plan_in_progress("c", "r2");

        let decision = decide(
            &log,
            &key("e"),
            &parents(&["a", "c"]),
            0.0,
            &BTreeSet::new(),
            false,
            false,
        )
        .unwrap();

        assert!(decision.launch);
    }

    #[test]
    fn stale_completion_at_or_before_cursor_is_no_change() {
        let log = FakeEventLog::new();
        log.complete("a", 2.0, "r1", &[]);

        let decision = decide(
            &log,
            &key("d"),
            &parents(&["a"]),
            2.0,
            &BTreeSet::new(),
            true,
            true,
        )
        .unwrap();

        assert!(!decision.launch);
        assert_eq!(decision.next_cursor, 2.0);
    }
}
