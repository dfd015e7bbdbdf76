use std::collections::BTreeMap;
use std::collections::BTreeSet;

use reconcile_types::AssetKey;

use crate::error::ReconcileError;
use crate::graph::UpstreamMap;

/// Produces a deterministic linearization of `upstream`'s monitored children such that if `a` is
/// a parent of `b` and both are monitored, `a` precedes `b`.
///
/// Kahn's algorithm, processing each in-degree-zero layer in canonical-string order so that ties
/// within a layer (siblings with no dependency between them) resolve the same way on every call.
/// Parents outside the monitored set (external or source assets) impose no ordering constraint
/// between monitored children, since they are never themselves scheduled.
pub fn topological_order(upstream: &UpstreamMap) -> Result<Vec<AssetKey>, ReconcileError> {
    let monitored: BTreeSet<&AssetKey> = upstream.keys().collect();

    // in_degree counts only edges from parents that are themselves monitored.
    let mut in_degree: BTreeMap<AssetKey, usize> = upstream
        .keys()
        .map(|child| {
            let degree = upstream[child].iter().filter(|p| monitored.contains(p)).count();
            (child.clone(), degree)
        })
        .collect();

    let mut children_of: BTreeMap<AssetKey, Vec<AssetKey>> = BTreeMap::new();
    for (child, parents) in upstream {
        for parent in parents {
            if monitored.contains(parent) {
                children_of.entry(parent.clone()).or_default().push(child.clone());
            }
        }
    }

    // Keyed by canonical string rather than `AssetKey`'s derived `Ord`: the derived order is
    // lexicographic over path segments, which disagrees with canonical-string order once a
    // segment contains a character that sorts differently than '/' (e.g. "a-b" vs ["a", "z"]).
    // A `BTreeMap<String, _>` keeps the ready frontier sorted by canonical string automatically,
    // so popping the first entry always yields the next node in deterministic order, even across
    // layers that interleave (a child can become ready while an earlier layer is still draining).
    let mut ready: BTreeMap<String, AssetKey> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(key, _)| (key.canonical(), key.clone()))
        .collect();

    let mut order = Vec::with_capacity(upstream.len());
    while let Some(next_canonical) = ready.keys().next().cloned() {
        let next = ready.remove(&next_canonical).expect("just read this key");
        order.push(next.clone());
        if let Some(children) = children_of.get(&next) {
            for child in children {
                let degree = in_degree.get_mut(child).expect("child tracked in in_degree");
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(child.canonical(), child.clone());
                }
            }
        }
    }

    if order.len() != upstream.len() {
        let stuck = upstream
            .keys()
            .find(|k| !order.contains(*k))
            .expect("fewer ordered than total implies a stuck key exists")
            .clone();
        return Err(ReconcileError::CycleDetected(stuck));
    }

    Ok(order)
}
