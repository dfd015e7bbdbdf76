use std::collections::BTreeMap;
use std::collections::BTreeSet;

use reconcile_types::AssetKey;

use crate::selection::{AssetSelection, AssetUniverse};

/// Mapping from monitored child [`AssetKey`] to the set of its direct (depth-1) parents.
///
/// Parents that are themselves monitored children appear both as keys and as members of other
/// keys' parent sets. Parents outside the monitored set appear only as members: they still drive
/// updates, but are not themselves candidates for launch.
pub type UpstreamMap = BTreeMap<AssetKey, BTreeSet<AssetKey>>;

/// Resolves `selection` against `universe` into an [`UpstreamMap`] restricted to the resolved
/// children.
///
/// A selection resolving to the empty set is permitted and simply yields an empty map, which
/// makes every subsequent tick a no-op — the spec explicitly allows this rather than treating it
/// as an error.
pub fn build_upstream_map(selection: &AssetSelection, universe: &dyn AssetUniverse) -> UpstreamMap {
    let monitored = selection.resolve(universe);
    monitored
        .iter()
        .map(|child| {
            let mut parents = universe.direct_parents(child);
            // Defense in depth: a child is never its own parent, regardless of what the universe
            // reports. See the "self-loop produces no launch" invariant.
            parents.remove(child);
            (child.clone(), parents)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::test_support::FakeUniverse;

    fn key(s: &str) -> AssetKey {
        AssetKey::from_str(s)
    }

    #[test]
    fn restricts_to_resolved_children_but_keeps_external_parents() {
        // a -> d, b -> d, b -> e, c -> e, d -> f, e -> f; monitor only {d, e, f}
        let universe = FakeUniverse::with_edges(&[
            ("a", "d"),
            ("b", "d"),
            ("b", "e"),
            ("c", "e"),
            ("d", "f"),
            ("e", "f"),
        ]);
        let selection = AssetSelection::keys([key("d"), key("e"), key("f")]);

        let upstream = build_upstream_map(&selection, &universe);

        assert_eq!(upstream.len(), 3);
        assert_eq!(upstream[&key("d")], BTreeSet::from([key("a"), key("b")]));
        assert_eq!(upstream[&key("e")], BTreeSet::from([key("b"), key("c")]));
        assert_eq!(upstream[&key("f")], BTreeSet::from([key("d"), key("e")]));
    }

    #[test]
    fn empty_selection_yields_empty_map() {
        let universe = FakeUniverse::with_edges(&[("a", "d")]);
        let selection = AssetSelection::keys([]);
        assert!(build_upstream_map(&selection, &universe).is_empty());
    }

    #[test]
    fn self_loops_are_filtered() {
        let mut universe = FakeUniverse::with_edges(&[("a", "d")]);
        universe.parents.entry(key("d")).or_default().insert(key("d"));
        let selection = AssetSelection::keys([key("d")]);

        let upstream = build_upstream_map(&selection, &universe);

        assert_eq!(upstream[&key("d")], BTreeSet::from([key("a")]));
    }
}
