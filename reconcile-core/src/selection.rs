use std::collections::BTreeSet;

use reconcile_types::AssetKey;

/// An asset selection expression.
///
/// The spec treats selection resolution against the asset/source-asset universe as an external
/// capability (the universe is injected by the repository-loading system, out of scope here), so
/// this is a small enum rather than a query-language parser: enough to express "watch everything",
/// "watch exactly these keys", and "watch the union of several selections", which is what a real
/// repository-definition loader would hand the sensor at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AssetSelection {
    /// Every asset in the universe.
    #[default]
    All,
    /// Exactly these keys.
    Keys(BTreeSet<AssetKey>),
    /// The union of several selections.
    Union(Vec<AssetSelection>),
}

impl AssetSelection {
    pub fn keys(keys: impl IntoIterator<Item = AssetKey>) -> Self {
        AssetSelection::Keys(keys.into_iter().collect())
    }

    /// Resolves this selection against a universe, returning the concrete set of matched keys.
    pub fn resolve(&self, universe: &dyn AssetUniverse) -> BTreeSet<AssetKey> {
        match self {
            AssetSelection::All => universe.all_keys(),
            AssetSelection::Keys(keys) => {
                keys.iter().filter(|k| universe.contains(k)).cloned().collect()
            }
            AssetSelection::Union(selections) => {
                selections.iter().flat_map(|s| s.resolve(universe)).collect()
            }
        }
    }
}

/// The asset/source-asset universe, as provided by the (out-of-scope) repository-definition
/// loading system.
///
/// A narrow capability trait rather than a concrete repository type, so the graph builder and its
/// tests don't depend on however a real deployment loads asset definitions.
pub trait AssetUniverse {
    /// Every key defined in the universe, including source assets.
    fn all_keys(&self) -> BTreeSet<AssetKey>;

    /// Whether `key` is defined in the universe.
    fn contains(&self, key: &AssetKey) -> bool;

    /// The direct (depth-1) parents of `key` in the full graph, excluding `key` itself.
    ///
    /// Implementations must not include `key` in its own parent set; the graph builder also
    /// filters this defensively (see [`crate::graph::build_upstream_map`]), but the contract
    /// belongs here.
    fn direct_parents(&self, key: &AssetKey) -> BTreeSet<AssetKey>;
}
