//! Ancestor and descendant indices over a leg tree.
//!
//! Built in two passes over a finished tree: a depth-first pass that
//! records, for every leg, the legs on the path above it, and an inversion
//! pass that turns those ancestor sets into descendant sets. Afterwards,
//! "does leg X come before leg Y" is a set lookup.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Leg, LegId};

type RelationMap = BTreeMap<LegId, BTreeSet<LegId>>;

/// Ancestor and descendant sets for every leg in a tree.
///
/// Leg ids are not unique across branches (a ferry leg is identified by
/// its trip alone). When the same id is reached along several paths its
/// sets are the union over all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegRelations {
    ancestors: RelationMap,
    descendants: RelationMap,
}

impl LegRelations {
    /// Index the tree rooted at `roots`.
    pub fn build(roots: &[Leg]) -> Self {
        let ancestors = collect_ancestors(roots);
        let descendants = invert(&ancestors);
        Self {
            ancestors,
            descendants,
        }
    }

    /// Legs that come before `id` on some path. `None` for unknown ids.
    pub fn ancestors_of(&self, id: &LegId) -> Option<&BTreeSet<LegId>> {
        self.ancestors.get(id)
    }

    /// Legs that come after `id` on some path. `None` for unknown ids.
    pub fn descendants_of(&self, id: &LegId) -> Option<&BTreeSet<LegId>> {
        self.descendants.get(id)
    }

    /// True if `earlier` is an ancestor of `later`.
    pub fn precedes(&self, earlier: &LegId, later: &LegId) -> bool {
        self.ancestors
            .get(later)
            .is_some_and(|set| set.contains(earlier))
    }

    /// True if `later` is a descendant of `earlier`.
    pub fn follows(&self, later: &LegId, earlier: &LegId) -> bool {
        self.precedes(earlier, later)
    }

    /// True if `leg` is `focus` itself or comes after it.
    ///
    /// Used to highlight everything that depends on one chosen leg.
    pub fn is_on_chain_of(&self, leg: &LegId, focus: &LegId) -> bool {
        leg == focus || self.precedes(focus, leg)
    }

    pub fn ancestors(&self) -> &BTreeMap<LegId, BTreeSet<LegId>> {
        &self.ancestors
    }

    pub fn descendants(&self) -> &BTreeMap<LegId, BTreeSet<LegId>> {
        &self.descendants
    }

    /// Number of distinct leg ids indexed.
    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }
}

/// Depth-first pass: every leg's ancestor set, unioned across paths.
fn collect_ancestors(roots: &[Leg]) -> RelationMap {
    fn visit<'a>(leg: &'a Leg, path: &mut Vec<&'a LegId>, out: &mut RelationMap) {
        let entry = out.entry(leg.id().clone()).or_default();
        entry.extend(
            path.iter()
                .filter(|id| **id != leg.id())
                .map(|id| (*id).clone()),
        );

        path.push(leg.id());
        for child in leg.children() {
            visit(child, path, out);
        }
        path.pop();
    }

    let mut out = RelationMap::new();
    let mut path = Vec::new();
    for root in roots {
        visit(root, &mut path, &mut out);
    }
    out
}

/// Inversion pass. Every indexed id gets an entry, possibly empty.
fn invert(ancestors: &RelationMap) -> RelationMap {
    let mut descendants: RelationMap = ancestors
        .keys()
        .map(|id| (id.clone(), BTreeSet::new()))
        .collect();
    for (id, above) in ancestors {
        for ancestor in above {
            descendants
                .entry(ancestor.clone())
                .or_default()
                .insert(id.clone());
        }
    }
    descendants
}
