//! A planned itinerary: the expanded leg tree plus its relation index.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};

use crate::domain::{Leg, LegId, StopId};

use super::relations::LegRelations;

/// The result of planning a route.
#[derive(Debug, Clone)]
pub struct Itinerary {
    start: NaiveDateTime,
    stops: Vec<StopId>,
    legs: Vec<Leg>,
    relations: LegRelations,
}

/// One root-to-leaf path through an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSummary {
    /// Leg ids from root to leaf
    pub leg_ids: Vec<LegId>,
    /// Start of the first leg
    pub departure: NaiveDateTime,
    /// End of the last leg
    pub arrival: NaiveDateTime,
    /// Time spent moving
    pub travel: Duration,
    /// Time spent between legs
    pub waiting: Duration,
    /// False if the path ends in an unreachable pair
    pub complete: bool,
}

impl PathSummary {
    /// Total time from departure to arrival.
    pub fn total(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }
}

impl Itinerary {
    /// Wrap an expanded tree, indexing its relations.
    pub fn new(start: NaiveDateTime, stops: Vec<StopId>, legs: Vec<Leg>) -> Self {
        let relations = LegRelations::build(&legs);
        Self {
            start,
            stops,
            legs,
            relations,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    /// Root legs: the options for the first stop pair.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn relations(&self) -> &LegRelations {
        &self.relations
    }

    /// True if there is nothing to travel (fewer than two stops).
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Number of legs in the tree, counting repeated ids separately.
    pub fn leg_count(&self) -> usize {
        self.all_legs().count()
    }

    /// Number of error legs in the tree.
    pub fn error_count(&self) -> usize {
        self.all_legs().filter(|leg| leg.is_error()).count()
    }

    /// First leg with the given id, in depth-first order.
    pub fn find(&self, id: &LegId) -> Option<&Leg> {
        self.all_legs().find(|leg| leg.id() == id)
    }

    /// Ids of `focus` and every leg that follows it, or `None` if no leg has
    /// that id.
    pub fn chain_of(&self, focus: &LegId) -> Option<BTreeSet<LegId>> {
        self.relations.ancestors_of(focus)?;
        Some(
            self.relations
                .ancestors()
                .keys()
                .filter(|id| self.relations.is_on_chain_of(id, focus))
                .cloned()
                .collect(),
        )
    }

    /// Every root-to-leaf path, in depth-first order.
    pub fn paths(&self) -> Vec<PathSummary> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        for root in &self.legs {
            collect_paths(root, &mut path, &mut out);
        }
        out
    }

    fn all_legs(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter().flat_map(Leg::iter)
    }
}

fn collect_paths<'a>(leg: &'a Leg, path: &mut Vec<&'a Leg>, out: &mut Vec<PathSummary>) {
    path.push(leg);
    if leg.is_leaf() {
        out.push(summarize(path));
    } else {
        for child in leg.children() {
            collect_paths(child, path, out);
        }
    }
    path.pop();
}

/// Summarize a non-empty path.
fn summarize(path: &[&Leg]) -> PathSummary {
    let first = path[0];
    let last = path[path.len() - 1];

    let travel = path
        .iter()
        .fold(Duration::zero(), |acc, leg| acc + leg.duration());
    let waiting = path.windows(2).fold(Duration::zero(), |acc, pair| {
        let gap = pair[1].start().signed_duration_since(pair[0].end());
        acc + gap.max(Duration::zero())
    });

    PathSummary {
        leg_ids: path.iter().map(|leg| leg.id().clone()).collect(),
        departure: first.start(),
        arrival: last.end(),
        travel,
        waiting,
        complete: !path.iter().any(|leg| leg.is_error()),
    }
}
