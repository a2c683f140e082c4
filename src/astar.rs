use fxhash::FxBuildHasher;
/// This module implements a variant of
/// [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
/// which keeps its search tree around after the search, so that a best-effort path to the
/// closest visited node can be retraced when the goal turns out to be unreachable, and so
/// that per-node costs can be inspected for debugging.
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::debug;
use num_traits::Zero;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
    sequence: usize,
}

impl<K: PartialOrd> Eq for SmallestCostHolder<K> {}

impl<K: PartialOrd> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then creates subordering
        // based on cost, favoring exploration of smallest cost nodes first.
        // Remaining ties go to the entry pushed first.
        let by_cost = |a: &K, b: &K| a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match by_cost(&other.estimated_cost, &self.estimated_cost) {
            Ordering::Equal => match by_cost(&self.cost, &other.cost) {
                Ordering::Equal => other.sequence.cmp(&self.sequence),
                s => s,
            },
            s => s,
        }
    }
}

/// Per-node record of a search: cost from the start, heuristic estimate to the goal, and the
/// index of the node it was reached from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visit<C> {
    pub parent: usize,
    pub cost: C,
    pub heuristic: C,
    pub closed: bool,
}

/// How a search ended, as an index into its [SearchTree].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reached {
    /// The goal was expanded.
    Goal(usize),
    /// The open set ran dry; this is the closed node with the smallest heuristic.
    Closest(usize),
}

impl Reached {
    pub fn index(&self) -> usize {
        match *self {
            Reached::Goal(ix) | Reached::Closest(ix) => ix,
        }
    }
}

/// Every node a search touched, in discovery order. The start node has index 0.
#[derive(Clone, Debug)]
pub struct SearchTree<N: Eq + Hash, C> {
    visits: FxIndexMap<N, Visit<C>>,
    closed: Vec<usize>,
    reached: Reached,
}

impl<N, C> SearchTree<N, C>
where
    N: Eq + Hash + Clone,
{
    pub fn reached(&self) -> Reached {
        self.reached
    }
    pub fn visit(&self, node: &N) -> Option<&Visit<C>> {
        self.visits.get(node)
    }
    pub fn node(&self, index: usize) -> Option<&N> {
        self.visits.get_index(index).map(|(node, _)| node)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&N, &Visit<C>)> {
        self.visits.iter()
    }
    /// Closed nodes in the order they were expanded.
    pub fn closed(&self) -> impl Iterator<Item = &N> {
        self.closed.iter().filter_map(|&ix| self.node(ix))
    }
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }
    /// Nodes from the start up to and including the node at `index`.
    pub fn path_to(&self, index: usize) -> Vec<N> {
        let mut path: Vec<N> = std::iter::successors(self.visits.get_index(index), |(_, visit)| {
            self.visits.get_index(visit.parent)
        })
        .map(|(node, _)| node.clone())
        .collect();
        path.reverse();
        path
    }
}

/// A* from `start` until `success` holds for an expanded node. If the open set is exhausted
/// first, the closed node with the smallest heuristic is reported instead; ties go to the
/// node closed first.
pub fn astar_with_fallback<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> SearchTree<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + PartialOrd + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    let start_h = heuristic(start);
    to_see.push(SmallestCostHolder {
        estimated_cost: start_h,
        cost: Zero::zero(),
        index: 0,
        sequence: 0,
    });
    let mut sequence = 1;
    let mut visits: FxIndexMap<N, Visit<C>> = FxIndexMap::default();
    visits.insert(
        start.clone(),
        Visit {
            parent: usize::MAX,
            cost: Zero::zero(),
            heuristic: start_h,
            closed: false,
        },
    );
    let mut closed: Vec<usize> = Vec::new();
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let successors = {
            let Some((node, visit)) = visits.get_index_mut(index) else {
                continue;
            };
            // A node may have been pushed several times if a cheaper way to it was found;
            // only the entry matching its best cost is expanded.
            if visit.closed || cost > visit.cost {
                continue;
            }
            visit.closed = true;
            closed.push(index);
            if success(node) {
                return SearchTree {
                    visits,
                    closed,
                    reached: Reached::Goal(index),
                };
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match visits.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert(Visit {
                        parent: index,
                        cost: new_cost,
                        heuristic: h,
                        closed: false,
                    });
                }
                Occupied(mut e) => {
                    if !e.get().closed && new_cost < e.get().cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert(Visit {
                            parent: index,
                            cost: new_cost,
                            heuristic: h,
                            closed: false,
                        });
                    } else {
                        continue;
                    }
                }
            }

            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
                sequence,
            });
            sequence += 1;
        }
    }
    debug!("Open set exhausted after closing {} nodes", closed.len());
    let mut closest = 0;
    for &ix in &closed {
        if visits[ix].heuristic < visits[closest].heuristic {
            closest = ix;
        }
    }
    SearchTree {
        visits,
        closed,
        reached: Reached::Closest(closest),
    }
}
