// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use sabre_circuit::{DistanceMatrix, LogicalQubit};

use crate::dag::DagNodeId;
use crate::nlayout::Mapping;

/// The physical qubit `lq` would sit at if `swap` (a candidate, not-yet-
/// applied SWAP of two logical qubits) were applied to `mapping`.
fn tentative_phys(
    mapping: &Mapping,
    swap: [LogicalQubit; 2],
    lq: LogicalQubit,
) -> sabre_circuit::PhysicalQubit {
    if lq == swap[0] {
        mapping.phys(swap[1])
    } else if lq == swap[1] {
        mapping.phys(swap[0])
    } else {
        mapping.phys(lq)
    }
}

/// The set of DAG nodes with zero unexecuted predecessors. Stored as an
/// insertion-ordered list: membership is by node identity, not a multiset,
/// and iteration order must be stable for the engine to be deterministic.
#[derive(Clone, Debug, Default)]
pub struct FrontLayer {
    entries: Vec<(DagNodeId, LogicalQubit, LogicalQubit)>,
}

impl FrontLayer {
    pub fn new() -> Self {
        FrontLayer {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, node: DagNodeId, a: LogicalQubit, b: LogicalQubit) {
        self.entries.push((node, a, b));
    }

    pub fn remove(&mut self, node: DagNodeId) {
        self.entries.retain(|&(n, _, _)| n != node);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DagNodeId, LogicalQubit, LogicalQubit)> + '_ {
        self.entries.iter().copied()
    }

    pub fn contains_qubit(&self, lq: LogicalQubit) -> bool {
        self.entries.iter().any(|&(_, a, b)| a == lq || b == lq)
    }

    /// `f_dist`: the mean coupling-graph distance, under `mapping` with
    /// `swap` tentatively applied, between the operands of every gate
    /// currently in the front layer.
    pub fn score(&self, swap: [LogicalQubit; 2], mapping: &Mapping, dist: &DistanceMatrix) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: usize = self
            .entries
            .iter()
            .map(|&(_, a, b)| {
                let pa = tentative_phys(mapping, swap, a);
                let pb = tentative_phys(mapping, swap, b);
                dist.get(pa, pb)
            })
            .sum();
        total as f64 / self.entries.len() as f64
    }
}

/// A bounded look-ahead window of DAG successors of the front layer, used to
/// keep the heuristic from being myopic. Capped at exactly
/// [`crate::heuristic::EXTENDED_SET_SIZE`] entries.
#[derive(Clone, Debug)]
pub struct ExtendedSet {
    entries: Vec<(DagNodeId, LogicalQubit, LogicalQubit)>,
    cap: usize,
}

impl ExtendedSet {
    pub fn new(cap: usize) -> Self {
        ExtendedSet {
            entries: Vec::with_capacity(cap),
            cap,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.cap
    }

    pub fn push(&mut self, node: DagNodeId, a: LogicalQubit, b: LogicalQubit) {
        if !self.is_full() {
            self.entries.push((node, a, b));
        }
    }

    /// The un-weighted sum-mean distance; the caller applies the look-ahead
    /// weight on top of this.
    pub fn score(&self, swap: [LogicalQubit; 2], mapping: &Mapping, dist: &DistanceMatrix) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: usize = self
            .entries
            .iter()
            .map(|&(_, a, b)| {
                let pa = tentative_phys(mapping, swap, a);
                let pb = tentative_phys(mapping, swap, b);
                dist.get(pa, pb)
            })
            .sum();
        total as f64 / self.entries.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustworkx_core::petgraph::graph::NodeIndex;
    use sabre_circuit::CouplingGraph;

    fn lq(i: usize) -> LogicalQubit {
        LogicalQubit::new(i)
    }

    #[test]
    fn front_layer_score_uses_tentative_swap() {
        let graph = CouplingGraph::from_edges(3, [(0, 1), (1, 2)]);
        let dist = DistanceMatrix::from_coupling(&graph);
        let mapping = Mapping::identity(3);
        let mut front = FrontLayer::new();
        front.insert(NodeIndex::new(0), lq(0), lq(2));
        // Without the swap, distance(0,2) = 2.
        assert_eq!(front.score([lq(5), lq(6)], &mapping, &dist), 2.0);
        // Swapping logical 1 and 2 moves logical 2 to physical 1, distance 1.
        assert_eq!(front.score([lq(1), lq(2)], &mapping, &dist), 1.0);
    }

    #[test]
    fn extended_set_caps_at_configured_size() {
        let mut ext = ExtendedSet::new(2);
        ext.push(NodeIndex::new(0), lq(0), lq(1));
        ext.push(NodeIndex::new(1), lq(1), lq(2));
        ext.push(NodeIndex::new(2), lq(2), lq(3));
        assert_eq!(ext.len(), 2);
        assert!(ext.is_full());
    }

    #[test]
    fn empty_extended_set_scores_zero() {
        let ext = ExtendedSet::new(20);
        let mapping = Mapping::identity(2);
        let graph = CouplingGraph::from_edges(2, [(0, 1)]);
        let dist = DistanceMatrix::from_coupling(&graph);
        assert_eq!(ext.score([lq(0), lq(1)], &mapping, &dist), 0.0);
    }
}
