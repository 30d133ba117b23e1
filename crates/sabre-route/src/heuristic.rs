// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use sabre_circuit::{DistanceMatrix, LogicalQubit};

use crate::layer::{ExtendedSet, FrontLayer};
use crate::nlayout::Mapping;

/// Size of the extended-set look-ahead window.
pub const EXTENDED_SET_SIZE: usize = 20;
/// Per-swap decay increment.
pub const DECAY_RATE: f64 = 0.001;
/// Initial (and post-reset) decay value.
pub const DECAY_INITIAL: f64 = 0.001;
/// Weight of the look-ahead window relative to the front layer.
pub const EXTENDED_SET_WEIGHT: f64 = 0.5;

/// Selectable scoring strategies: front-layer distance alone, with a
/// look-ahead term, or with both a look-ahead term and a decay penalty.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Heuristic {
    Basic,
    Lookahead,
    Decay,
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::Decay
    }
}

/// Per-logical-qubit penalty, discouraging consecutive SWAPs on the same
/// qubits. Reset to `DECAY_INITIAL` whenever any gate executes out of the
/// front layer; accumulated only across consecutive swap-selection steps.
#[derive(Clone, Debug)]
pub struct DecayVector {
    values: Vec<f64>,
}

impl DecayVector {
    pub fn new(len: usize) -> Self {
        DecayVector {
            values: vec![DECAY_INITIAL; len],
        }
    }

    pub fn reset(&mut self) {
        self.values.fill(DECAY_INITIAL);
    }

    pub fn bump(&mut self, a: LogicalQubit, b: LogicalQubit) {
        self.values[a.index()] += DECAY_RATE;
        self.values[b.index()] += DECAY_RATE;
    }

    pub fn max_of(&self, a: LogicalQubit, b: LogicalQubit) -> f64 {
        self.values[a.index()].max(self.values[b.index()])
    }
}

/// Score a candidate SWAP on logical qubits `swap`; lower is better.
pub fn score_swap(
    heuristic: Heuristic,
    swap: [LogicalQubit; 2],
    front_layer: &FrontLayer,
    extended_set: &ExtendedSet,
    mapping: &Mapping,
    dist: &DistanceMatrix,
    decay: &DecayVector,
) -> f64 {
    let f_dist = front_layer.score(swap, mapping, dist);
    match heuristic {
        Heuristic::Basic => f_dist,
        Heuristic::Lookahead => {
            f_dist + EXTENDED_SET_WEIGHT * extended_set.score(swap, mapping, dist)
        }
        Heuristic::Decay => {
            let e_dist = extended_set.score(swap, mapping, dist);
            decay.max_of(swap[0], swap[1]) * (f_dist + EXTENDED_SET_WEIGHT * e_dist)
        }
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
    fn decay_resets_to_initial() {
        let mut decay = DecayVector::new(3);
        decay.bump(lq(0), lq(1));
        assert!(decay.max_of(lq(0), lq(1)) > DECAY_INITIAL);
        decay.reset();
        assert_eq!(decay.max_of(lq(0), lq(1)), DECAY_INITIAL);
    }

    #[test]
    fn decay_heuristic_scales_with_max_decay() {
        let graph = CouplingGraph::from_edges(3, [(0, 1), (1, 2)]);
        let dist = DistanceMatrix::from_coupling(&graph);
        let mapping = Mapping::identity(3);
        let mut front = FrontLayer::new();
        front.insert(NodeIndex::new(0), lq(0), lq(2));
        let ext = ExtendedSet::new(EXTENDED_SET_SIZE);
        let mut decay = DecayVector::new(3);
        let low = score_swap(
            Heuristic::Decay,
            [lq(1), lq(2)],
            &front,
            &ext,
            &mapping,
            &dist,
            &decay,
        );
        decay.bump(lq(1), lq(2));
        let high = score_swap(
            Heuristic::Decay,
            [lq(1), lq(2)],
            &front,
            &ext,
            &mapping,
            &dist,
            &decay,
        );
        assert!(high > low);
    }

    #[test]
    fn basic_heuristic_ignores_extended_set_and_decay() {
        let graph = CouplingGraph::from_edges(3, [(0, 1), (1, 2)]);
        let dist = DistanceMatrix::from_coupling(&graph);
        let mapping = Mapping::identity(3);
        let mut front = FrontLayer::new();
        front.insert(NodeIndex::new(0), lq(0), lq(2));
        let mut ext = ExtendedSet::new(EXTENDED_SET_SIZE);
        ext.push(NodeIndex::new(1), lq(0), lq(1));
        let decay = DecayVector::new(3);
        let score = score_swap(
            Heuristic::Basic,
            [lq(1), lq(2)],
            &front,
            &ext,
            &mapping,
            &dist,
            &decay,
        );
        assert_eq!(score, front.score([lq(1), lq(2)], &mapping, &dist));
    }
}
