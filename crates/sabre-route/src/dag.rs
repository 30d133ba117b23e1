// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use hashbrown::HashMap;
use itertools::Itertools;
use rustworkx_core::petgraph::prelude::*;

use sabre_circuit::{Circuit, GateId, GateKind, LogicalQubit};

/// Identity of a node in a [`SabreDag`]. Carries the originating gate's
/// stable circuit-position identity; the underlying petgraph index is not
/// exposed beyond this module's node-weight lookups.
pub type DagNodeId = NodeIndex;

/// Directed acyclic graph over the two-qubit gates of a `Circuit`. Edge
/// `u -> v` means `u` must execute before `v` because they share a logical
/// qubit with no other two-qubit gate between them on that qubit's wire.
pub struct SabreDag {
    pub graph: DiGraph<(GateId, GateKind, [LogicalQubit; 2]), ()>,
    pub first_layer: Vec<DagNodeId>,
}

impl SabreDag {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn qubits(&self, node: DagNodeId) -> [LogicalQubit; 2] {
        self.graph[node].2
    }

    pub fn gate_id(&self, node: DagNodeId) -> GateId {
        self.graph[node].0
    }

    pub fn kind(&self, node: DagNodeId) -> GateKind {
        self.graph[node].1
    }

    /// Successors of `node`, sorted by the original gate index. A two-qubit
    /// gate has at most one successor per operand qubit (at most two total),
    /// so this gives a small, cheap, deterministic traversal order that does
    /// not depend on petgraph's internal adjacency-list order.
    pub fn successors_in_order(&self, node: DagNodeId) -> Vec<DagNodeId> {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .sorted_by_key(|&n| self.graph[n].0)
            .collect()
    }
}

/// Scan `circuit` in order, maintaining `last[q]` = the most recent
/// two-qubit gate touching logical qubit `q`. Single-qubit and non-two-qubit
/// gates are not scheduled and do not appear in the DAG; see
/// [`crate::interleave`] for how they are reinstated into the final output.
pub fn build_dag(circuit: &Circuit) -> SabreDag {
    let mut graph: DiGraph<(GateId, GateKind, [LogicalQubit; 2]), ()> = DiGraph::new();
    let mut last: HashMap<LogicalQubit, DagNodeId> = HashMap::new();
    let mut first_layer = Vec::new();

    for (id, inst) in circuit.instructions() {
        if !inst.is_two_qubit() {
            continue;
        }
        let a = inst.operands[0];
        let b = inst.operands[1];
        let node = graph.add_node((id, inst.kind, [a, b]));

        let pred_a = last.get(&a).copied();
        let pred_b = last.get(&b).copied();
        if let Some(pa) = pred_a {
            graph.add_edge(pa, node, ());
        }
        if let Some(pb) = pred_b {
            if pred_b != pred_a {
                graph.add_edge(pb, node, ());
            }
        }
        if pred_a.is_none() && pred_b.is_none() {
            first_layer.push(node);
        }
        last.insert(a, node);
        last.insert(b, node);
    }

    SabreDag { graph, first_layer }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lq(i: usize) -> LogicalQubit {
        LogicalQubit::new(i)
    }

    #[test]
    fn chain_on_shared_qubit_is_a_simple_path() {
        let mut circuit = Circuit::new();
        circuit.push(sabre_circuit::GateInstruction::two_qubit(
            GateKind::Unitary2Q,
            lq(0),
            lq(1),
        ));
        circuit.push(sabre_circuit::GateInstruction::two_qubit(
            GateKind::Unitary2Q,
            lq(1),
            lq(2),
        ));
        circuit.push(sabre_circuit::GateInstruction::two_qubit(
            GateKind::Unitary2Q,
            lq(0),
            lq(2),
        ));
        let dag = build_dag(&circuit);
        assert_eq!(dag.node_count(), 3);
        assert_eq!(dag.first_layer.len(), 1);
        let first = dag.first_layer[0];
        assert_eq!(dag.gate_id(first), GateId(0));
        let succ = dag.successors_in_order(first);
        assert_eq!(succ.len(), 2);
    }

    #[test]
    fn independent_gates_both_start_in_front_layer() {
        let mut circuit = Circuit::new();
        circuit.push(sabre_circuit::GateInstruction::two_qubit(
            GateKind::Unitary2Q,
            lq(0),
            lq(1),
        ));
        circuit.push(sabre_circuit::GateInstruction::two_qubit(
            GateKind::Unitary2Q,
            lq(2),
            lq(3),
        ));
        let dag = build_dag(&circuit);
        assert_eq!(dag.first_layer.len(), 2);
    }

    #[test]
    fn single_qubit_gates_are_excluded() {
        let mut circuit = Circuit::new();
        circuit.push(sabre_circuit::GateInstruction::one_qubit(
            GateKind::Unitary1Q,
            lq(0),
        ));
        circuit.push(sabre_circuit::GateInstruction::two_qubit(
            GateKind::Unitary2Q,
            lq(0),
            lq(1),
        ));
        let dag = build_dag(&circuit);
        assert_eq!(dag.node_count(), 1);
    }
}
