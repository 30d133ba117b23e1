// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use std::collections::BTreeMap;

use sabre_circuit::{Circuit, CouplingGraph, GateId, GateKind, PhysicalQubit};

use crate::nlayout::Mapping;

/// Replay `circuit` (an already-routed `OutputCircuit`, SWAPs included) under
/// a copy of `initial_mapping`: absorb every SWAP into the mapping, and for
/// every other two-qubit gate check that its operands currently sit on
/// adjacent physical qubits. Returns the offending gates keyed by `GateId`
/// with the physical endpoints they actually landed on; an empty map is
/// success.
pub fn validate(
    circuit: &Circuit,
    initial_mapping: &Mapping,
    coupling: &CouplingGraph,
) -> BTreeMap<GateId, (PhysicalQubit, PhysicalQubit)> {
    let mut mapping = initial_mapping.clone();
    let mut offenders = BTreeMap::new();

    for (id, inst) in circuit.instructions() {
        if !inst.is_two_qubit() {
            continue;
        }
        let a = inst.operands[0];
        let b = inst.operands[1];
        if inst.kind == GateKind::Swap {
            mapping.swap_logical(a, b);
            continue;
        }
        let pa = mapping.phys(a);
        let pb = mapping.phys(b);
        if !coupling.has_edge(pa, pb) {
            offenders.insert(id, (pa, pb));
        }
    }
    offenders
}

/// CNOT-equivalent cost: every two-qubit unitary gate counts 1, every SWAP
/// counts 3 (a SWAP decomposes into 3 CNOTs on real hardware), everything
/// else counts 0.
pub fn cnot_cost(circuit: &Circuit) -> usize {
    circuit
        .iter()
        .map(|inst| match inst.kind {
            GateKind::Unitary2Q if inst.is_two_qubit() => 1,
            GateKind::Swap if inst.is_two_qubit() => 3,
            _ => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::build_dag;
    use crate::engine::{materialize, run_sabre, RoutingConfig};
    use sabre_circuit::{DistanceMatrix, GateInstruction, LogicalQubit};

    fn lq(i: usize) -> LogicalQubit {
        LogicalQubit::new(i)
    }

    #[test]
    fn validate_accepts_a_routed_circuit() {
        let mut circuit = Circuit::new();
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(0), lq(3)));
        let dag = build_dag(&circuit);
        let coupling = CouplingGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let dist = DistanceMatrix::from_coupling(&coupling);
        let mapping = Mapping::identity(4);
        let (output, _) =
            run_sabre(&dag, mapping.clone(), &coupling, &dist, &RoutingConfig::default()).unwrap();
        let flat = materialize(&output, &circuit);
        let offenders = validate(&flat, &mapping, &coupling);
        assert!(offenders.is_empty());
    }

    #[test]
    fn validate_flags_a_gate_left_on_non_adjacent_qubits() {
        let mut circuit = Circuit::new();
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(0), lq(3)));
        let coupling = CouplingGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let mapping = Mapping::identity(4);
        let offenders = validate(&circuit, &mapping, &coupling);
        assert_eq!(offenders.len(), 1);
        assert_eq!(offenders[&GateId(0)], (PhysicalQubit::new(0), PhysicalQubit::new(3)));
    }

    #[test]
    fn cnot_cost_weights_swaps_at_three() {
        let mut circuit = Circuit::new();
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(0), lq(1)));
        circuit.push(GateInstruction::two_qubit(GateKind::Swap, lq(1), lq(2)));
        assert_eq!(cnot_cost(&circuit), 1 + 3);
    }

    #[test]
    fn idempotent_validation_routes_with_zero_swaps() {
        let mut circuit = Circuit::new();
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(0), lq(3)));
        let dag = build_dag(&circuit);
        let coupling = CouplingGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let dist = DistanceMatrix::from_coupling(&coupling);
        let mapping = Mapping::identity(4);
        let (output, final_mapping) =
            run_sabre(&dag, mapping.clone(), &coupling, &dist, &RoutingConfig::default()).unwrap();
        let flat = materialize(&output, &circuit);
        assert!(validate(&flat, &mapping, &coupling).is_empty());

        // Re-routing the already-routed circuit from the *original* initial
        // mapping (the mapping it was validated against) must insert no
        // further SWAPs and land on the same final mapping.
        let reroute_dag = build_dag(&flat);
        let (reroute_output, reroute_mapping) = run_sabre(
            &reroute_dag,
            mapping.clone(),
            &coupling,
            &dist,
            &RoutingConfig::default(),
        )
        .unwrap();
        assert!(reroute_output.swaps_before.is_empty());
        for i in 0..4 {
            assert_eq!(reroute_mapping.phys(lq(i)), final_mapping.phys(lq(i)));
        }
    }
}
