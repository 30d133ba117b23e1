// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use sabre_circuit::{Circuit, GateId, GateInstruction, GateKind, LogicalQubit};

use crate::engine::SabreOutput;

/// Re-insert every single-qubit gate of `circuit` into a routed `output`,
/// immediately before the earliest two-qubit gate in the output that follows
/// it, on that logical qubit's own original timeline. Single-qubit gates
/// trailing the last two-qubit gate on a qubit are appended after it; a
/// qubit touched by no two-qubit gate at all keeps its original order,
/// appended at the end. SWAPs inserted by routing are left exactly where
/// routing placed them, immediately before the two-qubit gate they route
/// for; this pass only restores what the dependency DAG excludes from
/// scheduling, it never moves an inserted SWAP.
pub fn interleave_single_qubit_gates(output: &SabreOutput, circuit: &Circuit) -> Circuit {
    let num_qubits = circuit.num_qubits();
    let mut per_qubit_timeline: Vec<Vec<GateId>> = vec![Vec::new(); num_qubits];
    for (id, inst) in circuit.instructions() {
        for &q in inst.operands.iter() {
            per_qubit_timeline[q.index()].push(id);
        }
    }
    let mut cursor = vec![0usize; num_qubits];

    let mut result = Circuit::with_capacity(circuit.len());
    for &gid in &output.gate_order {
        if let Some(swaps) = output.swaps_before.get(&gid) {
            for &[a, b] in swaps {
                result.push(GateInstruction::two_qubit(GateKind::Swap, a, b));
            }
        }
        let inst = circuit.get(gid);
        let operands: Vec<LogicalQubit> = inst.operands.iter().copied().collect();
        for q in operands {
            flush_singles_before(&mut result, circuit, &per_qubit_timeline, &mut cursor, q, gid);
        }
        result.push(circuit.get(gid).clone());
    }

    for q in 0..num_qubits {
        flush_remaining_singles(&mut result, circuit, &per_qubit_timeline, &mut cursor, LogicalQubit::new(q));
    }
    result
}

/// Push every single-qubit gate on `qubit`'s timeline up to (but not
/// including) `target`, then step past `target` itself. Any other two-qubit
/// gate encountered first is skipped without being pushed here — it was (or
/// will be) emitted by its own entry in `output.gate_order`.
fn flush_singles_before(
    result: &mut Circuit,
    circuit: &Circuit,
    per_qubit_timeline: &[Vec<GateId>],
    cursor: &mut [usize],
    qubit: LogicalQubit,
    target: GateId,
) {
    let qi = qubit.index();
    while cursor[qi] < per_qubit_timeline[qi].len() && per_qubit_timeline[qi][cursor[qi]] != target {
        let gid = per_qubit_timeline[qi][cursor[qi]];
        let inst = circuit.get(gid);
        if !inst.is_two_qubit() {
            result.push(inst.clone());
        }
        cursor[qi] += 1;
    }
    if cursor[qi] < per_qubit_timeline[qi].len() {
        cursor[qi] += 1;
    }
}

fn flush_remaining_singles(
    result: &mut Circuit,
    circuit: &Circuit,
    per_qubit_timeline: &[Vec<GateId>],
    cursor: &mut [usize],
    qubit: LogicalQubit,
) {
    let qi = qubit.index();
    while cursor[qi] < per_qubit_timeline[qi].len() {
        let gid = per_qubit_timeline[qi][cursor[qi]];
        let inst = circuit.get(gid);
        if !inst.is_two_qubit() {
            result.push(inst.clone());
        }
        cursor[qi] += 1;
    }
}
