// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use smallvec::SmallVec;

use crate::{LogicalQubit, RouteError};

/// Stable identity of a gate: its position in the input sequence. Two gates
/// equal by value are still distinguished by this index, which is what lets
/// them serve as distinct DAG nodes.
#[derive(Copy, Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct GateId(pub usize);

impl GateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The operation kind of a `GateInstruction`. Only `Unitary2Q` and `Swap`
/// participate in the dependency DAG; `Unitary1Q` and `Other` pass through
/// unrouted — they are restored by a separate interleaving pass downstream.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum GateKind {
    Unitary1Q,
    Unitary2Q,
    Swap,
    Other,
}

impl GateKind {
    pub fn is_two_qubit(self) -> bool {
        matches!(self, GateKind::Unitary2Q | GateKind::Swap)
    }
}

/// An ordered tuple of logical qubit operands, of length 1 or 2.
pub type Operands = SmallVec<[LogicalQubit; 2]>;

#[derive(Clone, Debug)]
pub struct GateInstruction {
    pub kind: GateKind,
    pub operands: Operands,
}

impl GateInstruction {
    pub fn one_qubit(kind: GateKind, qubit: LogicalQubit) -> Self {
        GateInstruction {
            kind,
            operands: Operands::from_slice(&[qubit]),
        }
    }

    pub fn two_qubit(kind: GateKind, a: LogicalQubit, b: LogicalQubit) -> Self {
        GateInstruction {
            kind,
            operands: Operands::from_slice(&[a, b]),
        }
    }

    pub fn is_two_qubit(&self) -> bool {
        self.kind.is_two_qubit() && self.operands.len() == 2
    }
}

/// An ordered finite sequence of `GateInstruction`s. Any reordering the
/// engine performs is limited to what the dependency DAG permits; the
/// `Circuit` itself never reorders.
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    instructions: Vec<GateInstruction>,
}

impl Circuit {
    pub fn new() -> Self {
        Circuit {
            instructions: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Circuit {
            instructions: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, instruction: GateInstruction) -> GateId {
        let id = GateId(self.instructions.len());
        self.instructions.push(instruction);
        id
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, id: GateId) -> &GateInstruction {
        &self.instructions[id.0]
    }

    pub fn instructions(&self) -> impl Iterator<Item = (GateId, &GateInstruction)> {
        self.instructions
            .iter()
            .enumerate()
            .map(|(i, inst)| (GateId(i), inst))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GateInstruction> {
        self.instructions.iter()
    }

    pub fn iter_rev(&self) -> impl Iterator<Item = &GateInstruction> {
        self.instructions.iter().rev()
    }

    /// A new circuit with instruction order reversed (used by the
    /// bidirectional refinement driver). Gate identities are reassigned to
    /// the reversed position, which is what lets the DAG builder treat the
    /// reversed circuit as an ordinary circuit.
    pub fn reverse(&self) -> Circuit {
        Circuit {
            instructions: self.instructions.iter().rev().cloned().collect(),
        }
    }

    /// Number of logical qubits referenced, assuming dense 0..n naming.
    pub fn num_qubits(&self) -> usize {
        self.instructions
            .iter()
            .flat_map(|inst| inst.operands.iter())
            .map(|q| q.index() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Validate operand well-formedness per `RouteError::MalformedCircuit*`:
    /// no two-qubit gate with equal operands, no out-of-range operand.
    pub fn validate(&self, num_logical_qubits: usize) -> Result<(), RouteError> {
        for (id, inst) in self.instructions() {
            for &q in inst.operands.iter() {
                if q.index() >= num_logical_qubits {
                    return Err(RouteError::MalformedCircuitOutOfRange { gate: id, qubit: q });
                }
            }
            if inst.operands.len() == 2 && inst.operands[0] == inst.operands[1] {
                return Err(RouteError::MalformedCircuitRepeatedOperand {
                    gate: id,
                    qubit: inst.operands[0],
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lq(i: usize) -> LogicalQubit {
        LogicalQubit::new(i)
    }

    #[test]
    fn reverse_preserves_length_and_reverses_order() {
        let mut circuit = Circuit::new();
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(0), lq(1)));
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(1), lq(2)));
        let reversed = circuit.reverse();
        assert_eq!(reversed.len(), circuit.len());
        assert_eq!(reversed.get(GateId(0)).operands[0], lq(1));
        assert_eq!(reversed.get(GateId(1)).operands[0], lq(0));
    }

    #[test]
    fn validate_rejects_repeated_operand() {
        let mut circuit = Circuit::new();
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(0), lq(0)));
        assert!(matches!(
            circuit.validate(4),
            Err(RouteError::MalformedCircuitRepeatedOperand { .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut circuit = Circuit::new();
        circuit.push(GateInstruction::two_qubit(GateKind::Unitary2Q, lq(0), lq(5)));
        assert!(matches!(
            circuit.validate(4),
            Err(RouteError::MalformedCircuitOutOfRange { .. })
        ));
    }
}
