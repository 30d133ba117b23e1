// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use crate::{GateId, LogicalQubit, PhysicalQubit};

/// Every error the routing core can surface. `ValidationFailure` is
/// deliberately absent: the validator returns its findings as a data value
/// (a map of offending gates), never as an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("gate {gate:?} has repeated operand {qubit:?}")]
    MalformedCircuitRepeatedOperand { gate: GateId, qubit: LogicalQubit },

    #[error("gate {gate:?} references out-of-range logical qubit {qubit:?}")]
    MalformedCircuitOutOfRange { gate: GateId, qubit: LogicalQubit },

    #[error("coupling graph is disconnected between physical qubits {a:?} and {b:?}")]
    DisconnectedCoupling { a: PhysicalQubit, b: PhysicalQubit },

    #[error("{logical} logical qubits exceed {physical} physical qubits")]
    SizeMismatch { logical: usize, physical: usize },

    #[error("initial mapping is not a bijection on its domain")]
    NonBijectiveMapping,

    #[error("exceeded iteration cap of {cap} with {remaining} gate(s) left in the front layer")]
    IterationCapExceeded { cap: usize, remaining: usize },
}
