// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use rand::seq::SliceRandom;
use rand::Rng;

use sabre_circuit::{LogicalQubit, PhysicalQubit, RouteError};

/// A bijection between logical and physical qubits, stored as two mutually
/// inverse arrays. Logical qubit indices beyond the circuit's own qubit
/// count are ancillas with no operand ever referencing them; padding the
/// domain out to the full device size this way is what keeps `L2P`/`P2L`
/// total bijections rather than partial ones.
#[derive(Clone, Debug)]
pub struct Mapping {
    logical_to_physical: Vec<PhysicalQubit>,
    physical_to_logical: Vec<LogicalQubit>,
}

impl Mapping {
    pub fn identity(num_qubits: usize) -> Self {
        Mapping {
            logical_to_physical: (0..num_qubits).map(PhysicalQubit::new).collect(),
            physical_to_logical: (0..num_qubits).map(LogicalQubit::new).collect(),
        }
    }

    /// Build from an explicit logical-to-physical assignment, validating
    /// that it is a bijection onto `0..num_physical_qubits`.
    pub fn from_assignment(
        logical_to_physical: Vec<PhysicalQubit>,
        num_physical_qubits: usize,
    ) -> Result<Self, RouteError> {
        if logical_to_physical.len() != num_physical_qubits {
            return Err(RouteError::SizeMismatch {
                logical: logical_to_physical.len(),
                physical: num_physical_qubits,
            });
        }
        let mut physical_to_logical = vec![LogicalQubit::new(usize::MAX); num_physical_qubits];
        for (logical, &physical) in logical_to_physical.iter().enumerate() {
            let slot = &mut physical_to_logical[physical.index()];
            if slot.index() != usize::MAX {
                return Err(RouteError::NonBijectiveMapping);
            }
            *slot = LogicalQubit::new(logical);
        }
        Ok(Mapping {
            logical_to_physical,
            physical_to_logical,
        })
    }

    /// A uniformly random bijection over `0..num_physical_qubits`, seedable
    /// via the caller-supplied RNG for deterministic tests. Requires
    /// `num_logical_qubits <= num_physical_qubits`; the caller is
    /// responsible for treating qubits beyond `num_logical_qubits` as
    /// ancillas.
    pub fn random(
        num_logical_qubits: usize,
        num_physical_qubits: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, RouteError> {
        if num_logical_qubits > num_physical_qubits {
            return Err(RouteError::SizeMismatch {
                logical: num_logical_qubits,
                physical: num_physical_qubits,
            });
        }
        let mut physical: Vec<usize> = (0..num_physical_qubits).collect();
        physical.shuffle(rng);
        let logical_to_physical = physical.into_iter().map(PhysicalQubit::new).collect();
        Mapping::from_assignment(logical_to_physical, num_physical_qubits)
    }

    pub fn num_qubits(&self) -> usize {
        self.logical_to_physical.len()
    }

    pub fn phys(&self, lq: LogicalQubit) -> PhysicalQubit {
        self.logical_to_physical[lq.index()]
    }

    pub fn log(&self, pq: PhysicalQubit) -> LogicalQubit {
        self.physical_to_logical[pq.index()]
    }

    /// Exchange the physical assignments of two logical qubits. This is the
    /// operation used both when the engine decides to insert a SWAP, and
    /// when a validator absorbs an existing SWAP gate from a circuit.
    pub fn swap_logical(&mut self, a: LogicalQubit, b: LogicalQubit) {
        if a == b {
            return;
        }
        let pa = self.phys(a);
        let pb = self.phys(b);
        self.logical_to_physical[a.index()] = pb;
        self.logical_to_physical[b.index()] = pa;
        self.physical_to_logical[pa.index()] = b;
        self.physical_to_logical[pb.index()] = a;
    }
}
