// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

//! The SABRE qubit-routing algorithm: dependency DAG construction, the
//! front-layer/extended-set heuristic search, bidirectional refinement, and
//! post-routing validation, built on the qubit and circuit types of
//! `sabre_circuit`.

pub mod dag;
pub mod engine;
pub mod heuristic;
pub mod interleave;
pub mod layer;
pub mod nlayout;
pub mod refine;
pub mod validate;

pub use dag::{build_dag, DagNodeId, SabreDag};
pub use engine::{materialize, route_multi_trial, run_sabre, RoutingConfig, SabreOutput};
pub use heuristic::Heuristic;
pub use interleave::interleave_single_qubit_gates;
pub use nlayout::Mapping;
pub use refine::{refine, refine_multi_trial, RefineConfig};
pub use sabre_circuit::{
    Circuit, CouplingGraph, DistanceMatrix, GateId, GateInstruction, GateKind, LogicalQubit,
    PhysicalQubit, RouteError,
};
pub use validate::{cnot_cost, validate};

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Build a random bijection on the used logical qubits and a same-size
/// subset of physical qubits, per the library's external interface
/// (`initial_mapping(circuit, coupling, rng)`).
pub fn initial_mapping(
    circuit: &Circuit,
    coupling: &CouplingGraph,
    rng: &mut impl rand::Rng,
) -> Result<Mapping, RouteError> {
    Mapping::random(circuit.num_qubits(), coupling.num_qubits(), rng)
}

/// Convenience seeded variant of [`initial_mapping`] for callers that do not
/// want to manage their own RNG instance.
pub fn seeded_initial_mapping(
    circuit: &Circuit,
    coupling: &CouplingGraph,
    seed: u64,
) -> Result<Mapping, RouteError> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    initial_mapping(circuit, coupling, &mut rng)
}

/// `distance_matrix(coupling) -> DistanceMatrix`, as named by the library's
/// external interface; a thin re-export of the data-model crate's own
/// constructor kept here for discoverability from `sabre_route`.
pub fn distance_matrix(coupling: &CouplingGraph) -> DistanceMatrix {
    DistanceMatrix::from_coupling(coupling)
}
