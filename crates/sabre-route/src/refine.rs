// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use sabre_circuit::{Circuit, CouplingGraph, DistanceMatrix, RouteError};

use crate::dag::build_dag;
use crate::engine::{route_multi_trial, RoutingConfig, SabreOutput};
use crate::nlayout::Mapping;

/// Bidirectional refinement: alternately route the circuit forward and its
/// reverse, carrying the output mapping of each pass forward as the next
/// pass's starting point. The initial mapping is the only source of
/// randomness; everything after it is deterministic given `config`.
#[derive(Clone, Debug)]
pub struct RefineConfig {
    pub routing: RoutingConfig,
    /// Number of forward/backward pairs.
    pub iterations: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        RefineConfig {
            routing: RoutingConfig::default(),
            iterations: 3,
        }
    }
}

/// Run `config.iterations` forward/backward SABRE passes, each re-deriving
/// the dependency DAG from the circuit orientation of that pass. Returns the
/// final pass's routed output (over the *forward*-oriented circuit) together
/// with the mapping that output leaves the device in.
pub fn refine(
    circuit: &Circuit,
    coupling: &CouplingGraph,
    dist: &DistanceMatrix,
    initial_mapping: Mapping,
    config: &RefineConfig,
) -> Result<(SabreOutput, Mapping), RouteError> {
    let forward = circuit.clone();
    let backward = circuit.reverse();

    let mut mapping = initial_mapping;
    let mut last_forward_output: Option<SabreOutput> = None;

    for _ in 0..config.iterations.max(1) {
        let fwd_dag = build_dag(&forward);
        let (fwd_output, fwd_mapping) =
            route_multi_trial(&fwd_dag, &mapping, coupling, dist, &config.routing)?;
        last_forward_output = Some(fwd_output);
        mapping = fwd_mapping;

        let bwd_dag = build_dag(&backward);
        let (_, bwd_mapping) =
            route_multi_trial(&bwd_dag, &mapping, coupling, dist, &config.routing)?;
        mapping = bwd_mapping;
    }

    // One last forward pass with the refined mapping is the output actually
    // returned: the loop above always ends on a backward pass, whose mapping
    // is a good *starting* point but whose SabreOutput routes the reversed
    // circuit, not the one the caller wants executed.
    let fwd_dag = build_dag(&forward);
    let (output, final_mapping) =
        route_multi_trial(&fwd_dag, &mapping, coupling, dist, &config.routing)?;
    let _ = last_forward_output;
    Ok((output, final_mapping))
}

/// Run `trials` independent seeded [`refine`] attempts, each from its own
/// random initial mapping, and keep the one with fewest total inserted
/// SWAPs. `refine` itself always behaves as a single trial; this is an
/// additive, opt-in alternative.
pub fn refine_multi_trial(
    circuit: &Circuit,
    coupling: &CouplingGraph,
    dist: &DistanceMatrix,
    num_logical_qubits: usize,
    trials: usize,
    config: &RefineConfig,
) -> Result<(SabreOutput, Mapping), RouteError> {
    let mut rng = Pcg64Mcg::seed_from_u64(config.routing.seed);
    let mut best: Option<(usize, SabreOutput, Mapping)> = None;

    for trial in 0..trials.max(1) {
        let initial = Mapping::random(num_logical_qubits, coupling.num_qubits(), &mut rng)?;
        let trial_config = RefineConfig {
            routing: RoutingConfig {
                seed: config.routing.seed.wrapping_add(trial as u64 + 1),
                ..config.routing.clone()
            },
            iterations: config.iterations,
        };
        let (output, mapping) = refine(circuit, coupling, dist, initial, &trial_config)?;
        let swap_count: usize = output.swaps_before.values().map(|v| v.len()).sum();
        let better = match &best {
            None => true,
            Some((_, best_output, _)) => {
                let best_count: usize = best_output.swaps_before.values().map(|v| v.len()).sum();
                swap_count < best_count
            }
        };
        if better {
            best = Some((trial, output, mapping));
        }
    }
    let (_, output, mapping) = best.expect("trials is at least 1");
    Ok((output, mapping))
}
