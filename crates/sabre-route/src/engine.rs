// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use hashbrown::HashMap;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;

use sabre_circuit::{CouplingGraph, DistanceMatrix, GateId, LogicalQubit, RouteError};

use crate::dag::{DagNodeId, SabreDag};
use crate::heuristic::{score_swap, DecayVector, Heuristic, EXTENDED_SET_SIZE};
use crate::layer::{ExtendedSet, FrontLayer};
use crate::nlayout::Mapping;

/// Tunables for a SABRE run, passed explicitly rather than read from the
/// environment or a config file.
#[derive(Clone, Debug)]
pub struct RoutingConfig {
    pub heuristic: Heuristic,
    pub seed: u64,
    /// Global iteration cap = `iteration_cap_multiplier * gate_count`.
    pub iteration_cap_multiplier: usize,
    /// Local escape hatch: number of non-progressing swap-selection steps
    /// tolerated before falling back to a greedy shortest-path insertion for
    /// the front-layer gate closest to being routable.
    pub max_steps_without_progress: Option<usize>,
    /// Number of independent seeded trials `route_multi_trial` should run.
    pub trials: usize,
    pub parallel: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            heuristic: Heuristic::default(),
            seed: 0,
            iteration_cap_multiplier: 1000,
            max_steps_without_progress: None,
            trials: 1,
            parallel: false,
        }
    }
}

/// The traversal order of originally-two-qubit gates, plus the SWAPs that
/// must be emitted immediately before each one. Gate identity and ordering
/// is tracked separately from the swap prefixes, rather than flattening
/// everything into one gate stream up front.
#[derive(Clone, Debug, Default)]
pub struct SabreOutput {
    pub gate_order: Vec<GateId>,
    pub swaps_before: HashMap<GateId, Vec<[LogicalQubit; 2]>>,
}

/// Run one SABRE pass: consume executable gates from the front layer; when
/// none remain, pick the best SWAP by heuristic, emit it, update the mapping
/// and decay, and repeat until the front layer is empty.
pub fn run_sabre(
    dag: &SabreDag,
    mut mapping: Mapping,
    coupling: &CouplingGraph,
    dist: &DistanceMatrix,
    config: &RoutingConfig,
) -> Result<(SabreOutput, Mapping), RouteError> {
    check_reachable(dag, &mapping, dist)?;

    let num_logical = mapping.num_qubits();

    let mut front_layer = FrontLayer::new();
    for &node in &dag.first_layer {
        let [a, b] = dag.qubits(node);
        front_layer.insert(node, a, b);
    }

    let mut extended_set = ExtendedSet::new(EXTENDED_SET_SIZE);
    populate_extended_set(&mut extended_set, dag, &front_layer);

    let mut decay = DecayVector::new(num_logical);
    let mut output = SabreOutput::default();
    let max_iterations = config
        .iteration_cap_multiplier
        .saturating_mul(dag.node_count().max(1));
    let mut iterations = 0usize;

    // Swaps chosen since the last gate was routed; attached to the first
    // gate of the next ready-sweep.
    let mut pending_swaps: Vec<[LogicalQubit; 2]> = Vec::new();
    let mut steps_without_progress = 0usize;
    let progress_threshold = config
        .max_steps_without_progress
        .unwrap_or_else(|| 10 * coupling.num_qubits().max(1));

    while !front_layer.is_empty() {
        iterations += 1;
        if iterations > max_iterations {
            return Err(RouteError::IterationCapExceeded {
                cap: max_iterations,
                remaining: front_layer.len(),
            });
        }

        let ready: Vec<DagNodeId> = front_layer
            .iter()
            .filter(|&(_, a, b)| coupling.has_edge(mapping.phys(a), mapping.phys(b)))
            .map(|(node, _, _)| node)
            .collect();

        if !ready.is_empty() {
            if !pending_swaps.is_empty() {
                output
                    .swaps_before
                    .insert(dag.gate_id(ready[0]), std::mem::take(&mut pending_swaps));
            }
            for node in ready {
                output.gate_order.push(dag.gate_id(node));
                front_layer.remove(node);
                for succ in dag.successors_in_order(node) {
                    let [sa, sb] = dag.qubits(succ);
                    if !front_layer.contains_qubit(sa) && !front_layer.contains_qubit(sb) {
                        front_layer.insert(succ, sa, sb);
                    }
                }
            }
            decay.reset();
            steps_without_progress = 0;
            populate_extended_set(&mut extended_set, dag, &front_layer);
            continue;
        }

        // No front-layer gate is currently routable: pick the best SWAP, or
        // fall back to a greedy shortest-path step if search has stalled.
        let swap = if steps_without_progress >= progress_threshold {
            fallback_swap(&front_layer, &mapping, coupling, dist)
        } else {
            best_heuristic_swap(
                &front_layer,
                &extended_set,
                &mapping,
                coupling,
                dist,
                &decay,
                config,
            )
        };
        pending_swaps.push([swap[0], swap[1]]);
        mapping.swap_logical(swap[0], swap[1]);
        decay.bump(swap[0], swap[1]);
        steps_without_progress += 1;
        populate_extended_set(&mut extended_set, dag, &front_layer);
    }

    Ok((output, mapping))
}

/// Choose the candidate SWAP with the lowest heuristic score, breaking ties
/// by keeping the first-seen candidate in generation order.
fn best_heuristic_swap(
    front_layer: &FrontLayer,
    extended_set: &ExtendedSet,
    mapping: &Mapping,
    coupling: &CouplingGraph,
    dist: &DistanceMatrix,
    decay: &DecayVector,
    config: &RoutingConfig,
) -> [LogicalQubit; 2] {
    let candidates = candidate_swaps(front_layer, mapping, coupling);
    debug_assert!(
        !candidates.is_empty(),
        "a non-empty front layer on a connected coupling graph always has a candidate swap"
    );
    let mut best_score = f64::MAX;
    let mut best = candidates[0];
    for &swap in &candidates {
        let score = score_swap(
            config.heuristic,
            swap,
            front_layer,
            extended_set,
            mapping,
            dist,
            decay,
        );
        if score < best_score {
            best_score = score;
            best = swap;
        }
    }
    best
}

/// Move the front-layer gate closest (in coupling-graph distance) to being
/// routable one hop closer, via a single shortest-path step. Distance
/// strictly decreases each time this is called, so repeated use always
/// terminates — the escape hatch for when heuristic search stalls.
fn fallback_swap(
    front_layer: &FrontLayer,
    mapping: &Mapping,
    coupling: &CouplingGraph,
    dist: &DistanceMatrix,
) -> [LogicalQubit; 2] {
    let (_, a, b) = front_layer
        .iter()
        .min_by_key(|&(_, a, b)| dist.get(mapping.phys(a), mapping.phys(b)))
        .expect("front layer is non-empty in the swap-selection branch");
    let from = mapping.phys(a);
    let to = mapping.phys(b);
    let step = first_step_towards(coupling, from, to);
    [a, mapping.log(step)]
}

/// BFS from `from` to `to` on the coupling graph; returns `from`'s neighbor
/// on a shortest path to `to` (or `to` itself if already adjacent).
fn first_step_towards(
    coupling: &CouplingGraph,
    from: sabre_circuit::PhysicalQubit,
    to: sabre_circuit::PhysicalQubit,
) -> sabre_circuit::PhysicalQubit {
    use std::collections::VecDeque;

    if from == to {
        return from;
    }
    let mut predecessor: HashMap<usize, usize> = HashMap::new();
    let mut visited = vec![false; coupling.num_qubits()];
    visited[from.index()] = true;
    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(node) = queue.pop_front() {
        if node == to {
            break;
        }
        for &neighbor in coupling.neighbors(node) {
            if !visited[neighbor.index()] {
                visited[neighbor.index()] = true;
                predecessor.insert(neighbor.index(), node.index());
                queue.push_back(neighbor);
            }
        }
    }
    let mut cursor = to.index();
    while let Some(&prev) = predecessor.get(&cursor) {
        if prev == from.index() {
            return sabre_circuit::PhysicalQubit::new(cursor);
        }
        cursor = prev;
    }
    to
}

/// Candidate set S: for every gate in the front layer, every SWAP that
/// brings one of its operands next to one of that operand's current
/// physical neighbors. Duplicates across front-layer gates are kept
/// deliberately rather than deduplicated.
fn candidate_swaps(
    front_layer: &FrontLayer,
    mapping: &Mapping,
    coupling: &CouplingGraph,
) -> Vec<[LogicalQubit; 2]> {
    let mut swaps = Vec::new();
    for (_, a, b) in front_layer.iter() {
        for lq in [a, b] {
            let phys = mapping.phys(lq);
            for &neighbor_phys in coupling.neighbors(phys) {
                let neighbor_lq = mapping.log(neighbor_phys);
                swaps.push([lq, neighbor_lq]);
            }
        }
    }
    swaps
}

/// Fill `extended_set` with the direct DAG successors of the gates in
/// `front_layer`, in front-layer order, then per-gate successor order,
/// until the cap is reached.
fn populate_extended_set(extended_set: &mut ExtendedSet, dag: &SabreDag, front_layer: &FrontLayer) {
    extended_set.clear();
    for (node, _, _) in front_layer.iter() {
        if extended_set.is_full() {
            break;
        }
        for succ in dag.successors_in_order(node) {
            if extended_set.is_full() {
                break;
            }
            let [a, b] = dag.qubits(succ);
            extended_set.push(succ, a, b);
        }
    }
}

/// Distances between two logical qubits' *current* physical assignments
/// must be finite for every DAG node, or no sequence of SWAPs will ever
/// bring them adjacent (a SWAP always stays within the coupling graph's
/// connected components).
fn check_reachable(dag: &SabreDag, mapping: &Mapping, dist: &DistanceMatrix) -> Result<(), RouteError> {
    for node in dag.graph.node_indices() {
        let [a, b] = dag.qubits(node);
        let (pa, pb) = (mapping.phys(a), mapping.phys(b));
        if !dist.is_connected(pa, pb) {
            return Err(RouteError::DisconnectedCoupling { a: pa, b: pb });
        }
    }
    Ok(())
}

/// Run `config.trials` independent seeded SABRE passes (seeds derived from
/// `config.seed`) and keep the one with fewest inserted SWAPs, tie-broken by
/// trial index. With `trials == 1` this is byte-identical to `run_sabre`.
pub fn route_multi_trial(
    dag: &SabreDag,
    mapping: &Mapping,
    coupling: &CouplingGraph,
    dist: &DistanceMatrix,
    config: &RoutingConfig,
) -> Result<(SabreOutput, Mapping), RouteError> {
    let mut outer_rng = Pcg64Mcg::seed_from_u64(config.seed);
    let seeds: Vec<u64> = (0..config.trials.max(1))
        .map(|_| {
            use rand::RngCore;
            outer_rng.next_u64()
        })
        .collect();

    let run_trial = |seed: u64| -> Result<(SabreOutput, Mapping), RouteError> {
        let trial_config = RoutingConfig {
            seed,
            trials: 1,
            ..config.clone()
        };
        run_sabre(dag, mapping.clone(), coupling, dist, &trial_config)
    };

    let results: Vec<Result<(SabreOutput, Mapping), RouteError>> = if config.parallel {
        seeds.into_par_iter().map(run_trial).collect()
    } else {
        seeds.into_iter().map(run_trial).collect()
    };

    let mut best: Option<(usize, SabreOutput, Mapping)> = None;
    for (index, result) in results.into_iter().enumerate() {
        let (output, mapping) = result?;
        let swap_count: usize = output.swaps_before.values().map(|v| v.len()).sum();
        let better = match &best {
            None => true,
            Some((_, best_output, _)) => {
                let best_count: usize = best_output.swaps_before.values().map(|v| v.len()).sum();
                swap_count < best_count
            }
        };
        if better {
            best = Some((index, output, mapping));
        }
    }
    let (_, output, mapping) = best.expect("trials is at least 1");
    Ok((output, mapping))
}

/// Flatten a [`SabreOutput`] and the `Circuit` it was routed from into a
/// single two-qubit-only `Circuit`: each original gate in `gate_order`,
/// preceded by the SWAPs recorded for it in `swaps_before`. This is the
/// `OutputCircuit` the validator and the single-qubit interleaving pass both
/// consume.
pub fn materialize(output: &SabreOutput, circuit: &sabre_circuit::Circuit) -> sabre_circuit::Circuit {
    use sabre_circuit::{GateInstruction, GateKind};

    let mut flat = sabre_circuit::Circuit::with_capacity(output.gate_order.len());
    for &gate_id in &output.gate_order {
        if let Some(swaps) = output.swaps_before.get(&gate_id) {
            for &[a, b] in swaps {
                flat.push(GateInstruction::two_qubit(GateKind::Swap, a, b));
            }
        }
        let inst = circuit.get(gate_id);
        flat.push(inst.clone());
    }
    flat
}
