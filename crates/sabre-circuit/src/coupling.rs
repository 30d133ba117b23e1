// Licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.

use std::collections::VecDeque;

use crate::PhysicalQubit;

/// An undirected, simple coupling graph over physical qubits: no self-loops,
/// no parallel edges. Adjacency is stored sorted per node so that iteration
/// order (used throughout the routing engine for determinism) is stable.
#[derive(Clone, Debug)]
pub struct CouplingGraph {
    num_qubits: usize,
    neighbors: Vec<Vec<PhysicalQubit>>,
}

impl CouplingGraph {
    pub fn new(num_qubits: usize) -> Self {
        CouplingGraph {
            num_qubits,
            neighbors: vec![Vec::new(); num_qubits],
        }
    }

    pub fn from_edges(num_qubits: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = CouplingGraph::new(num_qubits);
        for (a, b) in edges {
            graph.add_edge(PhysicalQubit::new(a), PhysicalQubit::new(b));
        }
        graph
    }

    pub fn add_edge(&mut self, a: PhysicalQubit, b: PhysicalQubit) {
        if a == b {
            return;
        }
        if !self.has_edge(a, b) {
            self.neighbors[a.index()].push(b);
            self.neighbors[b.index()].push(a);
            self.neighbors[a.index()].sort_unstable();
            self.neighbors[b.index()].sort_unstable();
        }
    }

    pub fn has_edge(&self, a: PhysicalQubit, b: PhysicalQubit) -> bool {
        self.neighbors[a.index()].contains(&b)
    }

    pub fn neighbors(&self, q: PhysicalQubit) -> &[PhysicalQubit] {
        &self.neighbors[q.index()]
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

/// All-pairs shortest-path distances on a `CouplingGraph`, computed once via
/// repeated BFS (the graph is unweighted, so BFS is cheaper than
/// Floyd-Warshall and gives the same integer distances). Unreachable pairs
/// are recorded as `usize::MAX`, standing in for +infinity.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    num_qubits: usize,
    distances: Vec<usize>,
}

pub const UNREACHABLE: usize = usize::MAX;

impl DistanceMatrix {
    pub fn from_coupling(graph: &CouplingGraph) -> Self {
        let n = graph.num_qubits();
        let mut distances = vec![UNREACHABLE; n * n];
        for source in 0..n {
            distances[source * n + source] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(PhysicalQubit::new(source));
            while let Some(node) = queue.pop_front() {
                let d = distances[source * n + node.index()];
                for &neighbor in graph.neighbors(node) {
                    if distances[source * n + neighbor.index()] == UNREACHABLE {
                        distances[source * n + neighbor.index()] = d + 1;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        DistanceMatrix {
            num_qubits: n,
            distances,
        }
    }

    pub fn get(&self, a: PhysicalQubit, b: PhysicalQubit) -> usize {
        self.distances[a.index() * self.num_qubits + b.index()]
    }

    pub fn is_connected(&self, a: PhysicalQubit, b: PhysicalQubit) -> bool {
        self.get(a, b) != UNREACHABLE
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pq(i: usize) -> PhysicalQubit {
        PhysicalQubit::new(i)
    }

    #[test]
    fn line_distances() {
        let graph = CouplingGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let dist = DistanceMatrix::from_coupling(&graph);
        assert_eq!(dist.get(pq(0), pq(3)), 3);
        assert_eq!(dist.get(pq(0), pq(0)), 0);
        assert_eq!(dist.get(pq(1), pq(2)), 1);
    }

    #[test]
    fn disconnected_graph_reports_unreachable() {
        let graph = CouplingGraph::from_edges(4, [(0, 1), (2, 3)]);
        let dist = DistanceMatrix::from_coupling(&graph);
        assert!(!dist.is_connected(pq(0), pq(2)));
    }

    #[test]
    fn no_parallel_edges_or_self_loops() {
        let mut graph = CouplingGraph::new(3);
        graph.add_edge(pq(0), pq(1));
        graph.add_edge(pq(0), pq(1));
        graph.add_edge(pq(0), pq(0));
        assert_eq!(graph.neighbors(pq(0)), &[pq(1)]);
    }
}
