//! Seeded synthetic instances for benchmarks, demos and tests.

use crate::problem::{Car, Problem, Street};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Shape of a generated instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorParams {
    pub duration: u32,
    pub bonus_per_car: u32,
    pub intersections: usize,
    /// Total streets; at least `intersections` so the ring fits
    pub streets: usize,
    pub cars: usize,
    pub max_street_length: u32,
    /// Longest route, in streets (at least 2)
    pub max_route_len: usize,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            duration: 200,
            bonus_per_car: 100,
            intersections: 20,
            streets: 60,
            cars: 80,
            max_street_length: 6,
            max_route_len: 8,
        }
    }
}

/// Generate a strongly connected network and random-walk car routes.
///
/// A ring through all intersections guarantees every node has an outgoing
/// street; the remaining streets are random chords. The same seed always
/// produces the same problem.
pub fn generate(params: &GeneratorParams, seed: u64) -> Problem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n = params.intersections.max(2);
    let street_target = params.streets.max(n);

    let mut graph: DiGraph<usize, u32> = DiGraph::with_capacity(n, street_target);
    let nodes: Vec<NodeIndex> = (0..n).map(|id| graph.add_node(id)).collect();

    for i in 0..n {
        let length = rng.gen_range(1..=params.max_street_length.max(1));
        graph.add_edge(nodes[i], nodes[(i + 1) % n], length);
    }

    let mut attempts = 0;
    while graph.edge_count() < street_target && attempts < street_target * 20 {
        attempts += 1;
        let from = nodes[rng.gen_range(0..n)];
        let to = nodes[rng.gen_range(0..n)];
        if from == to || graph.find_edge(from, to).is_some() {
            continue;
        }
        let length = rng.gen_range(1..=params.max_street_length.max(1));
        graph.add_edge(from, to, length);
    }

    let streets: Vec<Street> = graph
        .edge_references()
        .map(|edge| {
            Street::new(
                edge.id().index(),
                street_name(edge.id().index()),
                graph[edge.source()],
                graph[edge.target()],
                *edge.weight(),
            )
        })
        .collect();

    let cars: Vec<Car> = (0..params.cars)
        .map(|id| {
            let route_len = rng.gen_range(2..=params.max_route_len.max(2));
            let mut edge = EdgeIndex::new(rng.gen_range(0..graph.edge_count()));
            let mut route = vec![edge.index()];

            while route.len() < route_len {
                let node = match graph.edge_endpoints(edge) {
                    Some((_, node)) => node,
                    None => break,
                };
                edge = match graph.edges(node).map(|e| e.id()).choose(&mut rng) {
                    Some(next) => next,
                    None => break,
                };
                route.push(edge.index());
            }

            Car { id, route }
        })
        .collect();

    Problem::new(
        format!("generated-{seed}"),
        params.duration,
        params.bonus_per_car,
        n,
        streets,
        cars,
    )
}

/// Short unique street names: a, b, ..., z, ba, bb, ...
fn street_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'a' + (index % 26) as u8);
        index /= 26;
        if index == 0 {
            break;
        }
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
