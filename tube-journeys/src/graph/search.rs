//! Exhaustive longest-path search.
//!
//! Enumerates every path that never takes the same directed adjacency
//! twice, starting anywhere, and keeps those with the most steps. Stations
//! may be revisited, and A→B followed by B→A is allowed because they are
//! different adjacencies. This is exponential; it is meant for the small
//! graphs left after letter filtering.
//!
//! The walk uses an explicit stack of per-depth cursors over an arena of
//! edge indices, so path length is not limited by the call stack.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::model::{Adjacencies, Adjacency};
use super::station::StationId;

/// A journey: adjacencies where each step starts where the previous ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<Adjacency>,
}

impl Path {
    /// The zero-step path.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Adjacency] {
        &self.steps
    }

    /// Number of steps (adjacencies).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Stations visited, in order; one more than the step count.
    pub fn stops(&self) -> Vec<&StationId> {
        let mut stops: Vec<&StationId> = self.steps.iter().map(|a| &a.from).collect();
        stops.extend(self.steps.last().map(|a| &a.to));
        stops
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stops: Vec<&str> = self.stops().into_iter().map(StationId::as_str).collect();
        f.write_str(&stops.join(" -> "))
    }
}

/// Adjacencies flattened into an indexable arena.
struct EdgeArena<'a> {
    edges: Vec<&'a Adjacency>,
    /// Outgoing edge indices per station.
    outgoing: HashMap<&'a StationId, Vec<usize>>,
}

impl<'a> EdgeArena<'a> {
    fn new(adjacencies: &'a Adjacencies) -> Self {
        let mut edges = Vec::new();
        let mut outgoing: HashMap<&StationId, Vec<usize>> = HashMap::new();

        for (from, out) in adjacencies {
            let indices = outgoing.entry(from).or_default();
            for adjacency in out.values() {
                indices.push(edges.len());
                edges.push(adjacency);
            }
        }

        Self { edges, outgoing }
    }

    fn outgoing(&self, edge: usize) -> &[usize] {
        self.outgoing
            .get(&self.edges[edge].to)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Tracks the longest paths seen so far.
struct Longest {
    length: usize,
    paths: Vec<Vec<usize>>,
}

impl Longest {
    fn offer(&mut self, path: &[usize]) {
        if path.len() > self.length {
            self.length = path.len();
            self.paths.clear();
        }
        if path.len() == self.length {
            self.paths.push(path.to_vec());
        }
    }
}

/// Every path of maximal length through `adjacencies`.
///
/// Never empty: with no adjacencies the result is a single empty path.
/// Which maximal paths are found is fixed; their order is not part of the
/// contract (currently pre-order by seed edge).
pub fn longest_paths(adjacencies: &Adjacencies) -> Vec<Path> {
    let arena = EdgeArena::new(adjacencies);

    let mut longest = Longest {
        length: 0,
        paths: vec![Vec::new()],
    };
    let mut explored = 1usize;

    let mut used = vec![false; arena.edges.len()];
    let mut path: Vec<usize> = Vec::new();
    // cursor[d] is the next outgoing edge to try after path[d]
    let mut cursor: Vec<usize> = Vec::new();

    for seed in 0..arena.edges.len() {
        path.push(seed);
        used[seed] = true;
        cursor.push(0);
        longest.offer(&path);
        explored += 1;

        while let Some(&last) = path.last() {
            let depth = path.len() - 1;
            let next = arena.outgoing(last).get(cursor[depth]).copied();

            match next {
                Some(edge) => {
                    cursor[depth] += 1;
                    if used[edge] {
                        continue;
                    }
                    used[edge] = true;
                    path.push(edge);
                    cursor.push(0);
                    longest.offer(&path);
                    explored += 1;
                }
                None => {
                    used[last] = false;
                    path.pop();
                    cursor.pop();
                }
            }
        }
    }

    debug!(
        edges = arena.edges.len(),
        explored,
        length = longest.length,
        found = longest.paths.len(),
        "longest path search complete"
    );

    longest
        .paths
        .into_iter()
        .map(|indices| Path {
            steps: indices.into_iter().map(|i| arena.edges[i].clone()).collect(),
        })
        .collect()
}
