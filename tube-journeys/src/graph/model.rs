//! The station graph.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::station::{Station, StationId};

/// One directed step between two stations on a named line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Adjacency {
    pub line: String,
    pub from: StationId,
    pub to: StationId,
}

impl Adjacency {
    pub fn new(line: impl Into<String>, from: StationId, to: StationId) -> Self {
        Self {
            line: line.into(),
            from,
            to,
        }
    }
}

impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-{}-> {}", self.from, self.line, self.to)
    }
}

/// Outgoing adjacencies, keyed by origin then destination.
///
/// At most one adjacency exists per ordered station pair.
pub type Adjacencies = BTreeMap<StationId, BTreeMap<StationId, Adjacency>>;

/// Stations and the line connections between them.
///
/// In a graph produced by [`GraphAssembler`](super::GraphAssembler) or
/// [`Graph::filter`], both endpoints of every adjacency are stations of the
/// graph, and every station has an (possibly empty) adjacency entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    stations: BTreeMap<StationId, Station>,
    adjacencies: Adjacencies,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stations(&self) -> &BTreeMap<StationId, Station> {
        &self.stations
    }

    pub fn adjacencies(&self) -> &Adjacencies {
        &self.adjacencies
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Adjacencies leaving `id`.
    pub fn neighbours(&self, id: &StationId) -> impl Iterator<Item = &Adjacency> {
        self.adjacencies.get(id).into_iter().flat_map(|m| m.values())
    }

    /// Total number of directed adjacencies.
    pub fn adjacency_count(&self) -> usize {
        self.adjacencies.values().map(BTreeMap::len).sum()
    }

    /// Record that consecutive stops `a` and `b` are connected by `line`.
    ///
    /// Both directions are stored. A pair already connected by another line
    /// is overwritten, so the last line recorded wins. Self-loops are
    /// ignored.
    pub fn connect(&mut self, line: &str, a: &StationId, b: &StationId) {
        if a == b {
            return;
        }
        self.adjacencies
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), Adjacency::new(line, a.clone(), b.clone()));
        self.adjacencies
            .entry(b.clone())
            .or_default()
            .insert(a.clone(), Adjacency::new(line, b.clone(), a.clone()));
    }

    /// Ids that appear in any adjacency, in order.
    pub fn connected_ids(&self) -> impl Iterator<Item = &StationId> {
        self.adjacencies.keys()
    }

    pub fn insert_station(&mut self, station: Station) {
        self.stations.insert(station.id().clone(), station);
    }

    /// Ids referenced by an adjacency but missing from the station map.
    pub fn dangling_ids(&self) -> Vec<&StationId> {
        let mut ids: Vec<&StationId> = self
            .adjacencies
            .iter()
            .flat_map(|(from, out)| std::iter::once(from).chain(out.keys()))
            .filter(|id| !self.stations.contains_key(*id))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// The subgraph of stations satisfying `keep`.
    ///
    /// An adjacency survives only if both of its endpoints do. The input is
    /// left untouched.
    pub fn filter(&self, mut keep: impl FnMut(&Station) -> bool) -> Graph {
        let stations: BTreeMap<StationId, Station> = self
            .stations
            .iter()
            .filter(|(_, station)| keep(station))
            .map(|(id, station)| (id.clone(), station.clone()))
            .collect();

        let adjacencies: Adjacencies = stations
            .keys()
            .map(|from| {
                let out: BTreeMap<StationId, Adjacency> = self
                    .adjacencies
                    .get(from)
                    .into_iter()
                    .flatten()
                    .filter(|(to, _)| stations.contains_key(*to))
                    .map(|(to, adjacency)| (to.clone(), adjacency.clone()))
                    .collect();
                (from.clone(), out)
            })
            .collect();

        Graph {
            stations,
            adjacencies,
        }
    }
}
