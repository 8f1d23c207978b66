//! Plain-text rendering of search results.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::graph::{Graph, Path, Station, StationId};

const SEPARATOR: &str = "--------------------";

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn name<'a>(stations: &'a BTreeMap<StationId, Station>, id: &'a StationId) -> &'a str {
    stations.get(id).map(Station::name).unwrap_or(id.as_str())
}

/// One journey, a station per line with the line taken between them.
///
/// ```text
/// Oval
///   |
///   Northern
///   ↓
/// Stockwell
/// ```
pub fn journey(stations: &BTreeMap<StationId, Station>, path: &Path) -> String {
    let mut out = String::new();
    for step in path.steps() {
        let _ = writeln!(out, "{}", name(stations, &step.from));
        let _ = writeln!(out, "  |\n  {}\n  ↓", step.line);
    }
    if let Some(last) = path.steps().last() {
        let _ = writeln!(out, "{}", name(stations, &last.to));
    }
    out
}

/// The journeys section. Length is counted in stops.
pub fn journeys(stations: &BTreeMap<StationId, Station>, paths: &[Path]) -> String {
    let longest = paths.first().map(Path::len).unwrap_or_default();
    if longest == 0 {
        return "No journeys found\n".to_string();
    }

    let mut out = format!(
        "Found {} journey{} of length {}:\n\n",
        paths.len(),
        plural(paths.len()),
        longest + 1
    );
    for path in paths {
        out.push_str(&journey(stations, path));
        let _ = write!(out, "\n{SEPARATOR}\n\n");
    }
    out
}

/// The list of stations that survived filtering.
pub fn stations(graph: &Graph) -> String {
    let stations = graph.stations();
    if stations.is_empty() {
        return "No stations found without these letters\n".to_string();
    }

    let mut out = format!(
        "Found {} station{} without these letters:\n\n",
        stations.len(),
        plural(stations.len())
    );
    for station in stations.values() {
        let _ = writeln!(out, "{}", station.name());
    }
    out
}

/// Full report for a banned word.
pub fn render(word: &str, mode: &str, filtered: &Graph, paths: &[Path]) -> String {
    format!(
        "Longest {mode} journeys (in terms of number of stops) avoiding all letters in \"{word}\":\n{}\n{}",
        journeys(filtered.stations(), paths),
        stations(filtered)
    )
}
