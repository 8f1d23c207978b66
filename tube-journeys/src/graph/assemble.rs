//! Build the station graph from the TfL API.
//!
//! Three phases:
//! 1. list the lines of a mode,
//! 2. fetch each line's stops in order and connect consecutive pairs,
//! 3. fetch details of every connected station, at most `concurrency` at a
//!    time.

use std::pin::pin;

use futures::StreamExt;
use tracing::{debug, info};

use crate::batch::bounded_map;
use crate::tfl::{TflClient, TflError, Transport};

use super::model::Graph;
use super::station::{Station, StationId};

/// Default transport mode.
const DEFAULT_MODE: &str = "tube";

/// Suffix TfL appends to tube station names.
const DEFAULT_NAME_SUFFIX: &str = " Underground Station";

/// Default number of station detail requests in flight.
const DEFAULT_CONCURRENCY: usize = 50;

/// Configuration for graph assembly.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// TfL mode name, e.g. `tube` or `dlr`
    pub mode: String,
    /// Removed from every station's display name
    pub name_suffix: String,
    /// Maximum concurrent station detail requests
    pub concurrency: usize,
}

impl AssemblerConfig {
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            ..Self::default()
        }
    }

    pub fn with_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.name_suffix = suffix.into();
        self
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Fetches lines, stops and stations and assembles them into a [`Graph`].
pub struct GraphAssembler<'a, T> {
    client: &'a TflClient<T>,
    config: &'a AssemblerConfig,
}

impl<'a, T: Transport> GraphAssembler<'a, T> {
    pub fn new(client: &'a TflClient<T>, config: &'a AssemblerConfig) -> Self {
        Self { client, config }
    }

    /// Build the full graph. Any failed request aborts assembly.
    pub async fn assemble(&self) -> Result<Graph, TflError> {
        let mut graph = self.connect_lines().await?;
        self.fetch_stations(&mut graph).await?;
        Ok(graph)
    }

    /// Phases 1 and 2: a graph with adjacencies but no stations yet.
    pub async fn connect_lines(&self) -> Result<Graph, TflError> {
        let lines = self.client.lines_for_mode(&self.config.mode).await?;
        info!(mode = %self.config.mode, lines = lines.len(), "fetched lines");

        let mut graph = Graph::new();
        for line in &lines {
            let stops = self.client.stop_points(&line.id).await?;
            debug!(line = %line.name, stops = stops.len(), "connecting line");

            for pair in stops.windows(2) {
                let a = StationId::new(pair[0].naptan_id.as_str());
                let b = StationId::new(pair[1].naptan_id.as_str());
                graph.connect(&line.name, &a, &b);
            }
        }

        info!(
            stations = graph.adjacencies().len(),
            adjacencies = graph.adjacency_count(),
            "connected lines"
        );
        Ok(graph)
    }

    /// Phase 3: fetch a station for every id with an adjacency entry.
    pub async fn fetch_stations(&self, graph: &mut Graph) -> Result<(), TflError> {
        let ids: Vec<StationId> = graph.connected_ids().cloned().collect();
        let total = ids.len();

        let fetches = ids.into_iter().map(|id| self.fetch_station(id));
        let mut stations = pin!(bounded_map(fetches, self.config.concurrency));

        let mut fetched = 0;
        while let Some(station) = stations.next().await {
            graph.insert_station(station?);
            fetched += 1;
            if fetched % self.config.concurrency.max(1) == 0 || fetched == total {
                info!(fetched, total, "fetched station details");
            }
        }

        Ok(())
    }

    async fn fetch_station(&self, id: StationId) -> Result<Station, TflError> {
        let detail = self.client.stop_point(id.as_str()).await?;
        Ok(Station::from_common_name(
            id,
            &detail.common_name,
            &self.config.name_suffix,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LetterMask, longest_paths, passes};
    use crate::tfl::{MockTransport, TflConfig};
    use serde_json::json;

    const BASE: &str = "http://mock";

    fn id(s: &str) -> StationId {
        StationId::new(s)
    }

    fn url(path: &str) -> String {
        format!("{BASE}/{path}")
    }

    fn client(transport: MockTransport) -> TflClient<MockTransport> {
        TflClient::with_transport(TflConfig::new("id", "key").with_base_url(BASE), transport)
    }

    fn stops(ids: &[&str]) -> serde_json::Value {
        ids.iter().map(|id| json!({ "naptanId": id })).collect()
    }

    fn station(transport: &MockTransport, id: &str, name: &str) {
        transport.respond(url(&format!("StopPoint/{id}")), json!({ "commonName": name }));
    }

    /// Two lines sharing station B:
    /// Bakerloo A–B–C, Victoria B–D.
    fn network() -> MockTransport {
        let transport = MockTransport::new();
        transport.respond(
            url("Line/Mode/tube"),
            json!([
                { "id": "bakerloo", "name": "Bakerloo" },
                { "id": "victoria", "name": "Victoria" },
            ]),
        );
        transport.respond(url("Line/bakerloo/StopPoints"), stops(&["A", "B", "C"]));
        transport.respond(url("Line/victoria/StopPoints"), stops(&["B", "D"]));
        station(&transport, "A", "Paddington Underground Station");
        station(&transport, "B", "Oxford Circus Underground Station");
        station(&transport, "C", "Piccadilly Circus Underground Station");
        station(&transport, "D", "Warren Street Underground Station");
        transport
    }

    #[test]
    fn config_defaults() {
        let config = AssemblerConfig::default();
        assert_eq!(config.mode, "tube");
        assert_eq!(config.name_suffix, " Underground Station");
        assert_eq!(config.concurrency, 50);
    }

    #[test]
    fn config_builder() {
        let config = AssemblerConfig::new("dlr")
            .with_name_suffix(" DLR Station")
            .with_concurrency(4);
        assert_eq!(config.mode, "dlr");
        assert_eq!(config.name_suffix, " DLR Station");
        assert_eq!(config.concurrency, 4);
    }

    #[tokio::test]
    async fn assembles_stations_and_adjacencies() {
        let client = client(network());
        let config = AssemblerConfig::default();

        let graph = GraphAssembler::new(&client, &config).assemble().await.unwrap();

        assert_eq!(graph.stations().len(), 4);
        assert_eq!(graph.station(&id("B")).unwrap().name(), "Oxford Circus");
        assert_eq!(graph.adjacency_count(), 6);
        assert_eq!(graph.adjacencies()[&id("A")][&id("B")].line, "Bakerloo");
        assert_eq!(graph.adjacencies()[&id("D")][&id("B")].line, "Victoria");
        assert!(graph.dangling_ids().is_empty());
    }

    #[tokio::test]
    async fn each_station_fetched_once() {
        let client = client(network());
        let config = AssemblerConfig::default().with_concurrency(1);

        GraphAssembler::new(&client, &config).assemble().await.unwrap();

        for s in ["A", "B", "C", "D"] {
            assert_eq!(client.transport().request_count(&url(&format!("StopPoint/{s}"))), 1);
        }
        assert_eq!(client.transport().request_count(&url("Line/Mode/tube")), 1);
    }

    #[tokio::test]
    async fn lines_fetched_in_order() {
        let client = client(network());
        let config = AssemblerConfig::default();

        GraphAssembler::new(&client, &config).connect_lines().await.unwrap();

        let urls: Vec<String> = client.transport().requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                url("Line/Mode/tube"),
                url("Line/bakerloo/StopPoints"),
                url("Line/victoria/StopPoints"),
            ]
        );
    }

    #[tokio::test]
    async fn shared_pair_last_line_wins() {
        let transport = MockTransport::new();
        transport.respond(
            url("Line/Mode/tube"),
            json!([
                { "id": "circle", "name": "Circle" },
                { "id": "district", "name": "District" },
            ]),
        );
        transport.respond(url("Line/circle/StopPoints"), stops(&["A", "B"]));
        transport.respond(url("Line/district/StopPoints"), stops(&["B", "A"]));
        let client = client(transport);
        let config = AssemblerConfig::default();

        let graph = GraphAssembler::new(&client, &config).connect_lines().await.unwrap();
        assert_eq!(graph.adjacency_count(), 2);
        assert_eq!(graph.adjacencies()[&id("A")][&id("B")].line, "District");
    }

    #[tokio::test]
    async fn failed_station_fetch_aborts() {
        let transport = MockTransport::new();
        transport.respond(url("Line/Mode/tube"), json!([{ "id": "x", "name": "X" }]));
        transport.respond(url("Line/x/StopPoints"), stops(&["A", "B"]));
        station(&transport, "A", "Angel");
        transport.respond(url("StopPoint/B"), json!({ "statusCode": 500, "message": "boom" }));
        let client = client(transport);
        let config = AssemblerConfig::default();

        let result = GraphAssembler::new(&client, &config).assemble().await;
        assert!(matches!(result, Err(TflError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn failed_line_fetch_aborts_before_stations() {
        let transport = MockTransport::new();
        transport.respond(url("Line/Mode/tube"), json!([{ "id": "x", "name": "X" }]));
        let client = client(transport);
        let config = AssemblerConfig::default();

        let result = GraphAssembler::new(&client, &config).assemble().await;
        assert!(matches!(result, Err(TflError::Api { status: 404, .. })));
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_station_is_retried() {
        let transport = MockTransport::new();
        transport.respond(url("Line/Mode/tube"), json!([{ "id": "x", "name": "X" }]));
        transport.respond(url("Line/x/StopPoints"), stops(&["A", "B"]));
        transport.respond(
            url("StopPoint/A"),
            json!({ "statusCode": 429, "message": "Rate limit is exceeded. Try again in 3 seconds." }),
        );
        station(&transport, "A", "Angel");
        station(&transport, "B", "Bank");
        let client = client(transport);
        let config = AssemblerConfig::default();

        let graph = GraphAssembler::new(&client, &config).assemble().await.unwrap();
        assert_eq!(graph.station(&id("A")).unwrap().name(), "Angel");
        assert_eq!(client.transport().request_count(&url("StopPoint/A")), 2);
    }

    #[tokio::test]
    async fn end_to_end_cat_dog_bee() {
        let transport = MockTransport::new();
        transport.respond(url("Line/Mode/tube"), json!([{ "id": "x", "name": "X" }]));
        transport.respond(url("Line/x/StopPoints"), stops(&["A", "B", "C"]));
        station(&transport, "A", "cat");
        station(&transport, "B", "dog");
        station(&transport, "C", "bee");
        let client = client(transport);
        let config = AssemblerConfig::default();

        let graph = GraphAssembler::new(&client, &config).assemble().await.unwrap();
        let banned = LetterMask::of("c");
        let filtered = graph.filter(|s| passes(banned, s));

        assert_eq!(
            filtered.stations().keys().collect::<Vec<_>>(),
            vec![&id("B"), &id("C")]
        );
        assert_eq!(filtered.adjacency_count(), 2);

        let paths = longest_paths(filtered.adjacencies());
        let mut rendered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        rendered.sort();
        assert_eq!(rendered, vec!["B -> C -> B", "C -> B -> C"]);
    }
}
