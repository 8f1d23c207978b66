//! Disk cache for the assembled graph.
//!
//! Assembling the graph costs a few hundred API calls, so the result is
//! stored as JSON and reused on later runs. There is no expiry: pass
//! `--force` to rebuild.

use std::path::{Path, PathBuf};

use crate::graph::Graph;

/// Default cache file, relative to the working directory.
const DEFAULT_PATH: &str = "tube_graph.json";

/// Errors writing the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to create cache directory: {0}")]
    CreateDir(std::io::Error),

    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write cache file: {0}")]
    Write(std::io::Error),
}

/// JSON file holding a whole [`Graph`].
#[derive(Debug, Clone)]
pub struct GraphCache {
    path: PathBuf,
}

impl GraphCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Try to load the graph.
    ///
    /// Returns `None` if the file doesn't exist or can't be parsed.
    pub fn load(&self) -> Option<Graph> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save the graph, creating parent directories if needed.
    pub fn save(&self, graph: &Graph) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(CacheError::CreateDir)?;
        }

        let json = serde_json::to_string(graph)?;
        std::fs::write(&self.path, json).map_err(CacheError::Write)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for GraphCache {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Station, StationId};
    use tempfile::tempdir;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.connect("Northern", &StationId::new("A"), &StationId::new("B"));
        graph.connect("Central", &StationId::new("B"), &StationId::new("C"));
        graph.insert_station(Station::new("A", "Angel"));
        graph.insert_station(Station::new("B", "Bank"));
        graph.insert_station(Station::new("C", "Chancery Lane"));
        graph
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = tempdir().unwrap();
        let cache = GraphCache::new(dir.path().join("graph.json"));

        cache.save(&sample()).unwrap();
        let loaded = cache.load().unwrap();

        assert_eq!(loaded, sample());
        let bank = loaded.station(&StationId::new("B")).unwrap();
        assert_eq!(bank.letters(), crate::graph::LetterMask::of("bank"));
    }

    #[test]
    fn missing_cache_returns_none() {
        let cache = GraphCache::new("/nonexistent/path/graph.json");
        assert!(cache.load().is_none());
    }

    #[test]
    fn corrupt_cache_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(GraphCache::new(&path).load().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("graph.json");
        let cache = GraphCache::new(&path);

        cache.save(&Graph::new()).unwrap();
        assert!(path.exists());
        assert_eq!(cache.load(), Some(Graph::new()));
    }

    #[test]
    fn default_path() {
        assert_eq!(GraphCache::default().path(), Path::new("tube_graph.json"));
    }
}
