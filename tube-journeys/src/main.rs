use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tube_journeys::cache::{CacheError, GraphCache};
use tube_journeys::graph::{AssemblerConfig, Graph, GraphAssembler, LetterMask, longest_paths, passes};
use tube_journeys::report;
use tube_journeys::tfl::{TflClient, TflConfig, TflError};

#[derive(Parser, Debug)]
#[command(
    name = "tube-journeys",
    version,
    about = "Find the longest tube journeys whose stations avoid every letter of a word"
)]
struct Args {
    /// Word to find longest tube journey for
    word: String,

    /// Do not create a cached file of the tube data
    #[arg(long)]
    no_create_cache: bool,

    /// Do not use the cached file of the tube data, even if it exists
    #[arg(long)]
    force: bool,

    /// Path to the cached file of the tube data
    #[arg(long, default_value = "tube_graph.json")]
    cache_path: PathBuf,

    /// TfL mode whose lines make up the graph
    #[arg(long, default_value = "tube")]
    mode: String,

    /// Suffix removed from station names
    #[arg(long, default_value = " Underground Station")]
    name_suffix: String,

    /// Maximum concurrent station requests
    #[arg(long, default_value_t = 50)]
    concurrency: usize,

    /// Request timeout in seconds (none by default)
    #[arg(long)]
    timeout: Option<u64>,

    /// TfL application id
    #[arg(long, env = "TFL_API_APP_ID", hide_env_values = true)]
    app_id: Option<String>,

    /// TfL application key
    #[arg(long, env = "TFL_API_KEY", hide_env_values = true)]
    app_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("failed to fetch tube data: {0}")]
    Tfl(#[from] TflError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Load the graph from the cache, or assemble it from the API.
async fn load_graph(args: &Args, cache: &GraphCache) -> Result<Graph, Error> {
    if !args.force
        && let Some(graph) = cache.load()
    {
        info!(path = %cache.path().display(), "loaded cached graph");
        return Ok(graph);
    }

    let app_id = args.app_id.clone().unwrap_or_else(|| {
        warn!("TFL_API_APP_ID not set. API calls may be rate limited or rejected.");
        String::new()
    });
    let app_key = args.app_key.clone().unwrap_or_else(|| {
        warn!("TFL_API_KEY not set. API calls may be rate limited or rejected.");
        String::new()
    });

    let mut tfl_config = TflConfig::new(app_id, app_key);
    if let Some(secs) = args.timeout {
        tfl_config = tfl_config.with_timeout(secs);
    }
    let client = TflClient::new(tfl_config)?;

    let config = AssemblerConfig::new(&args.mode)
        .with_name_suffix(&args.name_suffix)
        .with_concurrency(args.concurrency);

    Ok(GraphAssembler::new(&client, &config).assemble().await?)
}

async fn run(args: Args) -> Result<String, Error> {
    let cache = GraphCache::new(&args.cache_path);
    let graph = load_graph(&args, &cache).await?;

    if !args.no_create_cache {
        cache.save(&graph)?;
        info!(path = %cache.path().display(), "saved graph");
    }

    let banned = LetterMask::of(&args.word);
    info!(letters = %banned, "filtering stations");
    let filtered = graph.filter(|station| passes(banned, station));
    info!(
        stations = filtered.stations().len(),
        adjacencies = filtered.adjacency_count(),
        "filtered graph"
    );

    let journeys = longest_paths(filtered.adjacencies());

    Ok(report::render(&args.word, &args.mode, &filtered, &journeys))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
