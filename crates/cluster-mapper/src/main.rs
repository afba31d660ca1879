use std::env;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Subscriber, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use wordnet_db::LoadMode;

use cluster_mapper::{
    AppState, CachedLexicon, ClusterMapper, DEFAULT_CACHE_CAPACITY, MapResponse, ReadOptions,
    WordNetLexicon, WordNetMapper, literal_overlap, read_cluster_file, router,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_WORDNET_PATH: &str = "/usr/share/wordnet";

#[derive(Parser)]
#[command(name = "cluster-mapper")]
#[command(about = "Map word clusters onto WordNet synsets")]
struct Cli {
    /// WordNet dictionary directory (falls back to $WNHOME).
    #[arg(long, global = true)]
    wordnet_dir: Option<PathBuf>,
    /// `mmap` or `owned` (falls back to $WORDNET_LOAD_MODE).
    #[arg(long, global = true, value_parser = load_mode_arg)]
    wordnet_mode: Option<LoadMode>,
    /// Lookup cache entries; 0 disables the cache.
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map every cluster of a file: `map <file> [[<start_line>] <end_line>]`.
    Map {
        file: PathBuf,
        first_line: Option<usize>,
        second_line: Option<usize>,
        /// Print every sense within the top N scores instead of the best one.
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        max_clusters: Option<usize>,
        /// One JSON object per cluster.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Serve `/v1/map` over HTTP (HOST and PORT from the environment).
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let wordnet_path = cli
        .wordnet_dir
        .or_else(|| env::var("WNHOME").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDNET_PATH));
    let wordnet_mode = cli
        .wordnet_mode
        .or_else(|| {
            env::var("WORDNET_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);

    match cli.command {
        Commands::Map {
            file,
            first_line,
            second_line,
            top,
            max_clusters,
            json,
        } => {
            if top == Some(0) {
                bail!("--top must be >= 1");
            }
            let options = read_window(first_line, second_line, max_clusters);
            let mapper = load_mapper(&wordnet_path, wordnet_mode, cli.cache_capacity)?;
            map_file(&mapper, &file, options, top, json)
        }
        Commands::Serve { host, port } => {
            let host = host
                .or_else(|| env::var("HOST").ok())
                .unwrap_or_else(|| DEFAULT_HOST.to_string());
            let port = port
                .or_else(|| env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()))
                .unwrap_or(DEFAULT_PORT);
            let mapper = load_mapper(&wordnet_path, wordnet_mode, cli.cache_capacity)?;
            serve(mapper, &host, port).await
        }
    }
}

/// `[end]` or `[start end]`, matching the positional forms of `map`.
fn read_window(
    first: Option<usize>,
    second: Option<usize>,
    max_clusters: Option<usize>,
) -> ReadOptions {
    let (start_line, end_line) = match (first, second) {
        (Some(start), Some(end)) => (start, Some(end)),
        (Some(end), None) => (0, Some(end)),
        _ => (0, None),
    };
    ReadOptions {
        start_line,
        end_line,
        max_clusters,
    }
}

fn load_mapper(
    wordnet_path: &Path,
    mode: LoadMode,
    cache_capacity: usize,
) -> Result<WordNetMapper> {
    info!("using wordnet at {} (mode: {:?})", wordnet_path.display(), mode);
    let start = Instant::now();
    let lexicon = WordNetLexicon::load(wordnet_path, mode)
        .with_context(|| format!("failed to load wordnet from {}", wordnet_path.display()))?;
    info!(
        "wordnet loaded in {} ms ({} lemmas, {} synsets)",
        start.elapsed().as_millis(),
        lexicon.wordnet().lemma_count(),
        lexicon.wordnet().synset_count()
    );
    info!("lookup cache holds up to {} entries", cache_capacity);
    Ok(ClusterMapper::new(CachedLexicon::with_capacity(
        lexicon,
        cache_capacity,
    )))
}

fn map_file(
    mapper: &WordNetMapper,
    file: &Path,
    options: ReadOptions,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let clusters = read_cluster_file(file, options)
        .with_context(|| format!("failed to read clusters from {}", file.display()))?;

    let start = Instant::now();
    let mut out = io::stdout().lock();
    let mut mapped = 0usize;
    for cluster in &clusters {
        let matches = match top {
            Some(top) => mapper.map_multiple(cluster, top),
            None => mapper.map_single(cluster).into_iter().collect(),
        };
        if !matches.is_empty() {
            mapped += 1;
        }

        if json {
            let line = serde_json::to_string(&MapResponse::new(cluster, &matches))?;
            writeln!(out, "{line}")?;
            continue;
        }
        writeln!(out, "Mapping candidate(s) for synset {cluster}:")?;
        if matches.is_empty() {
            writeln!(out, "None")?;
        }
        for found in &matches {
            writeln!(
                out,
                "{} (score {:.4}, literal overlap {:.4})",
                found.sense,
                found.score,
                literal_overlap(cluster, &found.sense)
            )?;
        }
        writeln!(out)?;
    }
    out.flush()?;

    info!(
        "{} of {} clusters mapped in {} ms ({} cached lookups)",
        mapped,
        clusters.len(),
        start.elapsed().as_millis(),
        mapper.lexicon().cached_entries()
    );
    Ok(())
}

async fn serve(mapper: WordNetMapper, host: &str, port: u16) -> Result<()> {
    info!("binding to {}:{}", host, port);
    let state = AppState {
        mapper: Arc::new(mapper),
    };
    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn load_mode_arg(raw: &str) -> std::result::Result<LoadMode, String> {
    parse_load_mode(raw)
        .ok_or_else(|| format!("unknown load mode {raw:?} (expected mmap or owned)"))
}

fn init_tracing() {
    let filter = log_filter(env::var("RUST_LOG").ok().as_deref());
    log_subscriber(filter, io::stderr).init();
}

/// `RUST_LOG`-style directives, `info` when absent or unparseable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

// The EnvFilter is the only level filter: a global max level would replace it.
fn log_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .with_level(true)
        .finish()
}
