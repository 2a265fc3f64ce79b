//! CLI for hangul-autocomplete: serve, suggest, inspect.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use hangul_autocomplete::{server, Autocompleter, OutputMode, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "hangul-autocomplete")]
#[command(about = "Korean search-keyword autocompletion with constrained next-token prediction")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every subcommand.
#[derive(Args)]
struct CommonArgs {
    /// JSON config file
    #[arg(long, global = true, env = "HANGUL_AC_CONFIG")]
    config: Option<PathBuf>,

    /// HuggingFace tokenizer.json (demo vocabulary when omitted)
    #[arg(long, global = true, env = "HANGUL_AC_TOKENIZER")]
    tokenizer: Option<PathBuf>,

    /// Name of the begin-of-sequence token
    #[arg(long, global = true, env = "HANGUL_AC_BOS_TOKEN")]
    bos_token: Option<String>,

    /// Recommendation cache capacity
    #[arg(long, global = true, env = "HANGUL_AC_CACHE_CAPACITY")]
    cache_capacity: Option<usize>,

    /// Seed of the demo scorer
    #[arg(long, global = true, env = "HANGUL_AC_DEMO_SEED")]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Server mode (HTTP API)
    Serve {
        #[arg(long, env = "HANGUL_AC_HOST")]
        host: Option<String>,
        #[arg(short, long, env = "HANGUL_AC_PORT")]
        port: Option<u16>,
        #[arg(long, env = "HANGUL_AC_DEFAULT_RESULTS")]
        default_results: Option<usize>,
        #[arg(long, env = "HANGUL_AC_MAX_RESULTS")]
        max_results: Option<usize>,
        #[arg(long, env = "HANGUL_AC_MAX_QUERY_CHARS")]
        max_query_chars: Option<usize>,
    },

    /// Suggest completions for one query
    Suggest {
        #[arg(short, long)]
        query: String,
        #[arg(short, default_value = "3")]
        n: usize,
        /// full | token
        #[arg(long, default_value = "full")]
        mode: String,
    },

    /// Show vocabulary index statistics
    Inspect,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.common)?;
    match cli.command {
        Commands::Serve {
            host,
            port,
            default_results,
            max_results,
            max_query_chars,
        } => {
            if let Some(v) = host {
                config.host = v;
            }
            if let Some(v) = port {
                config.port = v;
            }
            if let Some(v) = default_results {
                config.default_results = v;
            }
            if let Some(v) = max_results {
                config.max_results = v;
            }
            if let Some(v) = max_query_chars {
                config.max_query_chars = v;
            }
            run_serve(config)?
        }
        Commands::Suggest { query, n, mode } => run_suggest(&config, &query, n, &mode)?,
        Commands::Inspect => run_inspect(&config)?,
    }
    Ok(())
}

/// File (or defaults) overlaid with the shared flags.
fn load_config(common: &CommonArgs) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::load(common.config.as_deref())?;
    if let Some(p) = &common.tokenizer {
        config.tokenizer_path = Some(p.clone());
    }
    if let Some(b) = &common.bos_token {
        config.bos_token = Some(b.clone());
    }
    if let Some(c) = common.cache_capacity {
        config.cache_capacity = c;
    }
    if let Some(s) = common.seed {
        config.demo_seed = s;
    }
    Ok(config)
}

fn run_serve(config: ServiceConfig) -> Result<()> {
    let autocompleter = Arc::new(Autocompleter::from_config(&config)?);
    let rt = tokio::runtime::Runtime::new().map_err(|e| anyhow::anyhow!("tokio runtime: {}", e))?;
    rt.block_on(server::run_server(autocompleter, config))
        .map_err(|e| anyhow::anyhow!("server: {}", e))
}

fn run_suggest(config: &ServiceConfig, query: &str, n: usize, mode: &str) -> Result<()> {
    let mode: OutputMode = mode.parse()?;
    let autocompleter = Autocompleter::from_config(config)?;
    let t0 = Instant::now();
    let recommendations = autocompleter.suggest(query, n, mode)?;
    info!(
        "{} suggestion(s) for {:?} in {:.2} ms",
        recommendations.len(),
        query,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    for r in recommendations.iter() {
        println!("{}\t{:.6}", r.text, r.probability);
    }
    Ok(())
}

fn run_inspect(config: &ServiceConfig) -> Result<()> {
    let autocompleter = Autocompleter::from_config(config)?;
    let stats = autocompleter.index().stats();
    println!("vocab_size: {}", autocompleter.tokenizer().vocab_size());
    println!("vocab_entries: {}", stats.vocab_entries);
    println!("skipped_entries: {}", stats.skipped_entries);
    println!("syllable_keys: {}", stats.syllable_keys);
    println!("syllable_ids: {}", stats.syllable_ids);
    println!("choseong_ids: {}", stats.choseong_ids);
    for (symbol, count) in &stats.buckets {
        println!("  {}: {}", symbol, count);
    }
    Ok(())
}
