//! PolyVision command-line interface.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polyvision::{LayeredCache, Phrase, PolyVision, PolyvisionConfig};
use polyvision::config::CacheConfig;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "polyvision", version, about = "OCR images and translate the recognized phrases")]
struct Cli {
    /// Configuration file (.toml, .yaml, .yml or .json). Defaults to a discovered polyvision.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the persistent cache (overrides the config file)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Translation project identifier (overrides the config file)
    #[arg(long, global = true)]
    project_id: Option<String>,

    /// Translation location (overrides the config file)
    #[arg(long, global = true)]
    location: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recognize text in an image and print the reconstructed phrases
    Recognize {
        image: PathBuf,

        /// Cache key for the result
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Translate phrases read from a JSON file (as printed by `recognize`)
    Translate {
        phrases: PathBuf,

        #[arg(short, long)]
        key: Option<String>,
    },

    /// Recognize an image and translate the phrases in one go
    Run {
        image: PathBuf,

        #[arg(short, long)]
        key: Option<String>,
    },

    /// Inspect or empty the persistent cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Print the number and size of cache files
    Stats,
    /// Delete every cache file
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Command::Recognize { image, key } => {
            let client = PolyVision::new(config).context("Failed to create client")?;
            let image = read_image(&image)?;
            let phrases = client.recognize(key.as_deref(), &image).await?;
            print_json(&phrases)
        }
        Command::Translate { phrases, key } => {
            let client = PolyVision::new(config).context("Failed to create client")?;
            let content = std::fs::read_to_string(&phrases)
                .with_context(|| format!("Failed to read phrases from {}", phrases.display()))?;
            let phrases: Vec<Phrase> = serde_json::from_str(&content)
                .with_context(|| format!("{} does not contain a phrase list", phrases.display()))?;
            let translated = client.translate(key.as_deref(), &phrases).await?;
            print_json(&translated)
        }
        Command::Run { image, key } => {
            let client = PolyVision::new(config).context("Failed to create client")?;
            let image = read_image(&image)?;
            let translated = client.recognize_and_translate(key.as_deref(), &image).await?;
            print_json(&translated)
        }
        Command::Cache { command } => {
            let cache = open_cache(&config.cache)?;
            match command {
                CacheCommand::Stats => {
                    let stats = cache.stats()?;
                    print_json(&json!({
                        "directory": cache.cache_dir(),
                        "total_files": stats.total_files,
                        "total_size_mb": stats.total_size_mb,
                    }))
                }
                CacheCommand::Clear => {
                    let removed = cache.clear()?;
                    print_json(&json!({
                        "directory": cache.cache_dir(),
                        "removed_files": removed,
                    }))
                }
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config`, else a discovered `polyvision.toml`, else defaults.
/// Command-line flags are applied last.
fn load_config(cli: &Cli) -> Result<PolyvisionConfig> {
    let config = match &cli.config {
        Some(path) => PolyvisionConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PolyvisionConfig::discover()?.unwrap_or_default(),
    };

    Ok(apply_overrides(config, cli))
}

fn apply_overrides(mut config: PolyvisionConfig, cli: &Cli) -> PolyvisionConfig {
    if let Some(project_id) = &cli.project_id {
        config.translate.project_id = project_id.clone();
    }
    if let Some(location) = &cli.location {
        config.translate.location = location.clone();
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache.directory = Some(cache_dir.clone());
    }
    config
}

fn open_cache(config: &CacheConfig) -> Result<LayeredCache> {
    let directory = config
        .directory
        .clone()
        .or_else(CacheConfig::default_directory)
        .context("No cache directory configured and no platform cache directory available")?;

    Ok(LayeredCache::new(directory)?)
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
