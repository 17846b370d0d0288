use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guildboard::api::state::AppState;
use guildboard::api::build_router;
use guildboard::config::AppConfig;
use guildboard::fetch::RankingClient;
use guildboard::history::HistoryAggregator;
use guildboard::models::{Dataset, Mode};
use guildboard::{calculate, view};

#[derive(Parser)]
#[command(name = "guildboard")]
#[command(about = "Guild event leaderboard with derived rankings and trend history")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Local data directory (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Remote data base URL (overrides config and --data-dir)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List catalog events
    Events {
        /// Only events of this mode ("ex" or "ss")
        #[arg(long)]
        mode: Option<String>,
    },

    /// Print one event's ranked table
    Ranking {
        /// Catalog file reference, e.g. "ex/2025_0601.json"
        file: String,

        /// Mode ("ex" or "ss"); defaults to the catalog entry's mode
        #[arg(long)]
        mode: Option<String>,
    },

    /// Print a guild's trend across past events
    History {
        /// Guild name as it appears in ranking files
        guild: String,

        /// Mode ("ex" or "ss")
        #[arg(long, default_value = "ex")]
        mode: String,

        /// Number of past events to include
        #[arg(long)]
        window: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting guildboard v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let client = RankingClient::with_defaults(config.data_source()?)
        .context("Failed to create ranking client")?;

    match cli.command {
        Commands::Serve { host, port } => {
            let catalog = client
                .load_catalog()
                .await
                .context("Failed to load event catalog")?;

            let state = AppState::new(client, catalog, config.history_window);
            let app = build_router(state, config.server.static_dir.as_deref());

            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Leaderboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Events { mode } => {
            let catalog = client
                .load_catalog()
                .await
                .context("Failed to load event catalog")?;
            let mode = parse_mode(mode.as_deref())?;

            let events: Vec<_> = match mode {
                Some(mode) => catalog.events_for(mode),
                None => catalog.all().iter().collect(),
            };

            println!("=== Events ({}) ===\n", events.len());
            for event in events {
                println!("  [{}] {} — {}", event.mode, event.name, event.file);
            }
        }
        Commands::Ranking { file, mode } => {
            let mode = match parse_mode(mode.as_deref())? {
                Some(mode) => mode,
                None => {
                    let catalog = client
                        .load_catalog()
                        .await
                        .context("Failed to load event catalog")?;
                    catalog
                        .find_by_file(&file)
                        .map(|e| e.mode)
                        .with_context(|| format!("{} not in catalog; pass --mode", file))?
                }
            };

            let loaded = client
                .load_event(&file)
                .await
                .with_context(|| format!("Failed to load {}", file))?;
            let dataset = calculate::compute(loaded.payload.ranking, mode);

            let title = loaded.payload.title.unwrap_or_else(|| file.clone());
            println!("=== {} ({} guilds) ===\n", title, dataset.len());
            print_dataset(&dataset);
        }
        Commands::History {
            guild,
            mode,
            window,
        } => {
            let mode: Mode = mode
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let catalog = client
                .load_catalog()
                .await
                .context("Failed to load event catalog")?;

            let aggregator = HistoryAggregator::new();
            let series = aggregator
                .history(
                    &client,
                    &catalog,
                    &guild,
                    mode,
                    window.unwrap_or(config.history_window),
                )
                .await
                .context("History assembly failed")?;

            println!("=== {} ({} events) ===\n", guild, series.len());
            for i in 0..series.len() {
                let rank = series.ranks[i]
                    .map(|r| format!("#{}", r))
                    .unwrap_or_else(|| "－".to_string());
                println!(
                    "  {:<16} {:>4}  {}",
                    series.labels[i],
                    rank,
                    view::scaled_score(mode, series.scores[i], 1)
                );
            }
        }
    }

    Ok(())
}

/// Read the config file when present, otherwise defaults; CLI source flags
/// override whatever the file says.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = PathBuf::from(&cli.config);
    let mut config = if path.exists() {
        AppConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {:?}", path))?
    } else {
        AppConfig::default()
    };

    if let Some(ref dir) = cli.data_dir {
        config.source.data_dir = dir.clone();
        config.source.base_url = None;
    }
    if let Some(ref base) = cli.base_url {
        config.source.base_url = Some(base.clone());
    }

    config.validate()?;
    Ok(config)
}

fn parse_mode(tag: Option<&str>) -> Result<Option<Mode>> {
    match tag {
        Some(tag) => {
            let mode = tag.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            Ok(Some(mode))
        }
        None => Ok(None),
    }
}

fn print_dataset(dataset: &Dataset) {
    match dataset {
        Dataset::Aggregate(records) => {
            let totals: Vec<u64> = records.iter().map(|r| r.t3).collect();
            let gaps = calculate::gaps(&totals);
            println!(
                "  {:>3} {:<24} {:>12} {:>12} {:>12} {:>12} {:>12}",
                "順", "ギルド名", "Day1累計", "Day2累計", "Day3累計", "1位差", "上差"
            );
            for (r, gap) in records.iter().zip(gaps) {
                println!(
                    "  {:>3} {:<24} {:>12} {:>12} {:>12} {:>12} {:>12}",
                    r.rank_t3, r.guild_name, r.t1, r.t2, r.t3, gap.to_leader, gap.to_previous
                );
            }
        }
        Dataset::Single(records) => {
            let scores: Vec<u64> = records.iter().map(|r| r.score).collect();
            let gaps = calculate::gaps(&scores);
            println!(
                "  {:>3} {:<24} {:>12} {:>4} {:>12} {:>12}",
                "順", "ギルド名", "スコア", "人", "1位差", "上差"
            );
            for (r, gap) in records.iter().zip(gaps) {
                let rank = r
                    .rank
                    .map(|rank| rank.to_string())
                    .unwrap_or_else(|| "－".to_string());
                println!(
                    "  {:>3} {:<24} {:>12} {:>4} {:>12} {:>12}",
                    rank, r.guild_name, r.score, r.members, gap.to_leader, gap.to_previous
                );
            }
        }
    }
}
