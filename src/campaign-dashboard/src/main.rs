//! Campaign Dashboard — in-memory advertising campaign document.
//!
//! Boots the store from seeded fixtures, runs one simulated sync/refresh
//! cycle and prints the dashboard overview (or the full snapshot) as JSON.

use campaign_core::config::AppConfig;
use campaign_management::DataStore;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-dashboard")]
#[command(about = "In-memory advertising campaign dashboard")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long)]
    config: Option<String>,

    /// Fixture seed (overrides config)
    #[arg(long, env = "CAMPAIGN_DASHBOARD__SEEDS__FIXTURES")]
    seed: Option<u32>,

    /// Runtime variance seed (overrides config)
    #[arg(long, env = "CAMPAIGN_DASHBOARD__SEEDS__RUNTIME")]
    runtime_seed: Option<u32>,

    /// Skip the simulated delays
    #[arg(long, default_value_t = false)]
    no_delay: bool,

    /// API points to consume after the sync cycle
    #[arg(long, default_value_t = 0)]
    consume: u64,

    /// Print the whole document instead of the overview
    #[arg(long, default_value_t = false)]
    snapshot: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_dashboard=info,campaign_management=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("Campaign Dashboard starting up");

    // Load configuration
    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(seed) = cli.seed {
        config.seeds.fixtures = seed;
    }
    if let Some(seed) = cli.runtime_seed {
        config.seeds.runtime = seed;
    }
    if cli.no_delay {
        config.simulation.sync_delay_ms = 0;
        config.simulation.refresh_delay_ms = 0;
    }

    info!(
        fixture_seed = config.seeds.fixtures,
        runtime_seed = config.seeds.runtime,
        log_capacity = config.logs.capacity,
        "Configuration loaded"
    );

    let mut store = DataStore::new(&config)?;

    store.synchronize_data().await;
    store.refresh_statistics().await;
    if cli.consume > 0 {
        store.consume_api_points(cli.consume);
    }

    let output = if cli.snapshot {
        store.snapshot_json()?
    } else {
        serde_json::to_string_pretty(&store.overview())?
    };
    println!("{output}");

    Ok(())
}
