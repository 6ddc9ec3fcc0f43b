use serde::Deserialize;

use crate::error::{CampaignError, CampaignResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_DASHBOARD__` and an optional TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub seeds: SeedConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logs: LogConfig,
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

/// Seeds of the two independent random streams. The fixture stream builds
/// the initial document; the runtime stream drives simulated variance.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_fixture_seed")]
    pub fixtures: u32,
    #[serde(default = "default_runtime_seed")]
    pub runtime: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_sync_delay_ms")]
    pub sync_delay_ms: u64,
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    #[serde(default = "default_metric_days")]
    pub metric_days: u32,
    #[serde(default = "default_initial_logs")]
    pub initial_logs: usize,
}

// Default functions
fn default_fixture_seed() -> u32 {
    42
}
fn default_runtime_seed() -> u32 {
    2025
}
fn default_sync_delay_ms() -> u64 {
    800
}
fn default_refresh_delay_ms() -> u64 {
    600
}
fn default_log_capacity() -> usize {
    250
}
fn default_metric_days() -> u32 {
    30
}
fn default_initial_logs() -> usize {
    90
}

/// Longest metric window the fixture generator accepts, in days.
pub const MAX_METRIC_DAYS: u32 = 3650;

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            fixtures: default_fixture_seed(),
            runtime: default_runtime_seed(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sync_delay_ms: default_sync_delay_ms(),
            refresh_delay_ms: default_refresh_delay_ms(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
        }
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            metric_days: default_metric_days(),
            initial_logs: default_initial_logs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seeds: SeedConfig::default(),
            simulation: SimulationConfig::default(),
            logs: LogConfig::default(),
            fixtures: FixtureConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and an optional config file.
    pub fn load(path: Option<&str>) -> CampaignResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CampaignResult<()> {
        if self.logs.capacity == 0 {
            return Err(CampaignError::Config(
                "logs.capacity must be greater than zero".to_string(),
            ));
        }
        if self.fixtures.metric_days == 0 {
            return Err(CampaignError::Config(
                "fixtures.metric_days must be greater than zero".to_string(),
            ));
        }
        if self.fixtures.metric_days > MAX_METRIC_DAYS {
            return Err(CampaignError::Config(format!(
                "fixtures.metric_days must be at most {MAX_METRIC_DAYS}"
            )));
        }
        Ok(())
    }
}
