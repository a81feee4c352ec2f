//! Application configuration.
//!
//! Settings come from an optional JSON file and are then overridden by
//! command-line flags. Every field has a default, so an empty file (or no
//! file at all) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use engine_ecs::WorldConfig;
use serde::Deserialize;

/// Command-line flags.
#[derive(Debug, Parser)]
#[command(name = "engine_app", about = "Runs the ECS demo simulation")]
pub struct Cli {
    /// Path to a JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Target ticks per second.
    #[arg(long)]
    pub tick_rate: Option<f64>,
    /// Number of ticks to run (0 = unlimited).
    #[arg(long)]
    pub max_ticks: Option<u64>,
    /// Number of bodies spawned at startup.
    #[arg(long)]
    pub spawn: Option<usize>,
}

/// Configuration for the tick loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tick: TickConfig,
    pub world: WorldConfig,
    /// Bodies spawned before the first tick.
    pub spawn: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick: TickConfig::default(),
            world: WorldConfig::default(),
            spawn: 16,
        }
    }
}

impl TickConfig {
    /// Wall-clock length of one tick.
    ///
    /// # Errors
    ///
    /// Fails unless the rate is finite, positive, and gives a period that
    /// fits in a [`Duration`].
    pub fn period(&self) -> Result<Duration> {
        anyhow::ensure!(
            self.tick_rate.is_finite() && self.tick_rate > 0.0,
            "tick rate must be positive, got {}",
            self.tick_rate
        );
        Duration::try_from_secs_f64(1.0 / self.tick_rate)
            .with_context(|| format!("tick rate {} is out of range", self.tick_rate))
    }
}

impl AppConfig {
    /// Read a config file.
    ///
    /// # Errors
    ///
    /// Fails if the file can not be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse a config from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or mistyped fields.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve the final config: file (if any), then CLI overrides.
    ///
    /// # Errors
    ///
    /// Propagates file errors and rejects a tick rate without a valid
    /// period.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(rate) = cli.tick_rate {
            config.tick.tick_rate = rate;
        }
        if let Some(max) = cli.max_ticks {
            config.tick.max_ticks = max;
        }
        if let Some(spawn) = cli.spawn {
            config.spawn = spawn;
        }
        config.tick.period()?;
        Ok(config)
    }
}
