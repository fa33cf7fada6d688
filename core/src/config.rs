use crate::{
    error::{SimError, SimResult},
    horizon::Horizon,
    performance_simulator::VARIANCE_RANGE,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the SQLite database the loader writes to.
pub const DATABASE_URL_ENV: &str = "MKTSIM_DATABASE_URL";

/// Age bands a campaign can target.
pub const TARGET_AUDIENCES: [&str; 5] = ["18-24", "25-34", "35-44", "45-54", "55+"];

// ── Channel profiles ───────────────────────────────────────────────

/// Static performance characteristics of one acquisition channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelProfile {
    pub channel: String,
    pub avg_cpc: f64,
    pub avg_ctr: f64,
    pub avg_cvr: f64,
    pub avg_aov: f64,
    pub budget_min: f64,
    pub budget_max: f64,
}

impl ChannelProfile {
    fn validate(&self) -> SimResult<()> {
        let rates = [("avg_ctr", self.avg_ctr), ("avg_cvr", self.avg_cvr)];
        for (field, rate) in rates {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(SimError::config(format!(
                    "channel '{}': {field}={rate} must be in (0, 1]",
                    self.channel
                )));
            }
            if rate * VARIANCE_RANGE.1 > 1.0 {
                return Err(SimError::config(format!(
                    "channel '{}': {field}={rate} exceeds 1 at peak daily variance {}",
                    self.channel,
                    VARIANCE_RANGE.1
                )));
            }
        }
        let money = [
            ("avg_cpc", self.avg_cpc),
            ("avg_aov", self.avg_aov),
            ("budget_min", self.budget_min),
            ("budget_max", self.budget_max),
        ];
        for (field, value) in money {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::config(format!(
                    "channel '{}': {field}={value} must be > 0",
                    self.channel
                )));
            }
        }
        if self.budget_min > self.budget_max {
            return Err(SimError::config(format!(
                "channel '{}': budget_min {} exceeds budget_max {}",
                self.channel, self.budget_min, self.budget_max
            )));
        }
        Ok(())
    }
}

/// The channel profile table. Order is significant: channel assignment
/// draws an index into this list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelTable {
    pub channels: Vec<ChannelProfile>,
}

impl ChannelTable {
    pub fn get(&self, channel: &str) -> SimResult<&ChannelProfile> {
        self.channels
            .iter()
            .find(|c| c.channel == channel)
            .ok_or_else(|| SimError::UnknownChannel {
                channel: channel.to_string(),
            })
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.channels.is_empty() {
            return Err(SimError::config("channel table is empty"));
        }
        for (i, c) in self.channels.iter().enumerate() {
            if self.channels[..i].iter().any(|o| o.channel == c.channel) {
                return Err(SimError::config(format!(
                    "channel '{}' is listed twice",
                    c.channel
                )));
            }
            c.validate()?;
        }
        Ok(())
    }
}

impl Default for ChannelTable {
    fn default() -> Self {
        let profile = |channel: &str, cpc, ctr, cvr, aov, min, max| ChannelProfile {
            channel: channel.into(),
            avg_cpc: cpc,
            avg_ctr: ctr,
            avg_cvr: cvr,
            avg_aov: aov,
            budget_min: min,
            budget_max: max,
        };
        Self {
            channels: vec![
                profile("paid_search", 2.50, 0.035, 0.025, 85.00, 10_000.0, 50_000.0),
                profile("social",      1.20, 0.018, 0.015, 65.00,  8_000.0, 40_000.0),
                profile("display",     0.75, 0.012, 0.008, 55.00, 15_000.0, 60_000.0),
                profile("email",       0.10, 0.025, 0.035, 75.00,  3_000.0, 15_000.0),
                profile("affiliate",   3.00, 0.045, 0.030, 95.00,  5_000.0, 25_000.0),
            ],
        }
    }
}

// ── Generator ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the main generation stream.
    pub seed: u64,
    pub horizon: Horizon,
    pub num_campaigns: usize,
    /// Hard cap on synthesized customers.
    pub max_customers: usize,
    /// Campaign start is drawn from [0, max_start_offset_days] after horizon start.
    pub max_start_offset_days: u64,
    pub min_duration_days: u64,
    pub max_duration_days: u64,
    /// Share of campaigns that receive an A/B test.
    pub ab_test_fraction: f64,
    /// Fixed seed for choosing which campaigns are A/B tested.
    pub ab_sample_seed: u64,
    pub channels: ChannelTable,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            horizon: Horizon::new(ymd(2024, 1, 1), ymd(2024, 12, 31)),
            num_campaigns: 25,
            max_customers: 5_000,
            max_start_offset_days: 300,
            min_duration_days: 30,
            max_duration_days: 90,
            ab_test_fraction: 0.4,
            ab_sample_seed: 42,
            channels: ChannelTable::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChannelsFile {
    channels: Vec<ChannelProfile>,
}

impl GeneratorConfig {
    /// Defaults, with the channel table overridden by
    /// `{data_dir}/channels.json` when that file exists.
    pub fn load(data_dir: &str) -> SimResult<Self> {
        let mut config = Self::default();
        let path = Path::new(data_dir).join("channels.json");
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| SimError::config(format!("Cannot read {}: {e}", path.display())))?;
            let file: ChannelsFile = serde_json::from_str(&content)
                .map_err(|e| SimError::config(format!("Cannot parse {}: {e}", path.display())))?;
            config.channels = ChannelTable {
                channels: file.channels,
            };
            log::info!(
                "loaded {} channel profiles from {}",
                config.channels.channels.len(),
                path.display()
            );
        } else {
            log::debug!("{} not found, using built-in channel profiles", path.display());
        }
        config.validate()?;
        Ok(config)
    }

    /// Small, fast config for tests.
    pub fn default_test() -> Self {
        Self {
            num_campaigns: 6,
            max_customers: 400,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        self.channels.validate()?;
        if self.min_duration_days > self.max_duration_days {
            return Err(SimError::config(format!(
                "min_duration_days {} exceeds max_duration_days {}",
                self.min_duration_days, self.max_duration_days
            )));
        }
        if self.max_start_offset_days >= self.horizon.days() {
            return Err(SimError::config(format!(
                "max_start_offset_days {} does not fit a {}-day horizon",
                self.max_start_offset_days,
                self.horizon.days()
            )));
        }
        if !(0.0..=1.0).contains(&self.ab_test_fraction) {
            return Err(SimError::config(format!(
                "ab_test_fraction {} must be in [0, 1]",
                self.ab_test_fraction
            )));
        }
        Ok(())
    }
}

// ── Loader ─────────────────────────────────────────────────────────

/// Rows per insert batch, per table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSizes {
    pub campaigns: usize,
    pub daily_performance: usize,
    pub customers: usize,
    pub transactions: usize,
    pub ab_tests: usize,
}

impl Default for BatchSizes {
    fn default() -> Self {
        Self {
            campaigns: 100,
            daily_performance: 500,
            customers: 500,
            transactions: 500,
            ab_tests: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub database_url: String,
    pub batch_sizes: BatchSizes,
}

impl LoaderConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            batch_sizes: BatchSizes::default(),
        }
    }

    /// Read the persistence target from the environment.
    /// A missing or blank value is fatal.
    pub fn from_env() -> SimResult<Self> {
        match std::env::var(DATABASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(Self::new(url)),
            _ => Err(SimError::config(format!(
                "{DATABASE_URL_ENV} is not set; point it at the SQLite database to load into"
            ))),
        }
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("literal calendar date")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        GeneratorConfig::default().validate().unwrap();
        assert_eq!(ChannelTable::default().channels.len(), 5);
    }

    #[test]
    fn unknown_channel_is_an_error() {
        let table = ChannelTable::default();
        assert!(table.get("email").is_ok());
        assert!(matches!(
            table.get("billboard"),
            Err(SimError::UnknownChannel { .. })
        ));
    }

    #[test]
    fn rate_above_one_is_rejected() {
        let mut table = ChannelTable::default();
        table.channels[0].avg_ctr = 1.5;
        assert!(matches!(table.validate(), Err(SimError::Config { .. })));
    }

    #[test]
    fn rate_that_outgrows_the_funnel_under_variance_is_rejected() {
        let mut table = ChannelTable::default();
        table.channels[2].avg_ctr = 0.9;
        assert!(matches!(table.validate(), Err(SimError::Config { .. })));

        let mut table = ChannelTable::default();
        table.channels[3].avg_cvr = 0.8;
        assert!(matches!(table.validate(), Err(SimError::Config { .. })));

        let mut table = ChannelTable::default();
        table.channels[0].avg_ctr = 0.75;
        table.channels[0].avg_cvr = 0.75;
        table.validate().unwrap();
    }

    #[test]
    fn inverted_budget_range_is_rejected() {
        let mut table = ChannelTable::default();
        table.channels[1].budget_min = 90_000.0;
        assert!(table.validate().is_err());
    }

    #[test]
    fn missing_channels_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.channels, ChannelTable::default());
    }

    #[test]
    fn channels_file_overrides_table() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("channels.json"),
            r#"{"channels":[{"channel":"podcast","avg_cpc":4.0,"avg_ctr":0.02,
                "avg_cvr":0.01,"avg_aov":120.0,"budget_min":1000.0,"budget_max":2000.0}]}"#,
        )
        .unwrap();
        let config = GeneratorConfig::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.channels.channels.len(), 1);
        assert_eq!(config.channels.get("podcast").unwrap().avg_aov, 120.0);
    }

    #[test]
    fn malformed_channels_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("channels.json"), "{ not json").unwrap();
        let err = GeneratorConfig::load(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SimError::Config { .. }));
    }
}
