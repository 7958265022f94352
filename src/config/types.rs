use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::metrics::MetricsConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

/// Background job schedule.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct JobsConfig {
    #[serde(default = "default_order_sweeper_interval_secs")]
    pub order_sweeper_interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        JobsConfig {
            order_sweeper_interval_secs: default_order_sweeper_interval_secs(),
        }
    }
}

fn default_order_sweeper_interval_secs() -> u64 {
    60
}

impl From<Config> for ConfigV1 {
    fn from(config: Config) -> Self {
        match config {
            Config::ConfigV1(c) => c,
        }
        // handle configuration migration between versions here when necessary
    }
}

/// Load config from a YAML file, with `APPMON_` environment overrides
/// (`APPMON_METRICS__NAMESPACE=myapp` sets `metrics.namespace`).
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigV1, figment::Error> {
    let figment = Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed("APPMON_").split("__"));
    figment.extract::<Config>().map(ConfigV1::from)
}

/// Parse config from an inline YAML document, without environment overrides.
pub fn load_config_str(yaml: &str) -> Result<ConfigV1, figment::Error> {
    Figment::new()
        .merge(Yaml::string(yaml))
        .extract::<Config>()
        .map(ConfigV1::from)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
