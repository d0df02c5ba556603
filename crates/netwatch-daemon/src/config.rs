//! Configuration for netwatchd.

use netwatch_monitor::MonitorConfig;
use serde::{Deserialize, Serialize};

/// Main daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DaemonConfig {
    /// Monitor loop configuration.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// System provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// System snapshot provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Whether to scan for visible wireless networks. When disabled, the
    /// SSID portion of every snapshot is empty.
    #[serde(default = "default_true")]
    pub wifi_scan: bool,

    /// Command used to list SSIDs, one per line of terse output.
    #[serde(default = "default_wifi_command")]
    pub wifi_command: Vec<String>,

    /// Include IPv6 addresses in connection listings.
    #[serde(default = "default_true")]
    pub include_ipv6: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            wifi_scan: true,
            wifi_command: default_wifi_command(),
            include_ipv6: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_wifi_command() -> Vec<String> {
    ["nmcli", "-t", "-f", "SSID", "device", "wifi", "list"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from an optional file plus `NETWATCH_*` environment
    /// variables layered on top of the defaults.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NETWATCH")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
