//! Application configuration management.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Environment variable prefix, e.g. `PENNYPLAN__ALLOCATION__ENDPOINT`.
const ENV_PREFIX: &str = "PENNYPLAN";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Defaults for plan-type parameters.
    #[serde(default)]
    pub plan: PlanDefaults,
    /// Remainder allocation configuration.
    #[serde(default)]
    pub allocation: AllocationConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "pennyplan=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Parameters applied when a project names a plan type without its own.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanDefaults {
    /// Assumed annual growth rate for investment and hybrid plans (0.06 = 6%).
    #[serde(default = "default_annual_rate")]
    pub annual_rate: Decimal,
    /// Share of a hybrid plan that follows the flat savings curve, in percent.
    #[serde(default = "default_savings_share_percent")]
    pub savings_share_percent: u8,
}

fn default_annual_rate() -> Decimal {
    Decimal::new(6, 2)
}

fn default_savings_share_percent() -> u8 {
    50
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            annual_rate: default_annual_rate(),
            savings_share_percent: default_savings_share_percent(),
        }
    }
}

/// Remainder allocation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationConfig {
    /// URL of the remote allocation service. The built-in weighted
    /// strategy is used when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout for the remote service in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `dir/default`, `dir/{RUN_MODE}` and the
    /// environment, later sources overriding earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is malformed or a value has the
    /// wrong type.
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let default_file = dir.join("default");
        let mode_file = dir.join(&run_mode);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&mode_file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "PENNYPLAN__ALLOCATION__ENDPOINT",
                "PENNYPLAN__ALLOCATION__TIMEOUT_SECS",
                "PENNYPLAN__PLAN__ANNUAL_RATE",
                "PENNYPLAN__PLAN__SAVINGS_SHARE_PERCENT",
                "PENNYPLAN__LOG__FILTER",
                "PENNYPLAN__LOG__JSON",
                "RUN_MODE",
            ],
            || {
                let config = AppConfig::load_from(Path::new("does-not-exist")).unwrap();
                assert_eq!(config.log.filter, "pennyplan=info");
                assert!(!config.log.json);
                assert_eq!(config.plan.annual_rate, dec!(0.06));
                assert_eq!(config.plan.savings_share_percent, 50);
                assert!(config.allocation.endpoint.is_none());
                assert_eq!(config.allocation.timeout_secs, 10);
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                (
                    "PENNYPLAN__ALLOCATION__ENDPOINT",
                    Some("http://127.0.0.1:8000/api/calculate"),
                ),
                ("PENNYPLAN__ALLOCATION__TIMEOUT_SECS", Some("3")),
                ("PENNYPLAN__PLAN__SAVINGS_SHARE_PERCENT", Some("70")),
            ],
            || {
                let config = AppConfig::load_from(Path::new("does-not-exist")).unwrap();
                assert_eq!(
                    config.allocation.endpoint.as_deref(),
                    Some("http://127.0.0.1:8000/api/calculate")
                );
                assert_eq!(config.allocation.timeout_secs, 3);
                assert_eq!(config.plan.savings_share_percent, 70);
            },
        );
    }
}
