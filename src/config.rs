//! Metrics and logging configuration loaded from the environment.

use crate::domain::ConfigError;

pub const ENV_RECOMMENDED_NAMING: &str = "METRICS_RECOMMENDED_NAMING";
pub const ENV_GLOBAL_LABELS: &str = "METRICS_GLOBAL_LABELS";
pub const ENV_HISTOGRAM_BUCKETS: &str = "METRICS_HISTOGRAM_BUCKETS";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration for the metrics registry.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Apply Prometheus naming conventions (e.g. `_total` on counters)
    pub recommended_naming: bool,
    /// Labels attached to every rendered series
    pub global_labels: Vec<(String, String)>,
    /// Histogram buckets; `None` renders histograms as summaries
    pub histogram_buckets: Option<Vec<f64>>,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            recommended_naming: true,
            global_labels: Vec::new(),
            histogram_buckets: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl MetricsConfig {
    /// Load `.env` (if present) and then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    ///
    /// Unset or blank values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(ENV_RECOMMENDED_NAMING) {
            config.recommended_naming = parse_bool(ENV_RECOMMENDED_NAMING, &value)?;
        }
        if let Some(value) = get(ENV_GLOBAL_LABELS) {
            config.global_labels = parse_labels(&value)?;
        }
        if let Some(value) = get(ENV_HISTOGRAM_BUCKETS) {
            config.histogram_buckets = Some(parse_buckets(&value)?);
        }
        if let Some(value) = get(ENV_LOG_FORMAT) {
            config.log_format = match value.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                other => {
                    return Err(invalid(
                        ENV_LOG_FORMAT,
                        format!("unknown format '{other}', expected json or pretty"),
                    ));
                }
            };
        }

        Ok(config)
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("'{other}' is not a boolean"))),
    }
}

fn parse_labels(value: &str) -> Result<Vec<(String, String)>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| invalid(ENV_GLOBAL_LABELS, format!("'{pair}' is not key=value")))?;
            let k = k.trim();
            if k.is_empty() {
                return Err(invalid(ENV_GLOBAL_LABELS, "label name is empty"));
            }
            Ok((k.to_string(), v.trim().to_string()))
        })
        .collect()
}

fn parse_buckets(value: &str) -> Result<Vec<f64>, ConfigError> {
    let buckets = value
        .split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| {
            b.parse::<f64>()
                .map_err(|e| invalid(ENV_HISTOGRAM_BUCKETS, format!("'{b}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if buckets.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid(
            ENV_HISTOGRAM_BUCKETS,
            "buckets must be strictly increasing",
        ));
    }
    Ok(buckets)
}
