use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::scores::SchemaPolicy;
use crate::series::StylePolicy;

const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub http_timeout_secs: u64,
    pub detail_refresh: Duration,
    pub schema_policy: SchemaPolicy,
    pub style_policy: StylePolicy,
    pub overlay_seed: u64,
    pub export_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout_secs: 10,
            detail_refresh: Duration::from_secs(120),
            schema_policy: SchemaPolicy::default(),
            style_policy: StylePolicy::default(),
            overlay_seed: 7,
            export_dir: PathBuf::from("."),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Reads `CFGPERF_*` variables; anything missing or unparsable keeps its
    /// default. Call after `.env` files are loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let number = |name: &str| non_empty(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            api_base: non_empty("CFGPERF_API_BASE")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            http_timeout_secs: number("CFGPERF_HTTP_TIMEOUT_SECS")
                .unwrap_or(defaults.http_timeout_secs)
                .max(1),
            detail_refresh: number("CFGPERF_REFRESH_SECS")
                .map(|secs| Duration::from_secs(secs.max(30)))
                .unwrap_or(defaults.detail_refresh),
            schema_policy: non_empty("CFGPERF_SCHEMA")
                .and_then(|v| SchemaPolicy::parse(&v))
                .unwrap_or(defaults.schema_policy),
            style_policy: non_empty("CFGPERF_STYLE")
                .and_then(|v| StylePolicy::parse(&v))
                .unwrap_or(defaults.style_policy),
            overlay_seed: number("CFGPERF_OVERLAY_SEED").unwrap_or(defaults.overlay_seed),
            export_dir: non_empty("CFGPERF_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            log_file: non_empty("CFGPERF_LOG_FILE").map(PathBuf::from),
        }
    }
}
