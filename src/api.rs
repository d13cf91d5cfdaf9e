use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::http_cache::get_revalidated;
use crate::http_client::http_client;
use crate::sample_scores;
use crate::scores::RawScoreFrame;

const EXTRA_HEADERS: &[(&str, &str)] = &[("ngrok-skip-browser-warning", "true")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastRun {
    pub status: RunStatus,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_run: Option<LastRun>,
    #[serde(default)]
    pub efficiency: f64,
    #[serde(default)]
    pub growth_quality: f64,
    #[serde(default)]
    pub semantic_score: f64,
    #[serde(default)]
    pub evaluation: String,
    #[serde(default, deserialize_with = "deserialize_scores")]
    pub scores: Option<RawScoreFrame>,
}

fn deserialize_scores<'de, D>(deserializer: D) -> Result<Option<RawScoreFrame>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(Value::is_object)
        .map(|v| RawScoreFrame::from_json_value(&v)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationResult {
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub config_id: String,
    #[serde(default)]
    pub date: String,
    pub efficiency: f64,
    pub evaluation_result: EvaluationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    pub date: String,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentRuns {
    pub config_name: Option<String>,
    pub runs: Vec<Run>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecentRunsPayload {
    Wrapped {
        #[serde(default)]
        config_name: Option<String>,
        runs: Vec<Run>,
    },
    Bare(Vec<Run>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoresSource {
    Api,
    Sample,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDetail {
    pub id: String,
    pub name: String,
    pub performance_data: Vec<PerformanceData>,
    pub recent_runs: Vec<Run>,
    pub scores: RawScoreFrame,
    pub scores_source: ScoresSource,
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// Unwraps the `{success, data, error}` envelope every endpoint answers with.
pub fn parse_envelope<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let envelope: Envelope<T> =
        serde_json::from_str(raw.trim()).context("invalid api response json")?;
    match (envelope.success, envelope.data) {
        (true, Some(data)) => Ok(data),
        _ => Err(anyhow!(
            envelope
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "API request failed".to_string())
        )),
    }
}

pub fn parse_configs_json(raw: &str) -> Result<Vec<Config>> {
    parse_envelope(raw)
}

pub fn parse_config_json(raw: &str) -> Result<Config> {
    parse_envelope(raw)
}

pub fn parse_performance_json(raw: &str) -> Result<Vec<PerformanceData>> {
    parse_envelope(raw)
}

pub fn parse_recent_runs_json(raw: &str) -> Result<RecentRuns> {
    let payload: RecentRunsPayload = parse_envelope(raw)?;
    Ok(match payload {
        RecentRunsPayload::Wrapped { config_name, runs } => RecentRuns { config_name, runs },
        RecentRunsPayload::Bare(runs) => RecentRuns {
            config_name: None,
            runs,
        },
    })
}

/// `config_alpha` -> `alpha_config`, used when the API does not name a config.
pub fn display_name_for(id: &str) -> String {
    format!("{}_config", id.replace("config_", "").to_lowercase())
}

pub struct ApiClient {
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base.trim_end_matches('/').to_string(),
            timeout_secs: config.http_timeout_secs,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> Result<String> {
        let client = http_client(self.timeout_secs)?;
        let url = self.endpoint(path);
        tracing::debug!(%url, "api request");
        get_revalidated(client, &url, EXTRA_HEADERS)
    }

    pub fn fetch_configs(&self) -> Result<Vec<Config>> {
        parse_configs_json(&self.get("/configs")?)
    }

    pub fn fetch_config(&self, id: &str) -> Result<Config> {
        parse_config_json(&self.get(&format!("/configs/{id}"))?)
    }

    pub fn fetch_config_performance(&self, id: &str) -> Result<Vec<PerformanceData>> {
        parse_performance_json(&self.get(&format!("/dashboard/configs/{id}/performance"))?)
    }

    pub fn fetch_config_recent_runs(&self, id: &str) -> Result<RecentRuns> {
        parse_recent_runs_json(&self.get(&format!("/dashboard/configs/{id}/recent-runs"))?)
    }

    /// Performance and runs are required; the score frame is optional and
    /// falls back to the bundled sample when the config has none.
    pub fn fetch_config_detail(&self, id: &str) -> Result<ConfigDetail> {
        let performance_data = self
            .fetch_config_performance(id)
            .context("load performance")?;
        let recent = self.fetch_config_recent_runs(id).context("load recent runs")?;
        let config = match self.fetch_config(id) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(config = id, error = %err, "config lookup failed, using sample scores");
                None
            }
        };
        Ok(assemble_detail(id, performance_data, recent, config))
    }
}

pub fn assemble_detail(
    id: &str,
    performance_data: Vec<PerformanceData>,
    recent: RecentRuns,
    config: Option<Config>,
) -> ConfigDetail {
    let api_name = config
        .as_ref()
        .map(|c| c.name.clone())
        .filter(|n| !n.trim().is_empty());
    let name = recent
        .config_name
        .filter(|n| !n.trim().is_empty())
        .or(api_name)
        .unwrap_or_else(|| display_name_for(id));
    let (scores, scores_source) = match config.and_then(|c| c.scores) {
        Some(frame) => (frame, ScoresSource::Api),
        None => (sample_scores::fallback_frame(), ScoresSource::Sample),
    };
    ConfigDetail {
        id: id.to_string(),
        name,
        performance_data,
        recent_runs: recent.runs,
        scores,
        scores_source,
    }
}
