use std::collections::VecDeque;

use crate::api::{Config, ConfigDetail, ScoresSource};
use crate::config::AppConfig;
use crate::performance::ChartKind;
use crate::scores_view::ScoresView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Configs,
    Detail { config_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Performance,
    Scores,
    Runs,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Performance, DetailTab::Scores, DetailTab::Runs];

    pub fn next(self) -> Self {
        match self {
            DetailTab::Performance => DetailTab::Scores,
            DetailTab::Scores => DetailTab::Runs,
            DetailTab::Runs => DetailTab::Performance,
        }
    }

    pub fn index(self) -> usize {
        DetailTab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Performance => "Performance Overview",
            DetailTab::Scores => "Scores",
            DetailTab::Runs => "Run History",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Configs,
    Detail,
}

#[derive(Debug, Clone)]
pub struct FetchError {
    pub target: FetchTarget,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub tab: DetailTab,
    pub configs: Vec<Config>,
    pub configs_loading: bool,
    pub selected: usize,
    pub detail: Option<ConfigDetail>,
    pub detail_loading: bool,
    pub error: Option<FetchError>,
    pub chart_kind: ChartKind,
    pub scores: ScoresView,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            screen: Screen::Configs,
            tab: DetailTab::Performance,
            configs: Vec::new(),
            configs_loading: true,
            selected: 0,
            detail: None,
            detail_loading: false,
            error: None,
            chart_kind: ChartKind::default(),
            scores: ScoresView::new(
                config.schema_policy,
                config.style_policy,
                config.overlay_seed,
            ),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn selected_config(&self) -> Option<&Config> {
        self.configs.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.configs.is_empty() {
            self.selected = (self.selected + 1).min(self.configs.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_detail(&mut self, config_id: &str) {
        let same = self
            .detail
            .as_ref()
            .is_some_and(|d| d.id == config_id);
        if !same {
            self.detail = None;
        }
        self.screen = Screen::Detail {
            config_id: config_id.to_string(),
        };
        self.detail_loading = true;
        self.error = None;
    }

    pub fn back_to_configs(&mut self) {
        self.screen = Screen::Configs;
        self.error = None;
    }

    pub fn current_config_id(&self) -> Option<&str> {
        match &self.screen {
            Screen::Detail { config_id } => Some(config_id.as_str()),
            Screen::Configs => None,
        }
    }

    fn detail_on_screen(&self) -> bool {
        match (&self.detail, self.current_config_id()) {
            (Some(detail), Some(id)) => detail.id == id,
            _ => false,
        }
    }

    /// The scores view while the config it was loaded from is on screen.
    pub fn active_scores(&self) -> Option<&ScoresView> {
        self.detail_on_screen().then_some(&self.scores)
    }

    pub fn active_scores_mut(&mut self) -> Option<&mut ScoresView> {
        if self.detail_on_screen() {
            Some(&mut self.scores)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetConfigs(Vec<Config>),
    SetConfigDetail(Box<ConfigDetail>),
    FetchFailed {
        target: FetchTarget,
        config_id: Option<String>,
        message: String,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchConfigs,
    FetchConfigDetail { config_id: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetConfigs(configs) => {
            state.configs = configs;
            state.configs_loading = false;
            state.selected = state.selected.min(state.configs.len().saturating_sub(1));
            if state.error.as_ref().is_some_and(|e| e.target == FetchTarget::Configs) {
                state.error = None;
            }
            state.push_log(format!("[INFO] Loaded {} configs", state.configs.len()));
        }
        Delta::SetConfigDetail(detail) => {
            // Results for a config that is no longer on screen are discarded.
            if state.current_config_id() != Some(detail.id.as_str()) {
                tracing::debug!(config = %detail.id, "discarding stale detail");
                return;
            }
            state.scores.load_frame(&detail.scores);
            if detail.scores_source == ScoresSource::Sample {
                state.push_log("[INFO] No scores in config, showing sample scores");
            }
            state.push_log(format!(
                "[INFO] {}: {} metrics, {} points",
                detail.name,
                state.scores.classification().plottable.len(),
                state.scores.table().rows.len()
            ));
            state.detail = Some(*detail);
            state.detail_loading = false;
            state.error = None;
        }
        Delta::FetchFailed {
            target,
            config_id,
            message,
        } => {
            if target == FetchTarget::Detail
                && config_id.as_deref() != state.current_config_id()
            {
                return;
            }
            match target {
                FetchTarget::Configs => state.configs_loading = false,
                FetchTarget::Detail => state.detail_loading = false,
            }
            state.push_log(format!("[WARN] {message}"));
            state.error = Some(FetchError { target, message });
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
