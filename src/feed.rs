use std::collections::HashSet;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::state::{Delta, FetchTarget, ProviderCommand};

/// Runs the API worker. Each command is answered with one or more deltas on
/// `tx`; the thread exits once the command channel is closed.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, config: AppConfig) {
    thread::spawn(move || {
        let api = Arc::new(ApiClient::new(&config));
        let inflight_details: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));
        let _ = tx.send(Delta::Log(format!("[INFO] API base: {}", config.api_base)));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchConfigs => match api.fetch_configs() {
                    Ok(configs) => {
                        tracing::info!(count = configs.len(), "configs loaded");
                        let _ = tx.send(Delta::SetConfigs(configs));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "configs fetch failed");
                        let _ = tx.send(Delta::FetchFailed {
                            target: FetchTarget::Configs,
                            config_id: None,
                            message: format!("Configs fetch error: {err:#}"),
                        });
                    }
                },
                ProviderCommand::FetchConfigDetail { config_id } => {
                    {
                        let mut inflight = inflight_details
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        if !inflight.insert(config_id.clone()) {
                            continue;
                        }
                    }

                    let tx = tx.clone();
                    let api = api.clone();
                    let inflight_details = inflight_details.clone();
                    thread::spawn(move || {
                        match api.fetch_config_detail(&config_id) {
                            Ok(detail) => {
                                tracing::info!(config = %config_id, "detail loaded");
                                let _ = tx.send(Delta::SetConfigDetail(Box::new(detail)));
                            }
                            Err(err) => {
                                tracing::warn!(config = %config_id, error = %err, "detail fetch failed");
                                let _ = tx.send(Delta::FetchFailed {
                                    target: FetchTarget::Detail,
                                    config_id: Some(config_id.clone()),
                                    message: format!("Detail fetch error: {err:#}"),
                                });
                            }
                        }
                        let mut inflight = inflight_details
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        inflight.remove(&config_id);
                    });
                }
            }
        }
    });
}
