use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("cfgperf_terminal/", env!("CARGO_PKG_VERSION"));

static API_CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client for the config API. The first caller's timeout is
/// the one that sticks.
pub fn http_client(timeout_secs: u64) -> Result<&'static Client> {
    API_CLIENT.get_or_try_init(|| {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .context("build api http client")
    })
}
