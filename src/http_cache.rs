use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "cfgperf_terminal";
const CACHE_FILE: &str = "responses.json";

static CACHE: Mutex<Option<ResponseCache>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ResponseCache {
    version: u32,
    entries: HashMap<String, CachedResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    stored_at: u64,
}

fn with_cache<T>(f: impl FnOnce(&mut ResponseCache) -> T) -> T {
    let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let cache = guard.get_or_insert_with(load_cache);
    f(cache)
}

/// GET with conditional revalidation. A 304 answers from the stored body.
pub fn get_revalidated(client: &Client, url: &str, headers: &[(&str, &str)]) -> Result<String> {
    let cached = with_cache(|cache| cache.entries.get(url).cloned());

    let mut req = client.get(url).header(ACCEPT, "application/json");
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    if let Some(entry) = cached.as_ref() {
        if let Some(etag) = entry.etag.as_deref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(modified) = entry.last_modified.as_deref() {
            req = req.header(IF_MODIFIED_SINCE, modified);
        }
    }

    let resp = req.send().with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        tracing::debug!(url, "served from response cache");
        return cached
            .map(|entry| entry.body)
            .ok_or_else(|| anyhow!("304 from {url} with nothing cached"));
    }

    let header_value = |name: HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let etag = header_value(ETAG);
    let last_modified = header_value(LAST_MODIFIED);

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("HTTP error! status: {status}"));
    }

    if etag.is_some() || last_modified.is_some() {
        let entry = CachedResponse {
            body: body.clone(),
            etag,
            last_modified,
            stored_at: unix_now(),
        };
        with_cache(|cache| {
            cache.version = CACHE_VERSION;
            cache.entries.insert(url.to_string(), entry);
            if let Err(err) = save_cache(cache) {
                tracing::warn!(error = %err, "response cache not saved");
            }
        });
    }
    Ok(body)
}

fn load_cache() -> ResponseCache {
    let Some(raw) = cache_path().and_then(|p| fs::read_to_string(p).ok()) else {
        return ResponseCache::default();
    };
    match serde_json::from_str::<ResponseCache>(&raw) {
        Ok(cache) if cache.version == CACHE_VERSION => cache,
        _ => ResponseCache::default(),
    }
}

fn save_cache(cache: &ResponseCache) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("create cache dir")?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize response cache")?;
    fs::write(&tmp, json).context("write response cache")?;
    fs::rename(&tmp, &path).context("swap response cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR).join(CACHE_FILE))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
