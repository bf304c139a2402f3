use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use tracing::warn;
use url::Url;

pub const CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_report: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".into(),
            request_timeout_secs: 60,
            default_report: "dashboard".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed reporting API base URL. Only http(s) is accepted.
    pub fn base_url(&self) -> anyhow::Result<Url> {
        let raw = self.api_base_url.trim();
        let url = Url::parse(raw).with_context(|| format!("invalid api_base_url '{raw}'"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api_base_url must use http or https, got '{}'", url.scheme());
        }
        Ok(url)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then `path` if it exists, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("DASHBOARD_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match parse_timeout(&v) {
            Some(parsed) => settings.request_timeout_secs = parsed,
            None => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__DEFAULT_REPORT") {
        settings.default_report = v;
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(value) = file_cfg.get("request_timeout_secs") {
        let parsed = match value {
            toml::Value::Integer(v) => u64::try_from(*v).ok().filter(|secs| *secs > 0),
            toml::Value::String(v) => parse_timeout(v),
            _ => None,
        };
        match parsed {
            Some(secs) => settings.request_timeout_secs = secs,
            None => warn!(value = %value, "ignoring invalid request_timeout_secs"),
        }
    }
    if let Some(v) = file_cfg.get("default_report").and_then(toml::Value::as_str) {
        settings.default_report = v.to_string();
    }
}

/// Positive whole seconds; a zero timeout would fail every request.
fn parse_timeout(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
