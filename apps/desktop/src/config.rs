use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use client_core::{ExportQuoting, DEFAULT_ENDPOINT};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "analysis.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub export_dir: PathBuf,
    pub export_quoting: ExportQuoting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            export_dir: PathBuf::from("."),
            export_quoting: ExportQuoting::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoint: Option<String>,
    export_dir: Option<PathBuf>,
    export_quoting: Option<ExportQuoting>,
}

/// Defaults, then `config_path` if it exists, then environment overrides.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    load_settings_with_env(config_path, |name| std::env::var(name).ok())
}

pub(crate) fn load_settings_with_env(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read '{}'", config_path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", config_path.display()))?;
        if let Some(v) = file_cfg.endpoint {
            settings.endpoint = v;
        }
        if let Some(v) = file_cfg.export_dir {
            settings.export_dir = v;
        }
        if let Some(v) = file_cfg.export_quoting {
            settings.export_quoting = v;
        }
    }

    if let Some(v) = env("ANALYSIS_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = env("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = env("APP__EXPORT_DIR") {
        settings.export_dir = PathBuf::from(v);
    }

    if let Some(v) = env("APP__EXPORT_QUOTING") {
        settings.export_quoting = v
            .parse()
            .map_err(|err: String| anyhow::anyhow!(err))
            .context("APP__EXPORT_QUOTING")?;
    }

    settings.endpoint = normalize_endpoint(&settings.endpoint)?;
    Ok(settings)
}

/// Adds `http://` to bare host paths and rejects anything that is not an
/// http(s) URL.
pub fn normalize_endpoint(raw_endpoint: &str) -> anyhow::Result<String> {
    let raw_endpoint = raw_endpoint.trim();

    if raw_endpoint.is_empty() {
        return Ok(DEFAULT_ENDPOINT.to_string());
    }

    let candidate = if raw_endpoint.contains("://") {
        raw_endpoint.to_string()
    } else {
        format!("http://{raw_endpoint}")
    };

    let url = Url::parse(&candidate)
        .with_context(|| format!("invalid analysis endpoint '{raw_endpoint}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "analysis endpoint '{raw_endpoint}' must use http or https, not '{}'",
            url.scheme()
        );
    }

    Ok(url.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
