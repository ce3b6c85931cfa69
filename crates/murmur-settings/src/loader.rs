//! Settings loading: defaults, user file deep-merge, env overrides.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::MurmurSettings;

/// Default settings file path: `~/.murmur/settings.json`.
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(format!("{home}/.murmur/settings.json"))
}

/// Deep-merge `overlay` into `base`.
///
/// Objects merge recursively; any other value in `overlay` replaces the
/// corresponding value in `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from the default path with env overrides.
pub fn load_settings() -> Result<MurmurSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path.
///
/// Layers: compiled defaults ← file (deep merge) ← `MURMUR_*` env overrides.
/// A missing file is not an error — defaults plus env are used.
pub fn load_settings_from_path(path: &Path) -> Result<MurmurSettings> {
    let defaults = serde_json::to_value(MurmurSettings::default())?;

    let merged = if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        let file_value: Value = serde_json::from_str(&raw)?;
        debug!(?path, "merging settings file over defaults");
        deep_merge(defaults, file_value)
    } else {
        debug!(?path, "settings file missing, using defaults");
        defaults
    };

    let mut settings: MurmurSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate();
    Ok(settings)
}

/// Apply `MURMUR_*` environment variable overrides (highest priority).
fn apply_env_overrides(settings: &mut MurmurSettings) {
    if let Ok(host) = std::env::var("MURMUR_HOST") {
        settings.server.host = host;
    }
    if let Ok(port) = std::env::var("MURMUR_PORT") {
        match port.parse() {
            Ok(p) => settings.server.port = p,
            Err(_) => tracing::warn!(port, "invalid MURMUR_PORT, ignoring"),
        }
    }
    if let Ok(origins) = std::env::var("MURMUR_CORS_ORIGINS") {
        settings.server.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    if let Ok(db_path) = std::env::var("MURMUR_DB_PATH") {
        settings.storage.db_path = db_path;
    }
    if let Ok(model) = std::env::var("MURMUR_LLM_MODEL") {
        settings.llm.model = model;
    }
    if let Ok(base_url) = std::env::var("MURMUR_LLM_BASE_URL") {
        settings.llm.base_url = base_url;
    }
    if let Ok(base_url) = std::env::var("MURMUR_TRANSCRIBE_BASE_URL") {
        settings.transcription.base_url = base_url;
    }
}
