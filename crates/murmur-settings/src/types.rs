//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production default values. `#[serde(default)]` allows
//! partial JSON — missing fields get their default during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the murmur backend.
///
/// Loaded from `~/.murmur/settings.json` with defaults applied for missing
/// fields. `MURMUR_*` environment variables override specific values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MurmurSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Server network settings.
    pub server: ServerSettings,
    /// Storage settings.
    pub storage: StorageSettings,
    /// Language-model generator settings.
    pub llm: LlmSettings,
    /// Transcription sidecar settings.
    pub transcription: TranscriptionSettings,
    /// Context window settings.
    pub context: ContextSettings,
}

impl Default for MurmurSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "murmur".to_string(),
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            llm: LlmSettings::default(),
            transcription: TranscriptionSettings::default(),
            context: ContextSettings::default(),
        }
    }
}

impl MurmurSettings {
    /// Correct invalid invariants in place.
    ///
    /// Called automatically during loading. Out-of-range values are clamped
    /// with a warning rather than rejected.
    pub fn validate(&mut self) {
        if self.context.window_messages == 0 {
            tracing::warn!("context.windowMessages is 0, correcting to 1");
            self.context.window_messages = 1;
        }
        if self.llm.max_tokens == 0 {
            tracing::warn!("llm.maxTokens is 0, correcting to 1");
            self.llm.max_tokens = 1;
        }
    }
}

/// Server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// HTTP + WebSocket port.
    pub port: u16,
    /// Allowed CORS origins. Empty means no cross-origin access.
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

/// Storage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Path to the `SQLite` database file.
    pub db_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_path: "murmur.db".to_string(),
        }
    }
}

/// Language-model generator settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmSettings {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Provider API base URL.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Request timeout for a single generation call, in milliseconds.
    pub request_timeout_ms: u64,
    /// System prompt prefixed to every generation call.
    pub system_prompt: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "claude-3-sonnet-20240229".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            max_tokens: 300,
            request_timeout_ms: 30_000,
            system_prompt: default_system_prompt(),
        }
    }
}

/// Transcription sidecar settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionSettings {
    /// Whether audio submission is enabled.
    pub enabled: bool,
    /// Base URL of the transcription sidecar.
    pub base_url: String,
    /// Request timeout for a single transcription call, in milliseconds.
    pub timeout_ms: u64,
    /// Maximum accepted audio payload size in bytes.
    pub max_audio_bytes: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://127.0.0.1:9876".to_string(),
            timeout_ms: 30_000,
            max_audio_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Context window settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextSettings {
    /// Most-recent messages fetched from the store per generator call.
    ///
    /// The generator applies its own independent trim; the effective bound
    /// sent upstream is the minimum of the two.
    pub window_messages: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            window_messages: 10,
        }
    }
}

fn default_system_prompt() -> String {
    "You are Murmur, a real-time conversation assistant. Provide quick, \
     helpful responses. Be concise but thorough — users need fast, \
     actionable advice. Keep responses under 150 words unless specifically \
     asked for more detail."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let s = MurmurSettings::default();
        assert_eq!(s.version, "0.1.0");
        assert_eq!(s.name, "murmur");
        assert_eq!(s.server.port, 8000);
        assert_eq!(s.llm.model, "claude-3-sonnet-20240229");
        assert_eq!(s.llm.max_tokens, 300);
        assert_eq!(s.context.window_messages, 10);
        assert_eq!(s.transcription.max_audio_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: MurmurSettings =
            serde_json::from_str(r#"{"server": {"port": 9090}}"#).unwrap();
        assert_eq!(s.server.port, 9090);
        assert_eq!(s.server.host, "0.0.0.0");
        assert_eq!(s.llm.max_tokens, 300);
    }

    #[test]
    fn camel_case_keys() {
        let val = serde_json::to_value(MurmurSettings::default()).unwrap();
        assert!(val["llm"].get("maxTokens").is_some());
        assert!(val["llm"].get("requestTimeoutMs").is_some());
        assert!(val["context"].get("windowMessages").is_some());
        assert!(val["llm"].get("max_tokens").is_none());
    }

    #[test]
    fn validate_corrects_zero_window() {
        let mut s = MurmurSettings::default();
        s.context.window_messages = 0;
        s.validate();
        assert_eq!(s.context.window_messages, 1);
    }

    #[test]
    fn validate_corrects_zero_max_tokens() {
        let mut s = MurmurSettings::default();
        s.llm.max_tokens = 0;
        s.validate();
        assert_eq!(s.llm.max_tokens, 1);
    }
}
