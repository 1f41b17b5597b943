//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub train: TrainSettings,
    pub decode: DecodeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainSettings {
    /// Interpolation weight μ between context-conditional and unigram
    /// probability; higher trusts the context more.
    pub smoothing: f64,
    pub gram_count: usize,
    /// Log a checkpoint every this many corpus lines (0 disables).
    pub progress_interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecodeSettings {
    /// Emitted for syllables absent from the dictionary.
    pub placeholder: String,
}

fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let settings: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    if !(settings.train.smoothing > 0.0 && settings.train.smoothing < 1.0) {
        return Err(SettingsError::InvalidValue {
            field: "train.smoothing".into(),
            reason: "must lie in (0, 1)".into(),
        });
    }
    if settings.train.gram_count < 2 {
        return Err(SettingsError::InvalidValue {
            field: "train.gram_count".into(),
            reason: "must be at least 2".into(),
        });
    }
    if settings.decode.placeholder.is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "decode.placeholder".into(),
            reason: "must be non-empty".into(),
        });
    }
    Ok(settings)
}
