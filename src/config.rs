//! Configuration management for tailor-fit
//!
//! Reads settings from ~/.config/tailor-fit/config.json. The file is edited
//! by hand; the API key lives in the environment or the system keychain.

use crate::generator::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::keyring;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables checked for an API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Image model name (defaults to the Gemini image model)
    pub model: Option<String>,
    /// Endpoint root, useful for proxies
    pub api_base: Option<String>,
    /// Optional client-side timeout; the service's own limits apply otherwise
    pub request_timeout_secs: Option<u64>,
    /// Where saved try-on images are written (defaults to the current directory)
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tailor-fit"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return default
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Config>(&content) {
            Ok(mut config) => {
                config.sanitize();
                config
            }
            Err(err) => {
                preserve_corrupt_config(path, &content);
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "config file was corrupted; a backup was saved and defaults were loaded"
                );
                Self::default()
            }
        }
    }

    fn sanitize(&mut self) {
        if self.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            self.model = None;
        }
        if let Some(base) = self.api_base.as_deref() {
            if let Err(err) = url::Url::parse(base) {
                tracing::warn!(api_base = base, error = %err, "ignoring invalid api_base");
                self.api_base = None;
            }
        }
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the API key (from environment or keychain)
    pub fn api_key(&self) -> Option<String> {
        // Environment variables take precedence
        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Some(key.trim().to_string());
                }
            }
        }

        match keyring::get_api_key() {
            Ok(key) => key,
            Err(err) => {
                keyring::warn_keychain_error_once("the Gemini API key", &err);
                None
            }
        }
    }

    /// Store the API key in the system keychain
    pub fn set_api_key(&self, key: &str) -> Result<(), String> {
        keyring::set_api_key(key).map_err(|e| {
            format!(
                "Failed to store API key in system keychain: {}. \
                 You can set the GEMINI_API_KEY environment variable instead.",
                e
            )
        })
    }

    /// Get the config file location for display
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/tailor-fit/config.json".to_string())
    }
}

/// Interactive prompt to set up the API key
pub fn setup_api_key_interactive() -> Result<(), String> {
    use std::io;

    println!();
    println!("  ┌─────────────────────────────────────────────────────────┐");
    println!("  │  GEMINI SETUP                                           │");
    println!("  └─────────────────────────────────────────────────────────┘");
    println!();
    println!("  tailor-fit uses Gemini to render your virtual fitting.");
    println!();
    println!("  1. Create an API key at: https://aistudio.google.com/apikey");
    println!("  2. Paste it below (saved in your system keychain)");
    println!();
    print!("  API Key: ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut key = String::new();
    io::stdin().read_line(&mut key).map_err(|e| e.to_string())?;
    let key = key.trim();

    if key.is_empty() {
        return Err("No API key provided".to_string());
    }
    if !key.starts_with("AIza") {
        println!();
        println!("  Warning: Key doesn't look like a Gemini key (should start with AIza)");
        println!("     Saving anyway...");
    }

    Config::load().set_api_key(key)?;

    println!();
    println!("  + API key saved to the system keychain");
    println!();
    Ok(())
}

fn preserve_corrupt_config(path: &std::path::Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}
