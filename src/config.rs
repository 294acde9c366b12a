//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Catalog API credentials
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_backdrop_size")]
    pub backdrop_size: String,
    #[serde(default = "default_hero_size")]
    pub hero_size: String,
    // Network
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    // Appearance
    #[serde(default = "default_transition_secs")]
    pub transition_secs: f64,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    // Saved state
    #[serde(default)]
    pub save_state: bool,
    #[serde(default)]
    pub last_route: String,
}

fn default_api_base_url() -> String { "https://api.themoviedb.org/3".to_string() }
fn default_image_base_url() -> String { "https://image.tmdb.org/t/p".to_string() }
fn default_backdrop_size() -> String { "w500".to_string() }
fn default_hero_size() -> String { "original".to_string() }
fn default_request_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_cache_ttl() -> u64 { 300 }
fn default_transition_secs() -> f64 { 1.0 }
fn default_font_size() -> u32 { 14 }
fn default_true() -> bool { true }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            access_token: String::new(),
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            backdrop_size: default_backdrop_size(),
            hero_size: default_hero_size(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            cache_ttl_secs: 300,
            transition_secs: 1.0,
            dark_mode: true,
            font_size: 14,
            save_state: false,
            last_route: String::new(),
        }
    }
}

/// Result of [`AppConfig::load`], with anything worth telling the console
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warning: Option<String>,
}

impl AppConfig {
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("nomflix");
        fs::create_dir_all(&path).ok();
        path.push("config.json");
        path
    }

    /// Load from disk, falling back to defaults, then apply env overrides
    pub fn load() -> LoadedConfig {
        let path = Self::config_path();
        let mut warning = None;

        let mut config = if path.exists() {
            match fs::read_to_string(&path).map(|content| Self::from_json(&content)) {
                Ok(Ok(config)) => config,
                Ok(Err(e)) => {
                    warning = Some(format!("Ignoring invalid config {}: {}", path.display(), e));
                    Self::default()
                }
                Err(e) => {
                    warning = Some(format!("Could not read config {}: {}", path.display(), e));
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.apply_env_overrides(
            std::env::var("TMDB_API_KEY").ok(),
            std::env::var("TMDB_ACCESS_TOKEN").ok(),
        );

        LoadedConfig { config, warning }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Non-empty environment values win over the file
    pub fn apply_env_overrides(&mut self, api_key: Option<String>, access_token: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        if let Some(token) = access_token.filter(|t| !t.trim().is_empty()) {
            self.access_token = token;
        }
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = Self::config_path();
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Serialize failed: {}", e))?;
        fs::write(&path, content).map_err(|e| format!("Write failed: {}", e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.api_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.backdrop_size, "w500");
        assert_eq!(config.hero_size, "original");
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.transition_secs, 1.0);
        assert!(config.dark_mode);
        assert!(!config.save_state);
    }

    #[test]
    fn test_partial_json_keeps_values() {
        let config = AppConfig::from_json(r#"{"api_key": "abc", "dark_mode": false, "font_size": 18}"#)
            .unwrap();
        assert_eq!(config.api_key, "abc");
        assert!(!config.dark_mode);
        assert_eq!(config.font_size, 18);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AppConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig {
            api_key: "from-file".to_string(),
            ..AppConfig::default()
        };
        config.apply_env_overrides(Some(" ".to_string()), Some("token".to_string()));
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.access_token, "token");

        config.apply_env_overrides(Some("from-env".to_string()), None);
        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.access_token, "token");
    }

    #[test]
    fn test_serialized_config_round_trips_defaults() {
        let json = serde_json::to_string(&AppConfig::default()).unwrap();
        let back = AppConfig::from_json(&json).unwrap();
        assert_eq!(back.image_base_url, AppConfig::default().image_base_url);
    }
}
