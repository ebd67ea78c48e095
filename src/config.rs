use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::state::BrowserEngine;

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_locale() -> String {
    "auto".to_string()
}

fn default_download_url() -> String {
    "https://guorui-cuhksz.oss-cn-shenzhen.aliyuncs.com/ProductQuery.exe".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the local lookup helper.
    #[serde(default = "default_endpoint")]
    pub service_endpoint: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Engine preselected in the initialize control.
    #[serde(default)]
    pub browser: BrowserEngine,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_download_url")]
    pub download_url: String,
    /// Whether the user has downloaded the helper client before. Only varies
    /// the advisory wording shown while the service is unreachable.
    #[serde(default)]
    pub client_installed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_endpoint: default_endpoint(),
            poll_interval_secs: default_poll_interval(),
            browser: BrowserEngine::default(),
            locale: default_locale(),
            download_url: default_download_url(),
            client_installed: false,
        }
    }
}

pub struct ConfigState {
    pub config: Arc<Mutex<Config>>,
    pub path: std::path::PathBuf,
}

impl ConfigState {
    pub async fn save(&self) -> Result<(), String> {
        let config = self.config.lock().await;
        let content = serde_json::to_string_pretty(&*config).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, content).map_err(|e| e.to_string())?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    /// Persists the "client downloaded before" flag; called once the user
    /// starts a client download.
    pub async fn mark_client_installed(&self) -> Result<(), String> {
        {
            let mut config = self.config.lock().await;
            config.client_installed = true;
        }
        self.save().await
    }
}

pub fn load_config(config_path: &std::path::Path) -> Config {
    if !config_path.exists() {
        info!("No config found, creating default config");
        let default = Config::default();
        if let Ok(json) = serde_json::to_string_pretty(&default) {
            let _ = std::fs::write(config_path, json);
        }
        return default;
    }
    let content = std::fs::read_to_string(config_path).unwrap_or_default();
    match serde_json::from_str::<Config>(&content) {
        Ok(c) => {
            info!("Config loaded from {:?}", config_path);
            c
        }
        Err(e) => {
            warn!("Config parse failed ({}), rewriting defaults", e);
            let default = Config::default();
            if let Ok(json) = serde_json::to_string_pretty(&default) {
                let _ = std::fs::write(config_path, json);
            }
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.browser = BrowserEngine::Edge;
        config.client_installed = true;
        config.poll_interval_secs = 10;

        let json = serde_json::to_string(&config).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.browser, BrowserEngine::Edge);
        assert!(restored.client_installed);
        assert_eq!(restored.poll_interval_secs, 10);
        assert_eq!(restored.service_endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_config_backward_compat() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.service_endpoint, "http://localhost:8080");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.browser, BrowserEngine::Firefox);
        assert_eq!(config.locale, "auto");
        assert!(!config.client_installed);
    }
}
