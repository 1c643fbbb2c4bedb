use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub log_level: String,
    /// Balance auto-refresh interval in milliseconds; `None` disables the
    /// periodic refresh.
    #[serde(default = "default_auto_refresh_interval_ms")]
    pub auto_refresh_interval_ms: Option<u64>,
}

fn default_auto_refresh_interval_ms() -> Option<u64> {
    Some(30_000)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            auto_refresh_interval_ms: default_auto_refresh_interval_ms(),
        }
    }
}

impl ClientConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_thirty_seconds() {
        let config = ClientConfig::default();
        assert_eq!(config.auto_refresh_interval_ms, Some(30_000));
    }

    #[test]
    fn interval_can_be_disabled_in_yaml() {
        let config: ClientConfig =
            serde_yaml::from_str("log_level: debug\nauto_refresh_interval_ms: null\n").unwrap();
        assert_eq!(config.auto_refresh_interval_ms, None);
        assert_eq!(config.log_level, "debug");
    }
}
