/// Update task configuration, supplied before the task starts
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_RECV_TIMEOUT_MS: u32 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateConfig {
    /// Firmware image URL
    pub url: String,
    pub recv_timeout_ms: u32,
    pub keep_alive: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
            keep_alive: true,
        }
    }
}

impl UpdateConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(self.url.clone()));
        }
        if self.recv_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UpdateConfig::default();
        assert_eq!(config.recv_timeout_ms, 5000);
        assert!(config.keep_alive);
        assert_eq!(config.validate(), Err(ConfigError::EmptyUrl));
    }

    #[test]
    fn test_serialization() {
        let config = UpdateConfig::new("https://updates.local/fw.bin");
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: UpdateConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let json = r#"{"url":"http://10.0.0.2:8070/fw.bin"}"#;
        let config: UpdateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, UpdateConfig::new("http://10.0.0.2:8070/fw.bin"));
    }

    #[test]
    fn test_scheme_is_required() {
        let config = UpdateConfig::new("ftp://updates.local/fw.bin");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = UpdateConfig::new("http://10.0.0.2:8070/fw.bin");
        config.recv_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_valid_config() {
        assert!(UpdateConfig::new("http://10.0.0.2:8070/fw.bin")
            .validate()
            .is_ok());
    }
}
