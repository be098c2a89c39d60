//! Serializable logger configuration
//!
//! Every field has a default, so a partial document deserializes cleanly:
//!
//! ```
//! use fieldlog::LogConfig;
//!
//! let config: LogConfig = serde_json::from_str(r#"{"access_level": "debug"}"#).unwrap();
//! assert_eq!(config.access_level, "debug");
//! assert_eq!(config.error_log, "stderr");
//! assert!(!config.agent.enabled);
//! ```

use super::{
    fields::{FieldValue, Fields},
    overflow_policy::OverflowPolicy,
};
use crate::appenders::DEFAULT_CHANNEL_SIZE;
use serde::{Deserialize, Serialize};

/// Output selectors and thresholds for both sinks.
///
/// `access_log` and `error_log` accept `stdout`, `stderr` or a file path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub access_log: String,
    pub access_level: String,
    pub error_log: String,
    pub error_level: String,
    pub agent: AgentConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            access_log: "stdout".to_string(),
            access_level: "info".to_string(),
            error_log: "stderr".to_string(),
            error_level: "error".to_string(),
            agent: AgentConfig::default(),
        }
    }
}

/// Remote shipping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub enabled: bool,
    /// `<scheme>://<address>`, e.g. `tcp://127.0.0.1:5000`
    pub dsn: String,
    pub app_id: String,
    pub host: String,
    pub instance_id: String,
    /// Top-level category tag; omitted from documents when empty.
    pub category: String,
    pub channel_size: usize,
    pub overflow_policy: OverflowPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dsn: String::new(),
            app_id: String::new(),
            host: String::new(),
            instance_id: String::new(),
            category: String::new(),
            channel_size: DEFAULT_CHANNEL_SIZE,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl AgentConfig {
    /// Identity fields stamped on every shipped document.
    pub fn identity_fields(&self) -> Fields {
        let mut fields = Fields::with_capacity(4);
        fields.insert("app_id".to_string(), FieldValue::from(&self.app_id));
        fields.insert("host".to_string(), FieldValue::from(&self.host));
        fields.insert("instance_id".to_string(), FieldValue::from(&self.instance_id));
        if !self.category.is_empty() {
            fields.insert("category".to_string(), FieldValue::from(&self.category));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.access_log, "stdout");
        assert_eq!(config.access_level, "info");
        assert_eq!(config.error_log, "stderr");
        assert_eq!(config.error_level, "error");
        assert!(!config.agent.enabled);
        assert_eq!(config.agent.channel_size, DEFAULT_CHANNEL_SIZE);
        assert_eq!(config.agent.overflow_policy, OverflowPolicy::DropNewest);
    }

    #[test]
    fn test_partial_agent_section() {
        let config: LogConfig = serde_json::from_str(
            r#"{"agent": {"enabled": true, "dsn": "tcp://127.0.0.1:5000", "app_id": "svc"}}"#,
        )
        .unwrap();

        assert!(config.agent.enabled);
        assert_eq!(config.agent.dsn, "tcp://127.0.0.1:5000");
        assert_eq!(config.agent.channel_size, DEFAULT_CHANNEL_SIZE);
        assert_eq!(config.access_log, "stdout");
    }

    #[test]
    fn test_identity_fields_skip_empty_category() {
        let mut agent = AgentConfig {
            app_id: "svc".into(),
            host: "h1".into(),
            instance_id: "i1".into(),
            ..AgentConfig::default()
        };

        let fields = agent.identity_fields();
        assert_eq!(fields.len(), 3);
        assert!(!fields.contains_key("category"));

        agent.category = "billing".into();
        let fields = agent.identity_fields();
        assert_eq!(fields.get("category"), Some(&FieldValue::from("billing")));
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = LogConfig::default();
        config.agent.category = "billing".into();

        let json = serde_json::to_string(&config).unwrap();
        let back: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
