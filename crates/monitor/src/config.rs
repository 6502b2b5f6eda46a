//! Configuration for the lag monitor.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`LagMonitor`](crate::LagMonitor).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Time between reconciliation ticks.
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_config_serialization() {
        let config = MonitorConfig {
            poll_interval: Duration::from_secs(10),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.poll_interval, config.poll_interval);
    }
}
