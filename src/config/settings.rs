use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::options::{self, RetryOption};
use super::{DEFAULT_ATTEMPTS, DEFAULT_DELAY};
use crate::delay;

/// Which built-in delay strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Constant,
    #[default]
    Exponential,
    CappedExponential,
}

/// Plain-data form of the numeric retry options, suitable for config files.
///
/// ```
/// use retries::RetrySettings;
///
/// let settings: RetrySettings =
///     serde_json::from_str(r#"{ "attempts": 5, "strategy": "constant" }"#).unwrap();
/// assert_eq!(settings.attempts, 5);
/// assert_eq!(settings.delay_ms, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub attempts: i64,
    pub delay_ms: u64,
    pub max_delay_ms: u64,
    pub strategy: StrategyKind,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            max_delay_ms: 0,
            strategy: StrategyKind::default(),
        }
    }
}

impl RetrySettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_options(self) -> Vec<RetryOption> {
        let strategy = match self.strategy {
            StrategyKind::Constant => options::delay_strategy(delay::constant_delay),
            StrategyKind::Exponential => options::delay_strategy(delay::exponential_delay),
            StrategyKind::CappedExponential => {
                options::delay_strategy(delay::capped_exponential_delay)
            }
        };
        vec![
            options::attempts(self.attempts),
            options::delay(Duration::from_millis(self.delay_ms)),
            options::max_delay(Duration::from_millis(self.max_delay_ms)),
            strategy,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::task::BoxError;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings = RetrySettings::from_json("{}").unwrap();
        assert_eq!(settings, RetrySettings::default());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result = RetrySettings::from_json(r#"{ "strategy": "fibonacci" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_become_options() {
        let settings = RetrySettings::from_json(
            r#"{ "attempts": 0, "delay_ms": 50, "max_delay_ms": 120, "strategy": "capped_exponential" }"#,
        )
        .unwrap();
        let config = Config::from_options(settings.into_options());

        assert_eq!(config.attempts(), 0);
        assert_eq!(config.delay(), Duration::from_millis(50));
        assert_eq!(config.max_delay(), Duration::from_millis(120));

        let err: BoxError = "boom".into();
        assert_eq!(config.next_delay(1, &err), Duration::from_millis(100));
        assert_eq!(config.next_delay(2, &err), Duration::from_millis(120));
    }

    #[test]
    fn test_settings_serialize_snake_case() {
        let settings = RetrySettings {
            strategy: StrategyKind::CappedExponential,
            ..RetrySettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""strategy":"capped_exponential""#));
    }
}
