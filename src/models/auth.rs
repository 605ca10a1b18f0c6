//! Auth-mode flag data model
//!
//! A single JSON file under the user's home directory records which of the
//! two authentication strategies is active. Overwritten wholesale on every
//! switch; no history is kept and concurrent writers are last-write-wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two mutually exclusive authentication strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Direct API key via ANTHROPIC_API_KEY
    Api,
    /// Claude subscription login, no API key
    Subscription,
    /// Never recorded, or the record was unreadable
    Unknown,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Api => write!(f, "api"),
            AuthMode::Subscription => write!(f, "subscription"),
            AuthMode::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(AuthMode::Api),
            "subscription" => Ok(AuthMode::Subscription),
            other => Err(format!(
                "invalid auth mode '{}' (expected 'api' or 'subscription')",
                other
            )),
        }
    }
}

/// The persisted auth-mode record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthModeRecord {
    pub mode: AuthMode,
    pub timestamp: DateTime<Utc>,
}

impl AuthModeRecord {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            timestamp: Utc::now(),
        }
    }
}

impl Default for AuthModeRecord {
    fn default() -> Self {
        Self::new(AuthMode::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("api".parse::<AuthMode>().unwrap(), AuthMode::Api);
        assert_eq!(
            "Subscription".parse::<AuthMode>().unwrap(),
            AuthMode::Subscription
        );
        assert!("oauth".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_unknown_is_not_a_switch_target() {
        assert!("unknown".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let record = AuthModeRecord::new(AuthMode::Subscription);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"subscription\""));

        let back: AuthModeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, AuthMode::Subscription);
    }
}
