//! Relay configuration.
//!
//! Loaded from JSON by hosts. Only the submitter is required:
//!
//! ```json
//! { "submitter": "0x1111111111111111111111111111111111111111" }
//! ```

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`RelayConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid relay config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Submitter must be a non-zero address")]
    InvalidSubmitter,
}

/// What the store does when a block hash is submitted a second time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Replace the existing record (and reset its paid flag).
    #[default]
    Overwrite,
    /// Refuse the submission and leave the store untouched.
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// The only identity allowed to submit blocks.
    pub submitter: Address,
    /// Identity allowed to settle relayer rewards. Defaults to the submitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Address>,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl RelayConfig {
    pub fn new(submitter: Address) -> Self {
        Self {
            submitter,
            payer: None,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.submitter == Address::ZERO {
            return Err(ConfigError::InvalidSubmitter);
        }
        Ok(())
    }

    /// The identity allowed to pay relayers.
    pub fn payer(&self) -> Address {
        self.payer.unwrap_or(self.submitter)
    }

    pub fn with_payer(mut self, payer: Address) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config =
            RelayConfig::from_json(r#"{"submitter":"0x1111111111111111111111111111111111111111"}"#)
                .unwrap();
        assert_eq!(config.submitter, Address::repeat_byte(0x11));
        assert_eq!(config.payer(), Address::repeat_byte(0x11));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Overwrite);
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "submitter": "0x1111111111111111111111111111111111111111",
            "payer": "0x2222222222222222222222222222222222222222",
            "duplicate_policy": "reject"
        }"#;
        let config = RelayConfig::from_json(json).unwrap();
        assert_eq!(config.payer(), Address::repeat_byte(0x22));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_zero_submitter_rejected() {
        let json = r#"{"submitter":"0x0000000000000000000000000000000000000000"}"#;
        assert!(matches!(
            RelayConfig::from_json(json),
            Err(ConfigError::InvalidSubmitter)
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            RelayConfig::from_json(r#"{"submitter": 12}"#),
            Err(ConfigError::InvalidJson(_))
        ));
        assert!(matches!(
            RelayConfig::from_json("{}"),
            Err(ConfigError::InvalidJson(_))
        ));
    }
}
