use crate::{
    compliance::DEFAULT_COMPLIANCE_THRESHOLD,
    error::{BankError, BankResult},
    types::Money,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when a transfer names the same account on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfTransferPolicy {
    /// Run both legs against the account (net zero).
    #[default]
    Allow,
    /// Refuse with `LedgerError::SameAccount`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub bank_name:            String,
    /// Movements strictly above this are logged for the regulator.
    pub compliance_threshold: Money,
    pub currency_symbol:      String,
    pub self_transfer:        SelfTransferPolicy,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            bank_name:            "JS Bank".to_string(),
            compliance_threshold: DEFAULT_COMPLIANCE_THRESHOLD,
            currency_symbol:      "R$".to_string(),
            self_transfer:        SelfTransferPolicy::Allow,
        }
    }
}

impl BankConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> BankResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: BankConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> BankResult<()> {
        if self.bank_name.trim().is_empty() {
            return Err(BankError::Config { reason: "bank_name must not be empty".into() });
        }
        if self.compliance_threshold < Money::ZERO {
            return Err(BankError::Config {
                reason: format!("compliance_threshold {} is negative", self.compliance_threshold),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: BankConfig =
            serde_json::from_str(r#"{ "compliance_threshold": "500", "self_transfer": "reject" }"#)
                .unwrap();
        assert_eq!(config.compliance_threshold, dec!(500));
        assert_eq!(config.self_transfer, SelfTransferPolicy::Reject);
        assert_eq!(config.bank_name, "JS Bank");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let config = BankConfig { compliance_threshold: dec!(-1), ..BankConfig::default() };
        assert!(matches!(config.validate(), Err(BankError::Config { .. })));
    }
}
