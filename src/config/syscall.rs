// System-call economics - How system calls are priced
use super::ConfigError;
use crate::types::Balance;
use serde::{Deserialize, Serialize};

/// Pricing model for system calls
///
/// System calls sit outside the fee market, so the only recognised model is
/// `Zero`. A metered model would be a new variant, not an edit to the
/// executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GasPricing {
    /// Gas price fixed at 0 regardless of any ambient fee configuration
    #[default]
    Zero,
}

impl GasPricing {
    /// Gas price bound into the transaction context
    pub fn gas_price(&self) -> Balance {
        match self {
            GasPricing::Zero => 0,
        }
    }
}

/// System-call executor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemCallConfig {
    #[serde(default)]
    pub gas_pricing: GasPricing,
}

impl SystemCallConfig {
    pub fn gas_price(&self) -> Balance {
        self.gas_pricing.gas_price()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_price() {
        let config = SystemCallConfig::default();
        assert_eq!(config.gas_pricing, GasPricing::Zero);
        assert_eq!(config.gas_price(), 0);
    }

    #[test]
    fn test_parse_zero() {
        let config = SystemCallConfig::from_json(r#"{"gas_pricing": "zero"}"#).unwrap();
        assert_eq!(config.gas_price(), 0);

        let empty = SystemCallConfig::from_json("{}").unwrap();
        assert_eq!(empty, SystemCallConfig::default());
    }

    #[test]
    fn test_unknown_pricing_rejected() {
        assert!(matches!(
            SystemCallConfig::from_json(r#"{"gas_pricing": "market"}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
