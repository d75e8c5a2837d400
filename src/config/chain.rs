// Chain configuration - Fork activation rules
use super::ConfigError;
use crate::types::BlockNumber;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Proof-of-authority engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParliaConfig {
    /// Seconds between blocks
    pub period: u64,

    /// Blocks per validator-set epoch
    pub epoch: u64,
}

/// Chain configuration
///
/// Determines which protocol semantics (opcode set, gas schedule,
/// precompiles) apply at a given height. `None` means the fork never
/// activates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain id (replay protection)
    pub chain_id: u64,

    #[serde(default)]
    pub homestead_block: Option<BlockNumber>,
    #[serde(default)]
    pub eip150_block: Option<BlockNumber>,
    #[serde(default)]
    pub eip155_block: Option<BlockNumber>,
    #[serde(default)]
    pub eip158_block: Option<BlockNumber>,
    #[serde(default)]
    pub byzantium_block: Option<BlockNumber>,
    #[serde(default)]
    pub constantinople_block: Option<BlockNumber>,
    #[serde(default)]
    pub petersburg_block: Option<BlockNumber>,
    #[serde(default)]
    pub istanbul_block: Option<BlockNumber>,
    #[serde(default)]
    pub berlin_block: Option<BlockNumber>,
    #[serde(default)]
    pub london_block: Option<BlockNumber>,

    /// PoA engine parameters (absent for non-PoA chains)
    #[serde(default)]
    pub parlia: Option<ParliaConfig>,
}

/// Fork flags active at one block height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rules {
    pub chain_id: u64,
    pub is_homestead: bool,
    pub is_eip150: bool,
    pub is_eip155: bool,
    pub is_eip158: bool,
    pub is_byzantium: bool,
    pub is_constantinople: bool,
    pub is_petersburg: bool,
    pub is_istanbul: bool,
    pub is_berlin: bool,
    pub is_london: bool,
}

impl ChainConfig {
    /// Development chain: every fork active from genesis, 3s PoA blocks
    pub fn dev() -> Self {
        Self {
            chain_id: 1337,
            homestead_block: Some(0),
            eip150_block: Some(0),
            eip155_block: Some(0),
            eip158_block: Some(0),
            byzantium_block: Some(0),
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            istanbul_block: Some(0),
            berlin_block: Some(0),
            london_block: Some(0),
            parlia: Some(ParliaConfig {
                period: 3,
                epoch: 200,
            }),
        }
    }

    /// Is a fork scheduled at `fork_block` active at `number`?
    pub fn is_active(fork_block: Option<BlockNumber>, number: BlockNumber) -> bool {
        matches!(fork_block, Some(block) if block <= number)
    }

    pub fn is_london(&self, number: BlockNumber) -> bool {
        Self::is_active(self.london_block, number)
    }

    /// Rules in effect at `number`
    pub fn rules(&self, number: BlockNumber) -> Rules {
        Rules {
            chain_id: self.chain_id,
            is_homestead: Self::is_active(self.homestead_block, number),
            is_eip150: Self::is_active(self.eip150_block, number),
            is_eip155: Self::is_active(self.eip155_block, number),
            is_eip158: Self::is_active(self.eip158_block, number),
            is_byzantium: Self::is_active(self.byzantium_block, number),
            is_constantinople: Self::is_active(self.constantinople_block, number),
            is_petersburg: Self::is_active(self.petersburg_block, number),
            is_istanbul: Self::is_active(self.istanbul_block, number),
            is_berlin: Self::is_active(self.berlin_block, number),
            is_london: self.is_london(number),
        }
    }

    fn forks(&self) -> [(&'static str, Option<BlockNumber>); 10] {
        [
            ("homestead", self.homestead_block),
            ("eip150", self.eip150_block),
            ("eip155", self.eip155_block),
            ("eip158", self.eip158_block),
            ("byzantium", self.byzantium_block),
            ("constantinople", self.constantinople_block),
            ("petersburg", self.petersburg_block),
            ("istanbul", self.istanbul_block),
            ("berlin", self.berlin_block),
            ("london", self.london_block),
        ]
    }

    /// Forks must activate in declaration order
    pub fn check_fork_order(&self) -> Result<(), ConfigError> {
        let forks = self.forks();
        for pair in forks.windows(2) {
            let (fork, fork_block) = pair[0];
            let (next, next_block) = pair[1];
            match (fork_block, next_block) {
                (None, Some(next_block)) => {
                    return Err(ConfigError::MissingFork {
                        fork,
                        next,
                        next_block,
                    });
                }
                (Some(fork_block), Some(next_block)) if fork_block > next_block => {
                    return Err(ConfigError::ForkOrder {
                        fork,
                        fork_block,
                        next,
                        next_block,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Full validation run on load
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_fork_order()?;
        if let Some(parlia) = &self.parlia {
            if parlia.epoch == 0 {
                return Err(ConfigError::InvalidParlia("epoch must be non-zero".to_string()));
            }
        }
        Ok(())
    }

    /// Parse and validate from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ChainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::dev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged() -> ChainConfig {
        ChainConfig {
            chain_id: 56,
            homestead_block: Some(0),
            eip150_block: Some(0),
            eip155_block: Some(0),
            eip158_block: Some(0),
            byzantium_block: Some(0),
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            istanbul_block: Some(0),
            berlin_block: Some(100),
            london_block: Some(200),
            parlia: Some(ParliaConfig { period: 3, epoch: 200 }),
        }
    }

    #[test]
    fn test_rules_follow_schedule() {
        let config = staged();

        let early = config.rules(99);
        assert!(early.is_istanbul);
        assert!(!early.is_berlin);
        assert!(!early.is_london);
        assert_eq!(early.chain_id, 56);

        let mid = config.rules(100);
        assert!(mid.is_berlin);
        assert!(!mid.is_london);

        assert!(config.rules(200).is_london);
    }

    #[test]
    fn test_disabled_fork_never_active() {
        let mut config = staged();
        config.london_block = None;
        assert!(!config.rules(u64::MAX).is_london);
        assert!(config.check_fork_order().is_ok());
    }

    #[test]
    fn test_fork_order_rejects_gap() {
        let mut config = staged();
        config.berlin_block = None;

        match config.check_fork_order() {
            Err(ConfigError::MissingFork { fork, next, next_block }) => {
                assert_eq!(fork, "berlin");
                assert_eq!(next, "london");
                assert_eq!(next_block, 200);
            }
            other => panic!("expected MissingFork, got {:?}", other),
        }
    }

    #[test]
    fn test_fork_order_rejects_inversion() {
        let mut config = staged();
        config.berlin_block = Some(300);

        assert!(matches!(
            config.check_fork_order(),
            Err(ConfigError::ForkOrder { fork: "berlin", fork_block: 300, next: "london", next_block: 200 })
        ));
    }

    #[test]
    fn test_from_json_defaults_missing_forks() {
        let config = ChainConfig::from_json(r#"{"chain_id": 97, "homestead_block": 0}"#).unwrap();
        assert_eq!(config.chain_id, 97);
        assert_eq!(config.eip150_block, None);
        assert!(config.parlia.is_none());
        assert!(config.rules(1).is_homestead);
    }

    #[test]
    fn test_from_json_rejects_zero_epoch() {
        let json = r#"{"chain_id": 97, "parlia": {"period": 3, "epoch": 0}}"#;
        assert!(matches!(
            ChainConfig::from_json(json),
            Err(ConfigError::InvalidParlia(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");

        let config = staged();
        config.to_file(&path).unwrap();

        let loaded = ChainConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ChainConfig::from_file(dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
