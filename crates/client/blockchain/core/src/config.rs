//! Chain configuration.

use std::env;

use crate::types::ContractAddress;

/// Chain-specific configuration.
///
/// This is a trait to allow different transports to provide their own config types.
pub trait BlockchainConfig: Send + Sync {
    /// Human-readable network name (e.g., "goerli", "mainnet")
    fn network_name(&self) -> &str;

    /// RPC endpoint URL
    fn rpc_url(&self) -> &str;

    /// Validate configuration (e.g., check addresses, URL format)
    fn validate(&self) -> Result<(), String>;
}

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Goerli,
    /// In-process simulated chain
    Devnet,
}

impl Network {
    pub fn default_rpc_url(&self) -> &str {
        match self {
            Network::Mainnet => "https://alpha-mainnet.starknet.io",
            Network::Goerli => "https://alpha4.starknet.io",
            Network::Devnet => "http://127.0.0.1:5050",
        }
    }
}

/// Network plus the addresses of the contracts the client calls.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub network: Network,

    /// Custom RPC endpoint URL (overrides network default)
    pub rpc_url: Option<String>,

    pub game_contract: ContractAddress,
    pub lords_contract: ContractAddress,
}

impl ChainConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            rpc_url: None,
            game_contract: ContractAddress::new("0x0"),
            lords_contract: ContractAddress::new("0x0"),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `NETWORK` - Network name (mainnet, goerli, devnet) (default: devnet)
    /// - `RPC_URL` - Custom RPC endpoint URL
    /// - `GAME_CONTRACT_ADDRESS` - Deployed game contract address
    /// - `LORDS_CONTRACT_ADDRESS` - Deployed LORDS token address
    pub fn from_env() -> Result<Self, String> {
        let network = match env::var("NETWORK")
            .unwrap_or_else(|_| "devnet".to_string())
            .to_lowercase()
            .as_str()
        {
            "mainnet" => Network::Mainnet,
            "goerli" => Network::Goerli,
            "devnet" => Network::Devnet,
            other => {
                return Err(format!(
                    "Invalid NETWORK: {}. Must be mainnet, goerli, or devnet",
                    other
                ));
            }
        };

        let mut config = Self::new(network);
        config.rpc_url = env::var("RPC_URL").ok();
        if let Ok(address) = env::var("GAME_CONTRACT_ADDRESS") {
            config.game_contract = ContractAddress::new(address);
        }
        if let Ok(address) = env::var("LORDS_CONTRACT_ADDRESS") {
            config.lords_contract = ContractAddress::new(address);
        }
        Ok(config)
    }

    /// Set custom RPC URL.
    pub fn with_rpc_url(mut self, url: String) -> Self {
        self.rpc_url = Some(url);
        self
    }

    pub fn with_contracts(mut self, game: ContractAddress, lords: ContractAddress) -> Self {
        self.game_contract = game;
        self.lords_contract = lords;
        self
    }

    /// Get the RPC URL (custom or default for network).
    pub fn get_rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }
}

impl BlockchainConfig for ChainConfig {
    fn network_name(&self) -> &str {
        match self.network {
            Network::Mainnet => "mainnet",
            Network::Goerli => "goerli",
            Network::Devnet => "devnet",
        }
    }

    fn rpc_url(&self) -> &str {
        self.get_rpc_url()
    }

    fn validate(&self) -> Result<(), String> {
        let url = self.get_rpc_url();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("Invalid RPC URL format: {}", url));
        }

        for (name, address) in [
            ("game", &self.game_contract),
            ("lords", &self.lords_contract),
        ] {
            let hex = address.as_str().trim_start_matches("0x");
            if !address.as_str().starts_with("0x")
                || hex.is_empty()
                || !hex.chars().all(|c| c.is_ascii_hexdigit())
            {
                return Err(format!("Invalid {} contract address: {}", name, address));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_url_and_addresses() {
        let config = ChainConfig::new(Network::Devnet).with_contracts(
            ContractAddress::new("0x05a1"),
            ContractAddress::new("0x0b2"),
        );
        assert!(config.validate().is_ok());
        assert_eq!(config.rpc_url(), "http://127.0.0.1:5050");

        let bad_url = config.clone().with_rpc_url("ftp://node".into());
        assert!(bad_url.validate().is_err());

        let bad_address = config.with_contracts(
            ContractAddress::new("game"),
            ContractAddress::new("0x0b2"),
        );
        assert!(bad_address.validate().is_err());
    }
}
