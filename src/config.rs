use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::api::DEFAULT_GAS;
use crate::format::parse_amount;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub contract: ContractSettings,
    pub wallet: WalletSettings,
    #[serde(default)]
    pub network: NetworkOverride,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: String,
    /// Deployment environment, see [`NetworkConfig::for_env`]
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Deserialize)]
pub struct ContractSettings {
    pub name: String,
    /// Attached to `create_jackpot`, human units ("10")
    #[serde(default = "default_jackpot_deposit")]
    pub create_jackpot_deposit: String,
    #[serde(default = "default_gas")]
    pub gas: u64,
}

#[derive(Debug, Deserialize)]
pub struct WalletSettings {
    pub relay_url: String,
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkOverride {
    pub node_url: Option<String>,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_jackpot_deposit() -> String {
    "10".to_string()
}

fn default_gas() -> u64 {
    DEFAULT_GAS
}

fn default_session_file() -> PathBuf {
    PathBuf::from("lotto_wallet_auth_key.json")
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        // Fail at startup rather than on the first create_jackpot
        parse_amount(&config.contract.create_jackpot_deposit)?;
        Ok(config)
    }

    /// Jackpot seed amount in yocto.
    pub fn create_jackpot_deposit(&self) -> u128 {
        parse_amount(&self.contract.create_jackpot_deposit).unwrap_or(0)
    }

    /// Resolve the network, honoring `[network] node_url` and `env_override`.
    pub fn network(&self, env_override: Option<&str>) -> Result<NetworkConfig, ConfigError> {
        let env = env_override.unwrap_or(&self.general.environment);
        let mut network = NetworkConfig::for_env(env, &self.contract.name)?;
        if let Some(url) = &self.network.node_url {
            network.node_url = url.clone();
        }
        Ok(network)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment {0:?}")]
    UnknownEnvironment(String),
}

/// Connection settings for one deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network_id: String,
    pub node_url: String,
    pub wallet_url: String,
    pub helper_url: String,
    pub explorer_url: String,
    pub contract_name: String,
}

impl NetworkConfig {
    pub fn for_env(env: &str, contract_name: &str) -> Result<Self, ConfigError> {
        let (network_id, node_url, wallet_url, helper_url, explorer_url) = match env {
            "production" | "mainnet" => (
                "mainnet",
                "https://rpc.mainnet.near.org",
                "https://wallet.near.org",
                "https://helper.mainnet.near.org",
                "https://explorer.mainnet.near.org",
            ),
            "development" | "testnet" => (
                "testnet",
                "https://rpc.testnet.near.org",
                "https://wallet.testnet.near.org",
                "https://helper.testnet.near.org",
                "https://explorer.testnet.near.org",
            ),
            "betanet" => (
                "betanet",
                "https://rpc.betanet.near.org",
                "https://wallet.betanet.near.org",
                "https://helper.betanet.near.org",
                "https://explorer.betanet.near.org",
            ),
            "local" => (
                "local",
                "http://localhost:3030",
                "http://localhost:4000/wallet",
                "http://localhost:3000",
                "http://localhost:9001",
            ),
            other => return Err(ConfigError::UnknownEnvironment(other.to_string())),
        };

        Ok(Self {
            network_id: network_id.to_string(),
            node_url: node_url.to_string(),
            wallet_url: wallet_url.to_string(),
            helper_url: helper_url.to_string(),
            explorer_url: explorer_url.to_string(),
            contract_name: contract_name.to_string(),
        })
    }
}
