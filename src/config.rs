use std::{fs, path::Path, path::PathBuf};

use alloy::primitives::{Address, address};
use anyhow::Context;
use dotenv::dotenv;
use envsubst::substitute;
use serde::{Deserialize, Serialize};

/// Tea Sepolia chain id (`0x27EA`).
pub const TEA_SEPOLIA_CHAIN_ID: u64 = 10218;

/// ZNCT token deployed on Tea Sepolia
pub const ZNCT_ADDRESS: Address = address!("0x27cF9bc61B29f893571b5cC1c2ae5162feB8C158");

/// SimplePair (ZNCT/TEA) deployed on Tea Sepolia
pub const PAIR_ADDRESS: Address = address!("0x454CD7D3e07777abF13499100DFcc43b049f2afe");

/// TeaNFT deployed on Tea Sepolia
pub const NFT_ADDRESS: Address = address!("0x6661E0C72d7Aaed6016c4F70016c51AD8995bb08");

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub wallet: WalletConfig,
    #[serde(default)]
    pub network: NetworkDescriptor,
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

impl Config {
    pub async fn from_yaml(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        dotenv().ok();

        let path = path.as_ref();
        let file_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file from path: {}", path.display()))?;

        let env_vars: std::collections::HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| {
                key.starts_with("SERVER_") || key.starts_with("WALLET_") || key.starts_with("DAPP_")
            })
            .collect();

        let interpolated = substitute(&file_content, &env_vars)
            .context("failed to substitute environment variables in YAML")?;

        let config: Config =
            serde_yaml::from_str(&interpolated).context("failed to parse YAML configuration")?;

        Ok(config)
    }

    pub fn server_uri(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet provider. Empty means no wallet is installed.
    #[serde(default)]
    pub endpoint: String,
}

impl WalletConfig {
    /// The configured endpoint, ignoring blanks and unsubstituted `${VAR}` placeholders.
    pub fn endpoint(&self) -> Option<&str> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() || endpoint.starts_with("${") {
            return None;
        }
        Some(endpoint)
    }
}

/// The one network the dapp requires the wallet to be on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDescriptor {
    pub fn tea_sepolia() -> Self {
        Self {
            chain_id: TEA_SEPOLIA_CHAIN_ID,
            chain_name: "Tea Sepolia".to_string(),
            rpc_urls: vec!["https://tea-sepolia.g.alchemy.com/public".to_string()],
            native_currency: NativeCurrency {
                name: "TEA".to_string(),
                symbol: "TEA".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec!["https://sepolia.tea.xyz".to_string()],
        }
    }

    /// Chain id in the `0x`-prefixed hex form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self::tea_sepolia()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
    pub znct: Address,
    pub pair: Address,
    pub nft: Address,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            znct: ZNCT_ADDRESS,
            pair: PAIR_ADDRESS,
            nft: NFT_ADDRESS,
        }
    }
}

/// Creation bytecode used by the deploy action, stored as hex text files.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    pub erc20: PathBuf,
    pub erc721: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            erc20: PathBuf::from("artifacts/tea_token.bin"),
            erc721: PathBuf::from("artifacts/basic_nft.bin"),
        }
    }
}
