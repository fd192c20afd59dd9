use std::str::FromStr;

use alloy::primitives::Address;
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize, Serializer};

use crate::service::ServiceError;
use crate::service::notify::Operation;

// Response types that include error handling
#[derive(Debug, JsonSchema, Serialize)]
#[serde(untagged)]
pub enum ActionResult {
    Success(ActionResponse),
    Error { error: ServiceError, message: String },
}

#[derive(Debug, JsonSchema, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Success(QueryResponse),
    Error { error: ServiceError },
}

#[derive(Debug, JsonSchema, Serialize)]
pub struct ActionResponse {
    pub operation: Operation,
    /// Message shown to the user, e.g. "Transfer successful"
    pub message: String,
    /// Hashes of the confirmed transactions, in submission order
    pub tx_hashes: Vec<String>,
    /// Address of a newly deployed contract, EIP-55 checksummed
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_checksummed"
    )]
    #[schemars(with = "Option<String>")]
    pub contract_address: Option<Address>,
}

fn serialize_checksummed<S: Serializer>(
    address: &Option<Address>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match address {
        Some(address) => serializer.serialize_some(&address.to_checksum(None)),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, JsonSchema, Serialize)]
pub struct QueryResponse {
    /// Raw value as returned by the contract
    pub value: String,
    /// Human-readable value (amounts formatted with 18 decimals)
    pub formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// TEA per ZNCT implied by a swap quote
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
}

#[derive(Debug, JsonSchema, Serialize)]
pub struct WalletStatusResponse {
    pub connected: bool,
    /// "Connected: 0x1234...abcd" or "Not connected"
    pub indicator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Recipient address (0x-prefixed, checksummed or single-case)
    pub recipient: String,
    /// ZNCT amount in human-readable format (e.g. "1.5")
    pub amount: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct SwapRequest {
    /// ZNCT amount to sell for TEA (e.g. "10")
    pub amount: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct MintNftRequest {
    /// Metadata URI of the new token (e.g. "ipfs://...")
    pub token_uri: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct DeployContractRequest {
    /// "erc20" for the TeaToken template, anything else for the BasicNFT template
    pub contract_type: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct LiquidityRequest {
    /// ZNCT amount (e.g. "100")
    pub znct_amount: String,
    /// TEA amount (e.g. "0.5")
    pub tea_amount: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct BalanceRequest {
    /// Holder to query. Defaults to the connected account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct TokenUriRequest {
    /// NFT token id in decimal
    pub token_id: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct QuoteSwapRequest {
    /// ZNCT amount to price (e.g. "10")
    pub amount: String,
}

/// Which bundled template the deploy action creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractType {
    Erc20,
    Erc721,
}

impl FromStr for ContractType {
    type Err = std::convert::Infallible;

    /// Anything other than "erc20" selects the NFT template.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("erc20") {
            Ok(ContractType::Erc20)
        } else {
            Ok(ContractType::Erc721)
        }
    }
}
