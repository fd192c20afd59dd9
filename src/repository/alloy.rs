use std::sync::Arc;

use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::{Address, Bytes, TxKind};
use alloy::providers::{PendingTransactionError, Provider, RootProvider};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol_types::decode_revert_reason;
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::error::RepositoryError;
use crate::config::{NativeCurrency, NetworkDescriptor};
use crate::repository::{ContractBinding, RepoResult, TxOutcome, WalletProvider};

const REVERT_MESSAGE_PREFIX: &str = "execution reverted: ";

/// `wallet_addEthereumChain` parameter object (EIP-3085).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddEthereumChainParameter<'a> {
    chain_id: String,
    chain_name: &'a str,
    rpc_urls: &'a [String],
    native_currency: &'a NativeCurrency,
    block_explorer_urls: &'a [String],
}

impl<'a> From<&'a NetworkDescriptor> for AddEthereumChainParameter<'a> {
    fn from(network: &'a NetworkDescriptor) -> Self {
        Self {
            chain_id: network.chain_id_hex(),
            chain_name: &network.chain_name,
            rpc_urls: &network.rpc_urls,
            native_currency: &network.native_currency,
            block_explorer_urls: &network.block_explorer_urls,
        }
    }
}

/// Wallet provider reached over JSON-RPC through an alloy provider.
///
/// No signer is attached: `eth_sendTransaction` goes to the wallet, which
/// fills, signs and broadcasts the transaction.
pub struct AlloyWalletProvider<P> {
    provider: Arc<P>,
}

impl AlloyWalletProvider<RootProvider<Ethereum>> {
    /// Wraps the wallet's HTTP JSON-RPC endpoint.
    pub fn connect_http(endpoint: &str) -> RepoResult<Self> {
        let url: reqwest::Url = endpoint
            .parse()
            .map_err(|e| RepositoryError::Other(format!("Invalid wallet endpoint {endpoint}: {e}")))?;

        Ok(Self::new(Arc::new(RootProvider::new_http(url))))
    }
}

impl<P: Provider + Clone + 'static> AlloyWalletProvider<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

fn transaction_request(from: Address, binding: &ContractBinding) -> TransactionRequest {
    let to = match binding.address {
        Some(address) => TxKind::Call(address),
        None => TxKind::Create,
    };

    TransactionRequest {
        from: Some(from),
        to: Some(to),
        value: binding.value,
        input: TransactionInput::new(binding.calldata.clone()),
        ..Default::default()
    }
}

/// Maps a transport error, decoding a revert reason when the error carries one.
fn map_rpc_error(err: TransportError) -> RepositoryError {
    match err {
        RpcError::ErrorResp(payload) => {
            let revert_reason = payload
                .as_revert_data()
                .and_then(|data| decode_revert_reason(&data))
                .or_else(|| {
                    payload
                        .message
                        .strip_prefix(REVERT_MESSAGE_PREFIX)
                        .map(str::to_string)
                });

            RepositoryError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
                revert_reason,
            }
        }
        other => RepositoryError::Transport(other.to_string()),
    }
}

fn map_pending_error(err: PendingTransactionError) -> RepositoryError {
    match err {
        PendingTransactionError::TransportError(e) => map_rpc_error(e),
        other => RepositoryError::Transport(other.to_string()),
    }
}

#[async_trait]
impl<P: Provider + Clone + Send + Sync + 'static> WalletProvider for AlloyWalletProvider<P> {
    #[instrument(skip(self), err)]
    async fn request_accounts(&self) -> RepoResult<Vec<Address>> {
        self.provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), json!([]))
            .await
            .map_err(map_rpc_error)
    }

    #[instrument(skip(self), err)]
    async fn switch_chain(&self, chain_id: u64) -> RepoResult<()> {
        let params = json!([{ "chainId": format!("{chain_id:#x}") }]);

        self.provider
            .raw_request::<_, Value>("wallet_switchEthereumChain".into(), params)
            .await
            .map_err(map_rpc_error)?;

        Ok(())
    }

    #[instrument(skip(self, network), fields(chain_id = network.chain_id), err)]
    async fn add_chain(&self, network: &NetworkDescriptor) -> RepoResult<()> {
        let params = json!([AddEthereumChainParameter::from(network)]);

        self.provider
            .raw_request::<_, Value>("wallet_addEthereumChain".into(), params)
            .await
            .map_err(map_rpc_error)?;

        Ok(())
    }

    #[instrument(skip(self, binding), fields(method = binding.method), err)]
    async fn send_transaction(
        &self,
        from: Address,
        binding: &ContractBinding,
    ) -> RepoResult<TxOutcome> {
        let tx = transaction_request(from, binding);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(map_rpc_error)?;

        let tx_hash = *pending.tx_hash();
        tracing::info!("Submitted {} in {tx_hash}, waiting for confirmation", binding.method);

        let receipt = pending.get_receipt().await.map_err(map_pending_error)?;

        if !receipt.status() {
            return Err(RepositoryError::Reverted {
                tx_hash,
                revert_reason: None,
            });
        }

        Ok(TxOutcome {
            tx_hash,
            block_number: receipt.block_number(),
            contract_address: receipt.contract_address(),
        })
    }

    #[instrument(skip(self, binding), fields(method = binding.method), err)]
    async fn call(&self, from: Address, binding: &ContractBinding) -> RepoResult<Bytes> {
        let tx = transaction_request(from, binding);

        self.provider.call(tx).await.map_err(map_rpc_error)
    }
}
