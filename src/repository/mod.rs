pub mod alloy;
pub mod contract;
pub mod error;

use ::alloy::primitives::{Address, B256, Bytes, U256};
use ::alloy::sol_types::SolCall;
pub use alloy::AlloyWalletProvider;
use async_trait::async_trait;
pub use error::{RepositoryError, UNRECOGNIZED_CHAIN, USER_REJECTED_REQUEST};

use crate::config::NetworkDescriptor;

pub(crate) type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// A single contract call (or contract creation) ready to be submitted.
///
/// Built fresh for every call from a typed `sol!` call, so the calldata always
/// matches the interface it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractBinding {
    /// Target contract. `None` creates a new contract from `calldata`.
    pub address: Option<Address>,
    /// Solidity signature of the method, e.g. `transfer(address,uint256)`.
    pub method: &'static str,
    pub calldata: Bytes,
    /// Native currency attached to the call, in wei.
    pub value: Option<U256>,
}

impl ContractBinding {
    pub fn call<C: SolCall>(address: Address, call: &C) -> Self {
        Self {
            address: Some(address),
            method: C::SIGNATURE,
            calldata: call.abi_encode().into(),
            value: None,
        }
    }

    pub fn deploy(bytecode: Bytes) -> Self {
        Self {
            address: None,
            method: "constructor()",
            calldata: bytecode,
            value: None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Method name without its parameter list.
    pub fn method_name(&self) -> &'static str {
        self.method.split('(').next().unwrap_or(self.method)
    }

    pub fn is_deployment(&self) -> bool {
        self.address.is_none()
    }
}

/// A transaction that has been included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    /// Address assigned by a contract-creation transaction.
    pub contract_address: Option<Address>,
}

/// Request/response adapter over a wallet provider.
///
/// Mirrors the EIP-1193 methods the dapp relies on. The wallet owns the keys:
/// transactions are sent unsigned and the wallet signs them (prompting the
/// user if it wants to).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`. May prompt the user; rejection is error code 4001.
    async fn request_accounts(&self) -> RepoResult<Vec<Address>>;

    /// `wallet_switchEthereumChain`. An unknown chain is error code 4902.
    async fn switch_chain(&self, chain_id: u64) -> RepoResult<()>;

    /// `wallet_addEthereumChain`. Wallets switch to the added chain as part of the call.
    async fn add_chain(&self, network: &NetworkDescriptor) -> RepoResult<()>;

    /// Submits the binding from `from` and waits until the transaction is mined.
    ///
    /// A mined transaction whose receipt reports failure is returned as
    /// [`RepositoryError::Reverted`].
    async fn send_transaction(&self, from: Address, binding: &ContractBinding)
    -> RepoResult<TxOutcome>;

    /// Read-only `eth_call` of the binding, returning the raw return data.
    async fn call(&self, from: Address, binding: &ContractBinding) -> RepoResult<Bytes>;
}
