use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::{RepositoryError, UNRECOGNIZED_CHAIN, USER_REJECTED_REQUEST};

#[derive(Debug, Clone, PartialEq, Eq, Error, JsonSchema, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ServiceError {
    // Preconditions
    /// No wallet provider is configured for this host.
    #[error("Please install MetaMask or another wallet provider")]
    NoProvider,

    /// A dapp action was triggered before the wallet was connected.
    #[error("Please connect wallet")]
    NotConnected,

    // Input validation
    /// The address is empty, malformed or fails its checksum.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The amount is missing, malformed, not positive or too precise.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Please enter token URI")]
    MissingTokenUri,

    /// The deployment artifact is not valid creation bytecode.
    #[error("Invalid contract bytecode: {0}")]
    InvalidBytecode(String),

    // Wallet and chain
    /// The user declined a wallet prompt.
    #[error("User rejected the request: {0}")]
    UserRejected(String),

    /// The wallet does not know the requested chain.
    #[error("Unrecognized network: {0}")]
    UnrecognizedNetwork(String),

    /// The call was rejected by the contract, either at estimation or on-chain.
    #[error("Transaction reverted: {message}")]
    TransactionReverted {
        reason: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Unknown(String),
}

impl ServiceError {
    /// Message shown to the user: the contract's revert reason when there is
    /// one, the error itself otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::TransactionReverted {
                reason: Some(reason),
                ..
            } => reason.clone(),
            other => other.to_string(),
        }
    }

    /// Errors raised before anything is sent to the wallet.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ServiceError::NoProvider
                | ServiceError::NotConnected
                | ServiceError::InvalidAddress(_)
                | ServiceError::InvalidAmount(_)
                | ServiceError::MissingTokenUri
        )
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Rpc { code, message, .. } if code == USER_REJECTED_REQUEST => {
                ServiceError::UserRejected(message)
            }
            RepositoryError::Rpc { code, message, .. } if code == UNRECOGNIZED_CHAIN => {
                ServiceError::UnrecognizedNetwork(message)
            }
            RepositoryError::Rpc {
                message,
                revert_reason: Some(reason),
                ..
            } => ServiceError::TransactionReverted {
                reason: Some(reason),
                message,
            },
            RepositoryError::Reverted {
                tx_hash,
                revert_reason,
            } => ServiceError::TransactionReverted {
                reason: revert_reason,
                message: format!("transaction {tx_hash} failed on-chain"),
            },
            err @ RepositoryError::DecodeError(_) => ServiceError::Unknown(err.to_string()),
            RepositoryError::Rpc { message, .. }
            | RepositoryError::Transport(message)
            | RepositoryError::Other(message) => ServiceError::Unknown(message),
        }
    }
}
