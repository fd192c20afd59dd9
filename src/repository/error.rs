use alloy::primitives::B256;
use thiserror::Error;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// EIP-3326: the wallet does not recognize the requested chain.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// JSON-RPC error response returned by the wallet or node.
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        /// Decoded revert reason, when the error carried revert data.
        revert_reason: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    /// The transaction was mined but its receipt reports failure.
    #[error("Transaction {tx_hash} reverted")]
    Reverted {
        tx_hash: B256,
        revert_reason: Option<String>,
    },

    /// Call return data that does not match the interface.
    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("{0}")]
    Other(String),
}

impl RepositoryError {
    pub fn code(&self) -> Option<i64> {
        match self {
            RepositoryError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code() == Some(UNRECOGNIZED_CHAIN)
    }
}
