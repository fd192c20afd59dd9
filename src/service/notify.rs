use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use rmcp::schemars::{self, JsonSchema};
use serde::Serialize;
use tokio::sync::broadcast;

use super::error::ServiceError;

const DEFAULT_CAPACITY: usize = 64;

/// User-triggered dapp actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, JsonSchema, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Connect,
    Transfer,
    Swap,
    Mint,
    Deploy,
    AddLiquidity,
    RemoveLiquidity,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Connect => "Failed to connect wallet",
            Operation::Transfer => "Transfer failed",
            Operation::Swap => "Swap failed",
            Operation::Mint => "Mint failed",
            Operation::Deploy => "Deployment failed",
            Operation::AddLiquidity => "Add liquidity failed",
            Operation::RemoveLiquidity => "Remove liquidity failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Connected,
    Success,
    Failure,
}

/// One user-facing message. Every action outcome produces exactly one.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub operation: Operation,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn success(operation: Operation, message: impl Into<String>) -> Self {
        let kind = match operation {
            Operation::Connect => NotificationKind::Connected,
            _ => NotificationKind::Success,
        };

        Self {
            kind,
            operation,
            message: message.into(),
            contract_address: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_contract_address(mut self, address: Address) -> Self {
        self.contract_address = Some(address);
        self
    }

    /// Validation and connection prompts are shown as-is; failures past that
    /// point are prefixed with the operation.
    pub fn failure(operation: Operation, error: &ServiceError) -> Self {
        let message = if error.is_precondition() {
            error.user_message()
        } else {
            format!("{}: {}", operation.failure_prefix(), error.user_message())
        };

        Self {
            kind: NotificationKind::Failure,
            operation,
            message,
            contract_address: None,
            timestamp: Utc::now(),
        }
    }
}

/// Fan-out channel the host UI subscribes to for action outcomes.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn notify(&self, notification: Notification) {
        // No subscribers is fine: the tool result still carries the outcome
        if self.sender.send(notification).is_err() {
            tracing::debug!("notification dropped, no subscribers");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
