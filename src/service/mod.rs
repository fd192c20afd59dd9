pub mod connection;
pub mod dapp;
pub mod dispatcher;
pub mod error;
pub mod notify;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod tests;

pub use connection::{ConnectionManager, Session};
pub use dapp::DappService;
pub use dispatcher::CallDispatcher;
pub use error::ServiceError;
pub use notify::{Notification, NotificationKind, Notifier, Operation};
pub use types::*;

pub(crate) type ServiceResult<T> = std::result::Result<T, ServiceError>;
