pub mod app;
pub mod config;
pub mod middleware;
pub mod repository;
pub mod service;

pub use app::build_app;

// Re-export commonly used types for tests
pub use service::{
    ActionResponse, ActionResult, BalanceRequest, DappService, DeployContractRequest,
    LiquidityRequest, MintNftRequest, Notification, Notifier, QueryResult, QuoteSwapRequest,
    SwapRequest, TokenUriRequest, TransferRequest,
};
