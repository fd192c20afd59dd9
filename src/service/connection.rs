use std::fmt;
use std::sync::Arc;

use alloy::primitives::Address;
use tracing::instrument;

use crate::config::{Config, NetworkDescriptor};
use crate::repository::{AlloyWalletProvider, WalletProvider};
use crate::service::utils::truncate_address;
use crate::service::{ServiceError, ServiceResult};

/// A connected wallet: the provider, the granted account and the active chain.
///
/// Account or chain changes made in the wallet afterwards are not observed;
/// the session only reflects what the connect handshake established.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn WalletProvider>,
    account: Address,
    chain_id: u64,
}

impl Session {
    pub fn new(provider: Arc<dyn WalletProvider>, account: Address, chain_id: u64) -> Self {
        Self {
            provider,
            account,
            chain_id,
        }
    }

    pub fn provider(&self) -> &dyn WalletProvider {
        self.provider.as_ref()
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Connection indicator text, e.g. `Connected: 0x27cF...C158`.
    pub fn indicator(&self) -> String {
        format!("Connected: {}", truncate_address(&self.account))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

/// Establishes sessions with the wallet provider and keeps the wallet on the
/// required network.
pub struct ConnectionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    network: NetworkDescriptor,
}

impl ConnectionManager {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, network: NetworkDescriptor) -> Self {
        Self { provider, network }
    }

    /// Looks up the wallet provider configured for this host.
    ///
    /// A missing or unusable endpoint leaves the manager without a provider, so
    /// `connect` reports [`ServiceError::NoProvider`].
    pub fn from_config(config: &Config) -> Self {
        let provider = match config.wallet.endpoint() {
            Some(endpoint) => match AlloyWalletProvider::connect_http(endpoint) {
                Ok(provider) => {
                    tracing::info!("Using wallet provider at {endpoint}");
                    Some(Arc::new(provider) as Arc<dyn WalletProvider>)
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize wallet provider: {e}");
                    None
                }
            },
            None => {
                tracing::info!("No wallet provider configured");
                None
            }
        };

        Self::new(provider, config.network.clone())
    }

    /// Requests account access and moves the wallet onto the required network.
    ///
    /// An unknown network is added to the wallet (which also switches to it).
    /// Every other failure aborts the connect and is returned as-is.
    #[instrument(skip(self), err)]
    pub async fn connect(&self) -> ServiceResult<Session> {
        let provider = self.provider.clone().ok_or(ServiceError::NoProvider)?;

        let accounts = provider.request_accounts().await?;
        let account = accounts.first().copied().ok_or_else(|| {
            ServiceError::UserRejected("The wallet granted no accounts".to_string())
        })?;

        tracing::info!("Wallet granted account {account}");

        self.ensure_network(provider.as_ref()).await?;

        Ok(Session::new(provider, account, self.network.chain_id))
    }

    #[instrument(skip(self, provider), fields(chain_id = self.network.chain_id), err)]
    async fn ensure_network(&self, provider: &dyn WalletProvider) -> ServiceResult<()> {
        match provider.switch_chain(self.network.chain_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unrecognized_chain() => {
                tracing::warn!(
                    "Wallet does not know {}, adding it",
                    self.network.chain_name
                );
                provider.add_chain(&self.network).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
