use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use tracing::instrument;

use crate::repository::{ContractBinding, RepositoryError, TxOutcome};
use crate::service::connection::Session;
use crate::service::{ServiceError, ServiceResult};

/// Submits contract calls through a connected session.
pub struct CallDispatcher<'a> {
    session: &'a Session,
}

impl<'a> CallDispatcher<'a> {
    /// Every call needs a session; without one nothing reaches the wallet.
    pub fn new(session: Option<&'a Session>) -> ServiceResult<Self> {
        let session = session.ok_or(ServiceError::NotConnected)?;
        Ok(Self { session })
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    /// Sends one call and waits for it to be mined.
    #[instrument(skip(self, binding), fields(method = binding.method), err)]
    pub async fn invoke(&self, binding: &ContractBinding) -> ServiceResult<TxOutcome> {
        tracing::info!(
            "Calling {} on {:?} from {}",
            binding.method,
            binding.address,
            self.session.account()
        );

        let outcome = self
            .session
            .provider()
            .send_transaction(self.session.account(), binding)
            .await?;

        tracing::info!("{} confirmed in {}", binding.method_name(), outcome.tx_hash);
        Ok(outcome)
    }

    /// Runs calls strictly one after another, each confirmed before the next
    /// is sent. The first failure stops the sequence.
    pub async fn invoke_sequence(
        &self,
        bindings: &[ContractBinding],
    ) -> ServiceResult<Vec<TxOutcome>> {
        let mut outcomes = Vec::with_capacity(bindings.len());
        for binding in bindings {
            outcomes.push(self.invoke(binding).await?);
        }
        Ok(outcomes)
    }

    /// Creates a contract and returns the address assigned to it.
    #[instrument(skip(self, bytecode), fields(len = bytecode.len()), err)]
    pub async fn deploy(&self, bytecode: Bytes) -> ServiceResult<(TxOutcome, Address)> {
        let outcome = self.invoke(&ContractBinding::deploy(bytecode)).await?;

        let address = outcome.contract_address.ok_or_else(|| {
            ServiceError::Unknown(format!(
                "Deployment {} has no contract address in its receipt",
                outcome.tx_hash
            ))
        })?;

        Ok((outcome, address))
    }

    /// Read-only call of a view function, decoded with its interface.
    #[instrument(skip(self, call), fields(method = C::SIGNATURE), err)]
    pub async fn read<C: SolCall>(&self, address: Address, call: &C) -> ServiceResult<C::Return> {
        let binding = ContractBinding::call(address, call);

        let data = self
            .session
            .provider()
            .call(self.session.account(), &binding)
            .await?;

        C::abi_decode_returns(&data).map_err(|e| {
            ServiceError::from(RepositoryError::DecodeError(format!(
                "{} returned {data}: {e}",
                C::SIGNATURE
            )))
        })
    }
}
