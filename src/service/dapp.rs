use std::path::Path;

use alloy::primitives::{Bytes, U256, hex};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{Json, ServerHandler, tool, tool_handler, tool_router};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::config::{ArtifactsConfig, Config, ContractsConfig};
use crate::repository::contract::{IERC20, IERC721, ISimplePair};
use crate::repository::{ContractBinding, TxOutcome};
use crate::service::connection::{ConnectionManager, Session};
use crate::service::dispatcher::CallDispatcher;
use crate::service::notify::{Notification, Notifier, Operation};
use crate::service::types::{
    ActionResponse, ActionResult, BalanceRequest, ContractType, DeployContractRequest,
    LiquidityRequest, MintNftRequest, QueryResponse, QueryResult, QuoteSwapRequest, SwapRequest,
    TokenUriRequest, TransferRequest, WalletStatusResponse,
};
use crate::service::utils::{BASE_UNIT_DECIMALS, calculate_rate, format_balance};
use crate::service::validation::{
    validate_address, validate_amount, validate_token_id, validate_token_uri,
};
use crate::service::{ServiceError, ServiceResult};

/// Tea Sepolia dapp: one session per client, one tool per page action.
pub struct DappService {
    tool_router: ToolRouter<Self>,
    connection: ConnectionManager,
    session: RwLock<Option<Session>>,
    contracts: ContractsConfig,
    artifacts: ArtifactsConfig,
    notifier: Notifier,
}

// MCP Tool Layer
#[tool_router]
impl DappService {
    pub fn new(config: &Config, notifier: Notifier) -> Self {
        Self::with_connection(
            ConnectionManager::from_config(config),
            config.contracts.clone(),
            config.artifacts.clone(),
            notifier,
        )
    }

    pub fn with_connection(
        connection: ConnectionManager,
        contracts: ContractsConfig,
        artifacts: ArtifactsConfig,
        notifier: Notifier,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            connection,
            session: RwLock::new(None),
            contracts,
            artifacts,
            notifier,
        }
    }

    #[instrument(skip(self))]
    #[tool(description = "Connect the wallet and switch it to Tea Sepolia, adding the network if needed")]
    pub async fn connect_wallet(&self) -> Json<ActionResult> {
        let result = self.connect_wallet_impl().await;
        Json(self.report(Operation::Connect, result))
    }

    #[instrument(skip(self))]
    #[tool(description = "Show whether a wallet is connected and which account it uses")]
    pub async fn wallet_status(&self) -> Json<WalletStatusResponse> {
        let session = self.session.read().await;
        let status = match session.as_ref() {
            Some(session) => WalletStatusResponse {
                connected: true,
                indicator: session.indicator(),
                account: Some(session.account().to_checksum(None)),
                chain_id: Some(session.chain_id()),
            },
            None => WalletStatusResponse {
                connected: false,
                indicator: "Not connected".to_string(),
                account: None,
                chain_id: None,
            },
        };
        Json(status)
    }

    #[instrument(skip(self))]
    #[tool(description = "Transfer ZNCT to a recipient")]
    pub async fn transfer_znct(
        &self,
        Parameters(req): Parameters<TransferRequest>,
    ) -> Json<ActionResult> {
        let result = self.transfer_znct_impl(req).await;
        Json(self.report(Operation::Transfer, result))
    }

    #[instrument(skip(self))]
    #[tool(description = "Swap ZNCT for TEA through the SimplePair pool (approve, then swap)")]
    pub async fn swap_znct_for_tea(
        &self,
        Parameters(req): Parameters<SwapRequest>,
    ) -> Json<ActionResult> {
        let result = self.swap_znct_for_tea_impl(req).await;
        Json(self.report(Operation::Swap, result))
    }

    #[instrument(skip(self))]
    #[tool(description = "Mint a TeaNFT with the given token URI to the connected account")]
    pub async fn mint_nft(&self, Parameters(req): Parameters<MintNftRequest>) -> Json<ActionResult> {
        let result = self.mint_nft_impl(req).await;
        Json(self.report(Operation::Mint, result))
    }

    #[instrument(skip(self))]
    #[tool(description = "Deploy a new ERC-20 (\"erc20\") or ERC-721 contract from the bundled templates")]
    pub async fn deploy_contract(
        &self,
        Parameters(req): Parameters<DeployContractRequest>,
    ) -> Json<ActionResult> {
        let result = self.deploy_contract_impl(req).await;
        Json(self.report(Operation::Deploy, result))
    }

    #[instrument(skip(self))]
    #[tool(description = "Add ZNCT and TEA liquidity to the SimplePair pool (approve, then add)")]
    pub async fn add_liquidity(
        &self,
        Parameters(req): Parameters<LiquidityRequest>,
    ) -> Json<ActionResult> {
        let result = self.add_liquidity_impl(req).await;
        Json(self.report(Operation::AddLiquidity, result))
    }

    #[instrument(skip(self))]
    #[tool(description = "Remove ZNCT and TEA liquidity from the SimplePair pool")]
    pub async fn remove_liquidity(
        &self,
        Parameters(req): Parameters<LiquidityRequest>,
    ) -> Json<ActionResult> {
        let result = self.remove_liquidity_impl(req).await;
        Json(self.report(Operation::RemoveLiquidity, result))
    }

    #[instrument(skip(self))]
    #[tool(description = "Query the ZNCT balance of an address (defaults to the connected account)")]
    pub async fn znct_balance(
        &self,
        Parameters(req): Parameters<BalanceRequest>,
    ) -> Json<QueryResult> {
        Json(Self::query_result(self.znct_balance_impl(req).await))
    }

    #[instrument(skip(self))]
    #[tool(description = "Get the metadata URI of a TeaNFT token")]
    pub async fn nft_token_uri(
        &self,
        Parameters(req): Parameters<TokenUriRequest>,
    ) -> Json<QueryResult> {
        Json(Self::query_result(self.nft_token_uri_impl(req).await))
    }

    #[instrument(skip(self))]
    #[tool(description = "Quote how much TEA the pool pays for a ZNCT amount")]
    pub async fn quote_swap(
        &self,
        Parameters(req): Parameters<QuoteSwapRequest>,
    ) -> Json<QueryResult> {
        Json(Self::query_result(self.quote_swap_impl(req).await))
    }
}

// Business Logic - Core implementation
impl DappService {
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Turns an action outcome into its single notification and tool result.
    fn report(&self, operation: Operation, result: ServiceResult<ActionResponse>) -> ActionResult {
        match result {
            Ok(response) => {
                let mut notification = Notification::success(operation, response.message.clone());
                if let Some(address) = response.contract_address {
                    notification = notification.with_contract_address(address);
                }
                self.notifier.notify(notification);
                ActionResult::Success(response)
            }
            Err(e) => {
                tracing::error!("{operation:?} failed: {e}");
                let notification = Notification::failure(operation, &e);
                let message = notification.message.clone();
                self.notifier.notify(notification);
                ActionResult::Error { error: e, message }
            }
        }
    }

    fn query_result(result: ServiceResult<QueryResponse>) -> QueryResult {
        match result {
            Ok(response) => QueryResult::Success(response),
            Err(e) => {
                tracing::error!("Query failed: {e}");
                QueryResult::Error { error: e }
            }
        }
    }

    fn action_response(
        operation: Operation,
        message: impl Into<String>,
        outcomes: &[TxOutcome],
    ) -> ActionResponse {
        ActionResponse {
            operation,
            message: message.into(),
            tx_hashes: outcomes.iter().map(|o| o.tx_hash.to_string()).collect(),
            contract_address: None,
        }
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn connect_wallet_impl(&self) -> ServiceResult<ActionResponse> {
        let session = self.connection.connect().await?;
        let indicator = session.indicator();

        tracing::info!(
            "Connected {} on chain {}",
            session.account(),
            session.chain_id()
        );

        // A repeated connect replaces the previous session
        *self.session.write().await = Some(session);

        Ok(Self::action_response(Operation::Connect, indicator, &[]))
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn transfer_znct_impl(
        &self,
        req: TransferRequest,
    ) -> ServiceResult<ActionResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let recipient = validate_address(&req.recipient)?;
        let amount = validate_amount(&req.amount)?;

        let transfer = ContractBinding::call(
            self.contracts.znct,
            &IERC20::transferCall {
                to: recipient,
                amount,
            },
        );
        let outcome = dispatcher.invoke(&transfer).await?;

        Ok(Self::action_response(
            Operation::Transfer,
            "Transfer successful",
            &[outcome],
        ))
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn swap_znct_for_tea_impl(
        &self,
        req: SwapRequest,
    ) -> ServiceResult<ActionResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let amount_in = validate_amount(&req.amount)?;

        let outcomes = dispatcher
            .invoke_sequence(&[
                self.approve_pair(amount_in),
                ContractBinding::call(
                    self.contracts.pair,
                    &ISimplePair::swapTokensForETHCall {
                        tokenAmount: amount_in,
                    },
                ),
            ])
            .await?;

        Ok(Self::action_response(
            Operation::Swap,
            "Swap successful",
            &outcomes,
        ))
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn mint_nft_impl(&self, req: MintNftRequest) -> ServiceResult<ActionResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let token_uri = validate_token_uri(&req.token_uri)?;

        let mint = ContractBinding::call(
            self.contracts.nft,
            &IERC721::safeMintCall {
                to: dispatcher.session().account(),
                tokenURI: token_uri.to_string(),
            },
        );
        let outcome = dispatcher.invoke(&mint).await?;

        Ok(Self::action_response(Operation::Mint, "NFT minted", &[outcome]))
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn deploy_contract_impl(
        &self,
        req: DeployContractRequest,
    ) -> ServiceResult<ActionResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let contract_type: ContractType = req
            .contract_type
            .parse()
            .unwrap_or(ContractType::Erc721);
        let artifact = match contract_type {
            ContractType::Erc20 => &self.artifacts.erc20,
            ContractType::Erc721 => &self.artifacts.erc721,
        };

        let bytecode = load_bytecode(artifact).await?;
        tracing::info!(
            "Deploying {contract_type:?} template ({} bytes) from {}",
            bytecode.len(),
            artifact.display()
        );

        let (outcome, address) = dispatcher.deploy(bytecode).await?;

        let mut response = Self::action_response(
            Operation::Deploy,
            format!("Contract deployed at: {}", address.to_checksum(None)),
            &[outcome],
        );
        response.contract_address = Some(address);
        Ok(response)
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn add_liquidity_impl(
        &self,
        req: LiquidityRequest,
    ) -> ServiceResult<ActionResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let amount_token = validate_amount(&req.znct_amount)?;
        let amount_tea = validate_amount(&req.tea_amount)?;

        let outcomes = dispatcher
            .invoke_sequence(&[
                self.approve_pair(amount_token),
                ContractBinding::call(
                    self.contracts.pair,
                    &ISimplePair::addLiquidityCall {
                        tokenAmount: amount_token,
                    },
                )
                .with_value(amount_tea),
            ])
            .await?;

        Ok(Self::action_response(
            Operation::AddLiquidity,
            "Liquidity added",
            &outcomes,
        ))
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn remove_liquidity_impl(
        &self,
        req: LiquidityRequest,
    ) -> ServiceResult<ActionResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let token_amount = validate_amount(&req.znct_amount)?;
        let eth_amount = validate_amount(&req.tea_amount)?;

        let remove = ContractBinding::call(
            self.contracts.pair,
            &ISimplePair::removeLiquidityCall {
                tokenAmount: token_amount,
                ethAmount: eth_amount,
            },
        );
        let outcome = dispatcher.invoke(&remove).await?;

        Ok(Self::action_response(
            Operation::RemoveLiquidity,
            "Liquidity removed",
            &[outcome],
        ))
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn znct_balance_impl(
        &self,
        req: BalanceRequest,
    ) -> ServiceResult<QueryResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let owner = match req.owner.as_deref() {
            Some(owner) => validate_address(owner)?,
            None => dispatcher.session().account(),
        };

        let balance = dispatcher
            .read(self.contracts.znct, &IERC20::balanceOfCall { account: owner })
            .await?;

        Ok(QueryResponse {
            value: balance.to_string(),
            formatted: format_balance(balance, BASE_UNIT_DECIMALS),
            symbol: Some("ZNCT".to_string()),
            rate: None,
        })
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn nft_token_uri_impl(
        &self,
        req: TokenUriRequest,
    ) -> ServiceResult<QueryResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let token_id = validate_token_id(&req.token_id)?;

        let uri = dispatcher
            .read(self.contracts.nft, &IERC721::tokenURICall { tokenId: token_id })
            .await?;

        Ok(QueryResponse {
            value: uri.clone(),
            formatted: uri,
            symbol: None,
            rate: None,
        })
    }

    #[instrument(skip(self), err)]
    pub(crate) async fn quote_swap_impl(
        &self,
        req: QuoteSwapRequest,
    ) -> ServiceResult<QueryResponse> {
        let session = self.session().await;
        let dispatcher = CallDispatcher::new(session.as_ref())?;

        let amount_in = validate_amount(&req.amount)?;

        let amount_out = dispatcher
            .read(
                self.contracts.pair,
                &ISimplePair::getETHAmountCall {
                    tokenAmount: amount_in,
                },
            )
            .await?;

        // The rate is informational; very large quotes overflow Decimal
        let rate = calculate_rate(amount_in, amount_out)
            .map(|rate| rate.to_string())
            .ok();

        Ok(QueryResponse {
            value: amount_out.to_string(),
            formatted: format_balance(amount_out, BASE_UNIT_DECIMALS),
            symbol: Some("TEA".to_string()),
            rate,
        })
    }

    /// Allowance for the pair to pull `amount` ZNCT from the session account.
    fn approve_pair(&self, amount: U256) -> ContractBinding {
        ContractBinding::call(
            self.contracts.znct,
            &IERC20::approveCall {
                spender: self.contracts.pair,
                amount,
            },
        )
    }
}

/// Reads a hex creation-bytecode artifact.
pub(crate) async fn load_bytecode(path: &Path) -> ServiceResult<Bytes> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        ServiceError::InvalidBytecode(format!("Failed to read {}: {e}", path.display()))
    })?;

    decode_bytecode(&text)
}

pub(crate) fn decode_bytecode(text: &str) -> ServiceResult<Bytes> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| ServiceError::InvalidBytecode(format!("Not valid hex: {e}")))?;

    if bytes.is_empty() {
        return Err(ServiceError::InvalidBytecode("Bytecode is empty".to_string()));
    }

    Ok(bytes.into())
}

#[tool_handler]
impl ServerHandler for DappService {}
