use std::str::FromStr;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use rmcp::handler::server::wrapper::Parameters;
use tokio::sync::broadcast::error::TryRecvError;

use crate::config::{
    ArtifactsConfig, ContractsConfig, NFT_ADDRESS, NetworkDescriptor, PAIR_ADDRESS,
    TEA_SEPOLIA_CHAIN_ID, ZNCT_ADDRESS,
};
use crate::repository::contract::{IERC20, IERC721, ISimplePair};
use crate::repository::{ContractBinding, RepositoryError, TxOutcome, WalletProvider};
use crate::service::connection::ConnectionManager;
use crate::service::dapp::{DappService, decode_bytecode, load_bytecode};
use crate::service::notify::{NotificationKind, Notifier, Operation};
use crate::service::types::{
    ActionResult, BalanceRequest, DeployContractRequest, LiquidityRequest, MintNftRequest,
    QuoteSwapRequest, SwapRequest, TokenUriRequest, TransferRequest,
};
use crate::service::validation::validate_address;
use crate::service::{CallDispatcher, ServiceError};

const ACCOUNT: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const RECIPIENT: &str = "0x742d35cc6634c0532925a3b844bc454e4438f44e";
const DEPLOYED: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

fn account() -> Address {
    Address::from_str(ACCOUNT).unwrap()
}

fn rpc_error(code: i64, message: &str) -> RepositoryError {
    RepositoryError::Rpc {
        code,
        message: message.to_string(),
        revert_reason: None,
    }
}

/// In-memory wallet that records every request it receives.
struct MockWallet {
    requests: Mutex<Vec<String>>,
    sent: Mutex<Vec<ContractBinding>>,
    accounts: Result<Vec<Address>, RepositoryError>,
    switch_error: Option<RepositoryError>,
    add_error: Option<RepositoryError>,
    /// Fails `send_transaction` for the method with this name
    failing_method: Option<(&'static str, RepositoryError)>,
    call_result: Bytes,
}

impl MockWallet {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            accounts: Ok(vec![account()]),
            switch_error: None,
            add_error: None,
            failing_method: None,
            call_result: Bytes::new(),
        }
    }

    fn with_accounts(mut self, accounts: Result<Vec<Address>, RepositoryError>) -> Self {
        self.accounts = accounts;
        self
    }

    fn with_switch_error(mut self, err: RepositoryError) -> Self {
        self.switch_error = Some(err);
        self
    }

    fn with_add_error(mut self, err: RepositoryError) -> Self {
        self.add_error = Some(err);
        self
    }

    fn failing(mut self, method: &'static str, err: RepositoryError) -> Self {
        self.failing_method = Some((method, err));
        self
    }

    fn with_call_result(mut self, data: impl Into<Bytes>) -> Self {
        self.call_result = data.into();
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn sent(&self) -> Vec<ContractBinding> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, request: impl Into<String>) {
        self.requests.lock().unwrap().push(request.into());
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, RepositoryError> {
        self.record("eth_requestAccounts");
        self.accounts.clone()
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), RepositoryError> {
        self.record(format!("wallet_switchEthereumChain:{chain_id}"));
        match &self.switch_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), RepositoryError> {
        self.record(format!("wallet_addEthereumChain:{}", network.chain_id));
        match &self.add_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn send_transaction(
        &self,
        from: Address,
        binding: &ContractBinding,
    ) -> Result<TxOutcome, RepositoryError> {
        assert_eq!(from, account(), "transactions must come from the session account");
        self.record(format!("eth_sendTransaction:{}", binding.method_name()));

        if let Some((method, err)) = &self.failing_method {
            if binding.method_name() == *method {
                return Err(err.clone());
            }
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(binding.clone());

        Ok(TxOutcome {
            tx_hash: B256::with_last_byte(sent.len() as u8),
            block_number: Some(sent.len() as u64),
            contract_address: binding
                .is_deployment()
                .then(|| Address::from_str(DEPLOYED).unwrap()),
        })
    }

    async fn call(&self, _from: Address, binding: &ContractBinding) -> Result<Bytes, RepositoryError> {
        self.record(format!("eth_call:{}", binding.method_name()));
        Ok(self.call_result.clone())
    }
}

fn service_with(wallet: Option<Arc<MockWallet>>) -> DappService {
    let provider = wallet.map(|w| w as Arc<dyn WalletProvider>);
    DappService::with_connection(
        ConnectionManager::new(provider, NetworkDescriptor::tea_sepolia()),
        ContractsConfig::default(),
        ArtifactsConfig::default(),
        Notifier::default(),
    )
}

async fn connected_service(wallet: &Arc<MockWallet>) -> DappService {
    let service = service_with(Some(wallet.clone()));
    service.connect_wallet_impl().await.unwrap();
    wallet.requests.lock().unwrap().clear();
    service
}

fn expect_error(result: ActionResult) -> (ServiceError, String) {
    match result {
        ActionResult::Error { error, message } => (error, message),
        ActionResult::Success(resp) => panic!("Expected error but got success: {resp:?}"),
    }
}

// --- connection ---

#[tokio::test]
async fn test_connect_without_provider_should_fail() {
    let service = service_with(None);
    let mut rx = service.notifier().subscribe();

    let (error, message) = expect_error(service.connect_wallet().await.0);

    assert_eq!(error, ServiceError::NoProvider);
    assert_eq!(message, "Please install MetaMask or another wallet provider");
    assert!(service.session().await.is_none());
    assert_eq!(rx.recv().await.unwrap().kind, NotificationKind::Failure);
}

#[tokio::test]
async fn test_connect_on_known_chain_should_work() {
    let wallet = Arc::new(MockWallet::new());
    let service = service_with(Some(wallet.clone()));

    let response = service.connect_wallet_impl().await.unwrap();

    assert_eq!(response.message, "Connected: 0xd8dA...6045");
    assert_eq!(
        wallet.requests(),
        vec![
            "eth_requestAccounts".to_string(),
            format!("wallet_switchEthereumChain:{TEA_SEPOLIA_CHAIN_ID}"),
        ]
    );

    let session = service.session().await.unwrap();
    assert_eq!(session.account(), account());
    assert_eq!(session.chain_id(), TEA_SEPOLIA_CHAIN_ID);
}

#[tokio::test]
async fn test_connect_on_unknown_chain_adds_network_once() {
    let wallet = Arc::new(
        MockWallet::new().with_switch_error(rpc_error(4902, "Unrecognized chain ID \"0x27ea\"")),
    );
    let service = service_with(Some(wallet.clone()));

    service.connect_wallet_impl().await.unwrap();

    let adds = wallet
        .requests()
        .iter()
        .filter(|r| r.starts_with("wallet_addEthereumChain"))
        .count();
    assert_eq!(adds, 1);
    assert_eq!(
        wallet.requests().last().unwrap(),
        &format!("wallet_addEthereumChain:{TEA_SEPOLIA_CHAIN_ID}")
    );
    assert_eq!(service.session().await.unwrap().chain_id(), TEA_SEPOLIA_CHAIN_ID);
}

#[tokio::test]
async fn test_connect_fails_when_add_network_fails() {
    let wallet = Arc::new(
        MockWallet::new()
            .with_switch_error(rpc_error(4902, "Unrecognized chain ID"))
            .with_add_error(rpc_error(4001, "User rejected the request.")),
    );
    let service = service_with(Some(wallet.clone()));

    let result = service.connect_wallet_impl().await;

    assert!(matches!(result, Err(ServiceError::UserRejected(_))));
    assert!(service.session().await.is_none());
}

#[tokio::test]
async fn test_connect_other_switch_error_is_fatal() {
    let wallet = Arc::new(MockWallet::new().with_switch_error(rpc_error(-32002, "Request pending")));
    let service = service_with(Some(wallet.clone()));

    let (error, message) = expect_error(service.connect_wallet().await.0);

    assert_eq!(error, ServiceError::Unknown("Request pending".to_string()));
    assert_eq!(message, "Failed to connect wallet: Request pending");
    assert!(service.session().await.is_none());
    assert!(!wallet.requests().iter().any(|r| r.starts_with("wallet_addEthereumChain")));
}

#[tokio::test]
async fn test_connect_rejected_by_user() {
    let wallet = Arc::new(
        MockWallet::new().with_accounts(Err(rpc_error(4001, "User rejected the request."))),
    );
    let service = service_with(Some(wallet.clone()));

    let result = service.connect_wallet_impl().await;

    assert_eq!(
        result.unwrap_err(),
        ServiceError::UserRejected("User rejected the request.".to_string())
    );
    // no network switch without an account
    assert_eq!(wallet.requests(), vec!["eth_requestAccounts".to_string()]);
}

#[tokio::test]
async fn test_connect_with_no_granted_accounts_should_fail() {
    let wallet = Arc::new(MockWallet::new().with_accounts(Ok(vec![])));
    let service = service_with(Some(wallet));

    let result = service.connect_wallet_impl().await;
    assert!(matches!(result, Err(ServiceError::UserRejected(_))));
}

#[tokio::test]
async fn test_wallet_status_reflects_session() {
    let wallet = Arc::new(MockWallet::new());
    let service = service_with(Some(wallet));

    let status = service.wallet_status().await.0;
    assert!(!status.connected);
    assert_eq!(status.indicator, "Not connected");

    service.connect_wallet_impl().await.unwrap();

    let status = service.wallet_status().await.0;
    assert!(status.connected);
    assert_eq!(status.indicator, "Connected: 0xd8dA...6045");
    assert_eq!(status.account.as_deref(), Some(ACCOUNT));
    assert_eq!(status.chain_id, Some(TEA_SEPOLIA_CHAIN_ID));
}

// --- dispatch preconditions ---

#[tokio::test]
async fn test_dispatcher_requires_session() {
    assert!(matches!(
        CallDispatcher::new(None),
        Err(ServiceError::NotConnected)
    ));
}

#[tokio::test]
async fn test_actions_without_connect_make_no_wallet_calls() {
    let wallet = Arc::new(MockWallet::new());
    let service = service_with(Some(wallet.clone()));

    let result = service
        .transfer_znct_impl(TransferRequest {
            recipient: RECIPIENT.to_string(),
            amount: "1".to_string(),
        })
        .await;
    assert_eq!(result.unwrap_err(), ServiceError::NotConnected);

    let result = service
        .swap_znct_for_tea_impl(SwapRequest {
            amount: "1".to_string(),
        })
        .await;
    assert_eq!(result.unwrap_err(), ServiceError::NotConnected);

    let result = service
        .znct_balance_impl(BalanceRequest { owner: None })
        .await;
    assert_eq!(result.unwrap_err(), ServiceError::NotConnected);

    assert!(wallet.requests().is_empty());
}

#[tokio::test]
async fn test_transfer_zero_amount_submits_nothing() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;
    let mut rx = service.notifier().subscribe();

    let (error, message) = expect_error(
        service
            .transfer_znct(Parameters(TransferRequest {
                recipient: RECIPIENT.to_string(),
                amount: "0".to_string(),
            }))
            .await
            .0,
    );

    assert_eq!(
        error,
        ServiceError::InvalidAmount("Amount must be greater than 0".to_string())
    );
    assert_eq!(message, "Invalid amount: Amount must be greater than 0");
    assert!(wallet.requests().is_empty());
    assert_eq!(rx.recv().await.unwrap().kind, NotificationKind::Failure);
}

#[tokio::test]
async fn test_transfer_invalid_recipient_should_fail() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let result = service
        .transfer_znct_impl(TransferRequest {
            recipient: "not-an-address".to_string(),
            amount: "1".to_string(),
        })
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidAddress(_))));
    assert!(wallet.requests().is_empty());
}

// --- actions ---

#[tokio::test]
async fn test_transfer_should_work() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;
    let mut rx = service.notifier().subscribe();

    let result = service
        .transfer_znct(Parameters(TransferRequest {
            recipient: RECIPIENT.to_string(),
            amount: "2.5".to_string(),
        }))
        .await
        .0;

    let ActionResult::Success(response) = result else {
        panic!("Expected transfer to succeed");
    };
    assert_eq!(response.message, "Transfer successful");
    assert_eq!(response.tx_hashes.len(), 1);

    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].address, Some(ZNCT_ADDRESS));
    let call = IERC20::transferCall::abi_decode(&sent[0].calldata).unwrap();
    assert_eq!(call.to, Address::from_str(RECIPIENT).unwrap());
    assert_eq!(call.amount, U256::from_str("2500000000000000000").unwrap());

    // exactly one message per outcome
    let notification = rx.recv().await.unwrap();
    assert_eq!(notification.operation, Operation::Transfer);
    assert_eq!(notification.message, "Transfer successful");
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_swap_approves_before_swapping() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let response = service
        .swap_znct_for_tea_impl(SwapRequest {
            amount: "10".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.message, "Swap successful");
    assert_eq!(response.tx_hashes.len(), 2);
    assert_eq!(
        wallet.requests(),
        vec![
            "eth_sendTransaction:approve".to_string(),
            "eth_sendTransaction:swapTokensForETH".to_string(),
        ]
    );

    let sent = wallet.sent();
    let amount = U256::from_str("10000000000000000000").unwrap();

    assert_eq!(sent[0].address, Some(ZNCT_ADDRESS));
    let approve = IERC20::approveCall::abi_decode(&sent[0].calldata).unwrap();
    assert_eq!(approve.spender, PAIR_ADDRESS);
    assert_eq!(approve.amount, amount);

    assert_eq!(sent[1].address, Some(PAIR_ADDRESS));
    let swap = ISimplePair::swapTokensForETHCall::abi_decode(&sent[1].calldata).unwrap();
    assert_eq!(swap.tokenAmount, amount);
}

#[tokio::test]
async fn test_swap_stops_when_approval_fails() {
    let wallet = Arc::new(
        MockWallet::new().failing("approve", rpc_error(4001, "User denied transaction signature.")),
    );
    let service = connected_service(&wallet).await;

    let (error, message) = expect_error(
        service
            .swap_znct_for_tea(Parameters(SwapRequest {
                amount: "10".to_string(),
            }))
            .await
            .0,
    );

    assert!(matches!(error, ServiceError::UserRejected(_)));
    assert_eq!(
        message,
        "Swap failed: User rejected the request: User denied transaction signature."
    );
    assert_eq!(wallet.requests(), vec!["eth_sendTransaction:approve".to_string()]);
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_add_liquidity_attaches_tea_value() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let response = service
        .add_liquidity_impl(LiquidityRequest {
            znct_amount: "100".to_string(),
            tea_amount: "0.5".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.message, "Liquidity added");

    let sent = wallet.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].method_name(), "approve");
    assert_eq!(sent[0].value, None);

    assert_eq!(sent[1].address, Some(PAIR_ADDRESS));
    let add = ISimplePair::addLiquidityCall::abi_decode(&sent[1].calldata).unwrap();
    assert_eq!(add.tokenAmount, U256::from_str("100000000000000000000").unwrap());
    assert_eq!(sent[1].value, Some(U256::from_str("500000000000000000").unwrap()));
}

#[tokio::test]
async fn test_add_liquidity_stops_when_approval_fails() {
    let wallet = Arc::new(
        MockWallet::new().failing("approve", rpc_error(4001, "User denied transaction signature.")),
    );
    let service = connected_service(&wallet).await;

    let result = service
        .add_liquidity_impl(LiquidityRequest {
            znct_amount: "100".to_string(),
            tea_amount: "0.5".to_string(),
        })
        .await;

    assert_eq!(
        result.unwrap_err(),
        ServiceError::UserRejected("User denied transaction signature.".to_string())
    );
    assert_eq!(wallet.requests(), vec!["eth_sendTransaction:approve".to_string()]);
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_add_liquidity_requires_both_amounts() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let result = service
        .add_liquidity_impl(LiquidityRequest {
            znct_amount: "100".to_string(),
            tea_amount: "".to_string(),
        })
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidAmount(_))));
    assert!(wallet.requests().is_empty());
}

#[tokio::test]
async fn test_remove_liquidity_surfaces_revert_reason() {
    let wallet = Arc::new(MockWallet::new().failing(
        "removeLiquidity",
        RepositoryError::Rpc {
            code: 3,
            message: "execution reverted: Insufficient liquidity".to_string(),
            revert_reason: Some("Insufficient liquidity".to_string()),
        },
    ));
    let service = connected_service(&wallet).await;
    let mut rx = service.notifier().subscribe();

    let (error, message) = expect_error(
        service
            .remove_liquidity(Parameters(LiquidityRequest {
                znct_amount: "1".to_string(),
                tea_amount: "1".to_string(),
            }))
            .await
            .0,
    );

    assert!(matches!(error, ServiceError::TransactionReverted { .. }));
    assert_eq!(message, "Remove liquidity failed: Insufficient liquidity");
    assert_eq!(rx.recv().await.unwrap().message, message);
}

#[tokio::test]
async fn test_remove_liquidity_should_work() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let response = service
        .remove_liquidity_impl(LiquidityRequest {
            znct_amount: "3".to_string(),
            tea_amount: "0.25".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.message, "Liquidity removed");
    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    let remove = ISimplePair::removeLiquidityCall::abi_decode(&sent[0].calldata).unwrap();
    assert_eq!(remove.tokenAmount, U256::from_str("3000000000000000000").unwrap());
    assert_eq!(remove.ethAmount, U256::from_str("250000000000000000").unwrap());
}

#[tokio::test]
async fn test_mint_nft_mints_to_session_account() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let response = service
        .mint_nft_impl(MintNftRequest {
            token_uri: "ipfs://tea/1.json".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.message, "NFT minted");
    let sent = wallet.sent();
    assert_eq!(sent[0].address, Some(NFT_ADDRESS));
    let mint = IERC721::safeMintCall::abi_decode(&sent[0].calldata).unwrap();
    assert_eq!(mint.to, account());
    assert_eq!(mint.tokenURI, "ipfs://tea/1.json");
}

#[tokio::test]
async fn test_mint_nft_without_uri_should_fail() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let result = service
        .mint_nft_impl(MintNftRequest {
            token_uri: String::new(),
        })
        .await;

    assert_eq!(result.unwrap_err(), ServiceError::MissingTokenUri);
    assert!(wallet.requests().is_empty());
}

#[tokio::test]
async fn test_deploy_reports_new_contract_address() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;
    let mut rx = service.notifier().subscribe();

    let result = service
        .deploy_contract(Parameters(DeployContractRequest {
            contract_type: "erc721".to_string(),
        }))
        .await
        .0;

    let ActionResult::Success(response) = result else {
        panic!("Expected deployment to succeed");
    };

    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].is_deployment());
    assert!(!sent[0].calldata.is_empty());

    let notification = rx.recv().await.unwrap();
    assert_eq!(notification.operation, Operation::Deploy);
    assert_eq!(notification.message, format!("Contract deployed at: {DEPLOYED}"));

    let reported = notification.message.trim_start_matches("Contract deployed at: ");
    let address = validate_address(reported).unwrap();
    assert_eq!(notification.contract_address, Some(address));
    assert_eq!(response.contract_address, Some(address));
    for fixed in [ZNCT_ADDRESS, PAIR_ADDRESS, NFT_ADDRESS] {
        assert_ne!(address, fixed);
    }
}

#[tokio::test]
async fn test_deploy_with_missing_artifact_should_fail() {
    let wallet = Arc::new(MockWallet::new());
    let provider = wallet.clone() as Arc<dyn WalletProvider>;
    let service = DappService::with_connection(
        ConnectionManager::new(Some(provider), NetworkDescriptor::tea_sepolia()),
        ContractsConfig::default(),
        ArtifactsConfig {
            erc20: "artifacts/missing.bin".into(),
            erc721: "artifacts/missing.bin".into(),
        },
        Notifier::default(),
    );
    service.connect_wallet_impl().await.unwrap();

    let result = service
        .deploy_contract_impl(DeployContractRequest {
            contract_type: "erc20".to_string(),
        })
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidBytecode(_))));
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_bundled_erc20_artifact_is_rejected() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let result = service
        .deploy_contract_impl(DeployContractRequest {
            contract_type: "erc20".to_string(),
        })
        .await;

    let Err(ServiceError::InvalidBytecode(reason)) = result else {
        panic!("Expected the bundled ERC-20 artifact to be rejected, got {result:?}");
    };
    assert!(reason.starts_with("Not valid hex"));
    assert!(wallet.requests().is_empty());
}

#[tokio::test]
async fn test_bundled_artifacts_load() {
    let artifacts = ArtifactsConfig::default();

    let nft = load_bytecode(&artifacts.erc721).await.unwrap();
    assert_eq!(&nft[..4], &[0x60, 0x80, 0x60, 0x40]);

    assert!(matches!(
        load_bytecode(&artifacts.erc20).await,
        Err(ServiceError::InvalidBytecode(_))
    ));
}

#[test]
fn test_decode_bytecode() {
    assert_eq!(
        decode_bytecode("0x6080604052\n").unwrap(),
        Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52])
    );
    assert!(matches!(decode_bytecode("0x60zz"), Err(ServiceError::InvalidBytecode(_))));
    assert!(matches!(decode_bytecode("0x"), Err(ServiceError::InvalidBytecode(_))));
}

// --- queries ---

#[tokio::test]
async fn test_znct_balance_defaults_to_session_account() {
    let balance = U256::from_str("1500000000000000000").unwrap();
    let wallet = Arc::new(MockWallet::new().with_call_result(balance.abi_encode()));
    let service = connected_service(&wallet).await;

    let response = service
        .znct_balance_impl(BalanceRequest { owner: None })
        .await
        .unwrap();

    assert_eq!(response.value, "1500000000000000000");
    assert_eq!(response.formatted, "1.5");
    assert_eq!(response.symbol.as_deref(), Some("ZNCT"));
    assert_eq!(wallet.requests(), vec!["eth_call:balanceOf".to_string()]);
}

#[tokio::test]
async fn test_znct_balance_rejects_bad_owner() {
    let wallet = Arc::new(MockWallet::new());
    let service = connected_service(&wallet).await;

    let result = service
        .znct_balance_impl(BalanceRequest {
            owner: Some("0x1234".to_string()),
        })
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidAddress(_))));
}

#[tokio::test]
async fn test_nft_token_uri_should_work() {
    let wallet = Arc::new(
        MockWallet::new().with_call_result("ipfs://tea/7.json".to_string().abi_encode()),
    );
    let service = connected_service(&wallet).await;

    let response = service
        .nft_token_uri_impl(TokenUriRequest {
            token_id: "7".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.value, "ipfs://tea/7.json");
}

#[tokio::test]
async fn test_quote_swap_should_work() {
    let tea_out = U256::from_str("500000000000000000").unwrap();
    let wallet = Arc::new(MockWallet::new().with_call_result(tea_out.abi_encode()));
    let service = connected_service(&wallet).await;

    let response = service
        .quote_swap_impl(QuoteSwapRequest {
            amount: "2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.formatted, "0.5");
    assert_eq!(response.symbol.as_deref(), Some("TEA"));
    assert_eq!(response.rate.as_deref(), Some("0.25"));
}

#[tokio::test]
async fn test_undecodable_read_should_fail() {
    let wallet = Arc::new(MockWallet::new().with_call_result(Bytes::new()));
    let service = connected_service(&wallet).await;

    let result = service
        .quote_swap_impl(QuoteSwapRequest {
            amount: "2".to_string(),
        })
        .await;

    let Err(ServiceError::Unknown(message)) = result else {
        panic!("Expected a decode failure, got {result:?}");
    };
    assert!(message.starts_with("Decode error: getETHAmount(uint256) returned 0x:"));
}
