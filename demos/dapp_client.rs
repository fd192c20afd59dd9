use rmcp::ServiceExt;
use rmcp::model::{CallToolRequestParam, ClientCapabilities, ClientInfo, Implementation};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::SseClientTransport;
use serde::Serialize;
use tea_dapp::config::Config;
use tea_dapp::{BalanceRequest, MintNftRequest, QuoteSwapRequest, SwapRequest, TransferRequest};

/// Recipient used by the transfer step
const RECIPIENT: &str = "0x27cf5cdb6c4cad6ba1d16c0d11d3d4e3d64bc158";

/// Walks through the dapp tools over the SSE transport:
/// connect the wallet, read balances and quotes, then transfer, swap and mint.
///
/// Requires the server to run with a wallet endpoint (e.g. Frame) configured.
#[tokio::main]
async fn main() {
    let config = Config::from_yaml("config/default.yaml")
        .await
        .expect("failed to load configuration");
    let uri = format!("http://localhost:{}/dapp/sse", config.server.port);

    let transport = SseClientTransport::start(uri.as_str())
        .await
        .expect("Failed to start SSE client transport");

    let client_info = ClientInfo {
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "tea-dapp-client".to_string(),
            version: "0.1.0".to_string(),
            ..Default::default()
        },
    };

    let client = client_info
        .serve(transport)
        .await
        .inspect_err(|e| {
            eprintln!("client error: {e:?}");
        })
        .expect("Failed to serve client");

    println!("✓ Connected to MCP server at {}\n", uri);

    println!("=== Listing available tools ===");
    let tools_response = client.list_tools(None).await.expect("failed to list tools");
    for tool in &tools_response.tools {
        let desc = tool
            .description
            .as_ref()
            .map(|s| s.as_ref())
            .unwrap_or("No description");

        println!("  - {}: {}", tool.name, desc);
    }
    println!();

    // Every action before this one fails with "Please connect wallet"
    call(&client, "connect_wallet", None::<&()>).await;
    call(&client, "wallet_status", None::<&()>).await;

    call(&client, "znct_balance", Some(&BalanceRequest { owner: None })).await;
    call(
        &client,
        "quote_swap",
        Some(&QuoteSwapRequest {
            amount: "10".to_string(),
        }),
    )
    .await;

    call(
        &client,
        "transfer_znct",
        Some(&TransferRequest {
            recipient: RECIPIENT.to_string(),
            amount: "1.5".to_string(),
        }),
    )
    .await;

    call(
        &client,
        "swap_znct_for_tea",
        Some(&SwapRequest {
            amount: "10".to_string(),
        }),
    )
    .await;

    call(
        &client,
        "mint_nft",
        Some(&MintNftRequest {
            token_uri: "ipfs://bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi"
                .to_string(),
        }),
    )
    .await;

    println!("=== All operations completed ===");
}

async fn call<T: Serialize>(
    client: &RunningService<RoleClient, ClientInfo>,
    tool: &'static str,
    request: Option<&T>,
) {
    println!("=== Calling {tool} ===");

    let arguments = request.and_then(|request| {
        serde_json::to_value(request)
            .expect("failed to serialize request")
            .as_object()
            .cloned()
    });

    let result = client
        .call_tool(CallToolRequestParam {
            name: tool.into(),
            arguments,
        })
        .await
        .unwrap_or_else(|e| panic!("failed to call `{tool}`: {e}"));

    println!("{}\n", serde_json::to_string_pretty(&result).unwrap());
}
