use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use rmcp::transport::SseServer;
use rmcp::transport::sse_server::SseServerConfig;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::middleware::trace::http_trace_layer;
use crate::service::{DappService, NotificationKind, Notifier};

pub fn build_app(cancellation_token: CancellationToken, config: Config) -> anyhow::Result<Router> {
    let addr = config.server_uri().parse()?;

    let sse_config = SseServerConfig {
        bind: addr,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: cancellation_token.clone(),
        sse_keep_alive: Some(Duration::from_secs(15)),
    };

    let (sse_server, sse_router) = SseServer::new(sse_config);

    let notifier = Notifier::default();
    spawn_notification_log(&notifier, cancellation_token);

    // One service, and so one wallet session, per connected client
    let dapp_service = move || DappService::new(&config, notifier.clone());

    sse_server.with_service(dapp_service);

    let app = Router::new()
        .route("/health", get(|| async move { StatusCode::OK }))
        .nest("/dapp", sse_router)
        .layer(http_trace_layer());

    Ok(app)
}

/// Logs every action outcome until shutdown.
fn spawn_notification_log(notifier: &Notifier, cancellation_token: CancellationToken) {
    let mut rx = notifier.subscribe();

    tokio::spawn(async move {
        loop {
            let notification = tokio::select! {
                _ = cancellation_token.cancelled() => break,
                received = rx.recv() => received,
            };

            match notification {
                Ok(n) if n.kind == NotificationKind::Failure => {
                    tracing::warn!(operation = ?n.operation, "{}", n.message)
                }
                Ok(n) => tracing::info!(operation = ?n.operation, "{}", n.message),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("notification log lagged, skipped {skipped}")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
