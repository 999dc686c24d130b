/*!
 * WebSocket front end.
 *
 * `GET /ws` upgrades to a caption session: every text frame is one inbound
 * message, replies are sent as JSON text frames. `GET /health` answers a
 * constant liveness document.
 */

use axum::{
    Router,
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::{IntoResponse, Json},
    routing::get,
};
use futures_util::{Sink, SinkExt, StreamExt, future};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::app_config::ServerConfig;
use crate::errors::AppError;
use crate::language_utils::SupportedTargets;
use crate::session::{OutboundMessage, SessionCoordinator};
use crate::translation::TranslationPool;

/// How long replies already produced may take to reach a closing client
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// State shared by every connection
#[derive(Debug, Clone)]
pub struct AppState {
    pub targets: Arc<SupportedTargets>,
    pub pool: TranslationPool,
    pub max_message_bytes: usize,
    pub max_pending_chunks: usize,
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/ws", get(handle_caption_ws))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    serve_listener(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` completes.
///
/// On shutdown the translation pool is closed first, so sessions still
/// connected stop starting translations while the server winds down.
pub async fn serve_listener<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Listening on ws://{}/ws", listener.local_addr()?);

    let pool = state.pool.clone();
    let shutdown = async move {
        shutdown.await;
        info!("Shutting down, no new translations will start");
        pool.close();
    };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C, serving until killed: {}", e);
        std::future::pending::<()>().await;
    }
}

/// GET /health
pub async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// GET /ws: WebSocket upgrade for one caption session
async fn handle_caption_ws(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.max_message_size(state.max_message_bytes)
        .on_upgrade(move |socket| handle_caption_connection(socket, state))
}

/// Bridge one socket to a `SessionCoordinator`
async fn handle_caption_connection(socket: WebSocket, state: AppState) {
    let (ws_sender, ws_receiver) = socket.split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<OutboundMessage>();

    let mut writer = tokio::spawn(write_replies(outbound_rx, ws_sender));

    // A close frame ends the session like the end of the stream does
    let inbound = Box::pin(
        ws_receiver
            .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
            .filter_map(|msg| {
                future::ready(match msg {
                    Ok(Message::Text(text)) => Some(Ok(text.as_str().to_string())),
                    Ok(other) => {
                        debug!("Ignoring non-text frame: {:?}", other);
                        None
                    }
                    Err(e) => Some(Err(e)),
                })
            }),
    );

    let mut session = SessionCoordinator::new(Arc::clone(&state.targets), state.pool.clone())
        .with_max_pending_chunks(state.max_pending_chunks);
    if let Err(e) = session.run(inbound, outbound_tx).await {
        warn!("Session {} torn down: {}", session.id(), e);
    }

    // The outbound sender was consumed by the session; flush what is left
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await.is_err() {
        debug!("Session {}: client not reading, dropping unsent replies", session.id());
        writer.abort();
    }
}

/// Send replies as text frames until every sender is gone, then close the sink
async fn write_replies<S>(mut outbound_rx: mpsc::UnboundedReceiver<OutboundMessage>, mut sink: S)
where
    S: Sink<Message> + Unpin,
{
    while let Some(message) = outbound_rx.recv().await {
        if sink.send(Message::Text(message.to_json().into())).await.is_err() {
            return;
        }
    }
    let _ = sink.close().await;
}
