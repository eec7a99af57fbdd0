//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::StreamExt;

use crate::{
    infrastructure::transport::{WebSocketFrameReader, WebSocketFrameWriter},
    ui::state::AppState,
    usecase::run_session,
};

/// Upgrade the request and hand the socket to a relay session.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    run_session(
        state.registry.clone(),
        WebSocketFrameReader::new(receiver),
        WebSocketFrameWriter::new(sender),
    )
    .await;
}
