//! GET /ws -- WebSocket upgrade handler.
//!
//! Authentication happens before the upgrade completes, but a rejection is
//! never turned into an HTTP error: the socket is upgraded and immediately
//! closed with 1008 (policy violation).

use axum::{
    extract::{
        WebSocketUpgrade,
        ws::{CloseFrame, Message as WsMessage, WebSocket, close_code},
    },
    response::IntoResponse,
};

use crate::api::v1::extractors::ConnectionAuth;

pub async fn ws(ConnectionAuth(authorized): ConnectionAuth, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        if authorized {
            echo(socket).await;
        } else {
            reject(socket).await;
        }
    })
}

async fn reject(mut socket: WebSocket) {
    tracing::info!("closing unauthenticated websocket connection");

    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: "unauthorized".into(),
    };
    if let Err(e) = socket.send(WsMessage::Close(Some(frame))).await {
        tracing::debug!("failed to send close frame: {e}");
    }
}

async fn echo(mut socket: WebSocket) {
    while let Some(Ok(msg)) = socket.recv().await {
        let reply = match msg {
            WsMessage::Text(_) | WsMessage::Binary(_) => msg,
            WsMessage::Close(_) => break,
            _ => continue,
        };
        if socket.send(reply).await.is_err() {
            break;
        }
    }
}
