//! WebSocket transport for the live vitals stream.
//!
//! Clients connect to `/ws/vitals` and receive one JSON reading
//! immediately, then one every emission period. The optional
//! `subject_id` query parameter seeds the stream; without it the
//! connection id seeds it, so every anonymous client still gets a
//! stable, deterministic trajectory for the life of the connection.
//!
//! Each connection owns one emission session; closing the socket tears
//! the session and its state down.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::dto::StreamQuery;
use crate::state::AppState;

/// Buffered readings per connection before delivery back-pressures.
const DELIVERY_BUFFER: usize = 16;

/// WebSocket upgrade handler for `/ws/vitals`.
#[tracing::instrument(skip(state, ws))]
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.subject_id))
}

/// Drive one established WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState, subject_id: Option<String>) {
    let conn_id = Uuid::new_v4().to_string();
    let identity = subject_id.unwrap_or_else(|| conn_id.clone());

    let (tx, mut rx) = mpsc::channel(DELIVERY_BUFFER);
    state.sessions().connect(&conn_id, &identity, tx);
    tracing::info!(
        conn_id = %conn_id,
        identity = %identity,
        clients = state.sessions().connection_count(),
        "client connected"
    );

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            reading = rx.recv() => {
                match reading {
                    Some(reading) => {
                        match serde_json::to_string(&reading) {
                            Ok(json) => {
                                if sender.send(Message::Text(json)).await.is_err() {
                                    break;
                                }
                            }
                            Err(error) => {
                                tracing::error!(%error, "failed to encode reading");
                            }
                        }
                    }
                    // Session torn down from elsewhere.
                    None => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        // Pong handled automatically by axum.
                        tracing::trace!(len = data.len(), "received ping");
                    }
                    Some(Ok(_)) => {
                        // Inbound text/binary frames carry no protocol.
                        tracing::trace!("ignoring inbound frame");
                    }
                    Some(Err(error)) => {
                        tracing::debug!(%error, "websocket receive error");
                        break;
                    }
                }
            }
        }
    }

    state.sessions().disconnect(&conn_id);
    tracing::info!(
        conn_id = %conn_id,
        clients = state.sessions().connection_count(),
        "client disconnected"
    );
}
