use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use landtrack_core::store::{ChangeSource, Collection, StoreEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The subscription is taken before the upgrade completes so no change made
/// after the handshake is missed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let events = state.store.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, events))
}

/// Whether an event is forwarded to browsers. User changes stay private.
pub(crate) fn is_public(event: &StoreEvent) -> bool {
    matches!(event.collection, Collection::Jobs | Collection::Settings)
}

/// Manage a single WebSocket connection after upgrade.
///
/// A spawned sender task forwards store events to the sink while the current
/// task drains inbound frames until the client closes.
async fn handle_socket(socket: WebSocket, mut events: Receiver<StoreEvent>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward store events to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(conn_id = %sender_conn_id, skipped, "Change feed lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if !is_public(&event) {
                continue;
            }
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode store event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: inbound frames carry nothing; wait for close.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

#[cfg(test)]
mod tests {
    use landtrack_core::store::ChangeAction;

    use super::*;

    #[test]
    fn user_events_are_not_forwarded() {
        assert!(is_public(&StoreEvent::record(
            Collection::Jobs,
            ChangeAction::Created,
            1
        )));
        assert!(is_public(&StoreEvent::setting("workflows")));
        assert!(!is_public(&StoreEvent::record(
            Collection::Users,
            ChangeAction::Updated,
            1
        )));
    }
}
