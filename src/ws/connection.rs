//! Read/write loop for a single feed connection.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::CatalogEvent;

/// Runs until the client disconnects or the bus closes.
///
/// Client commands adjust the subscription filter; catalog events that
/// pass the filter are forwarded as `event` envelopes.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<CatalogEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs);
                        if let Some(json) = encode(&reply)
                            && ws_tx.send(Message::text(json)).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !subs.matches(event.event_id()) {
                            continue;
                        }
                        tracing::trace!(event_type = event.event_type_str(), "forwarding to ws client");
                        let payload = match serde_json::to_value(&event) {
                            Ok(value) => value,
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to encode catalog event");
                                continue;
                            }
                        };
                        let msg = WsMessage::reply(
                            uuid::Uuid::new_v4().to_string(),
                            WsMessageType::Event,
                            payload,
                        );
                        if let Some(json) = encode(&msg)
                            && ws_tx.send(Message::text(json)).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn encode(msg: &WsMessage) -> Option<String> {
    serde_json::to_string(msg)
        .inspect_err(|e| tracing::warn!(error = %e, "failed to encode ws message"))
        .ok()
}

/// Applies one client message to the filter and builds the reply.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command");
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command");
    };

    match command {
        WsCommand::Subscribe { event_ids } => {
            let added = subs.subscribe(&event_ids);
            WsMessage::reply(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": added,
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::Unsubscribe { event_ids } => {
            subs.unsubscribe(&event_ids);
            WsMessage::reply(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": event_ids,
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
    }
}
