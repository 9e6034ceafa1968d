//! WebSocket message handlers.
//!
//! Contains the logic for handling incoming WebSocket connections
//! and processing client messages.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::foundry::UserContext;
use crate::reroll::RerollRequest;
use crate::service::RerollService;

use super::manager::WebSocketManager;
use super::messages::{ClientMessage, ServerMessage};

/// Handle a WebSocket connection
///
/// This function is called when a WebSocket connection is established.
/// It manages the connection lifecycle, processes incoming messages,
/// and forwards outgoing messages.
pub async fn handle_ws_connection(
    socket: WebSocket,
    ws_manager: Arc<WebSocketManager>,
    service: Arc<RerollService>,
) {
    let session_id = uuid::Uuid::new_v4().to_string();
    info!(session_id = %session_id, "New WebSocket connection");

    // Split the socket into sender and receiver
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Create a channel for sending messages to this connection
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Add connection to manager
    ws_manager.add_connection(session_id.clone(), msg_tx);

    // Spawn task to forward messages from channel to WebSocket
    let session_id_clone = session_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to serialize WebSocket message");
                }
            }
        }
        debug!(session_id = %session_id_clone, "WebSocket send task ended");
    });

    // Process incoming messages
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_client_message(&session_id, &text, &ws_manager, &service);
            }
            Ok(Message::Binary(data)) => {
                // Try to parse binary as JSON text
                if let Ok(text) = String::from_utf8(data.to_vec()) {
                    handle_client_message(&session_id, &text, &ws_manager, &service);
                }
            }
            Ok(Message::Ping(data)) => {
                // axum handles pong automatically, but we can log it
                debug!(session_id = %session_id, "Received ping: {:?}", data);
            }
            Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(session_id = %session_id, "WebSocket connection closed by client");
                break;
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Clean up
    ws_manager.remove_connection(&session_id);
    service.drop_pending_requests(&session_id);
    send_task.abort();
    info!(session_id = %session_id, "WebSocket connection closed");
}

/// Handle a client message
///
/// Never waits on the host: clicks are dispatched on their own task so this
/// connection's reader keeps delivering the replies the dispatch awaits.
pub(crate) fn handle_client_message(
    session_id: &str,
    text: &str,
    ws_manager: &Arc<WebSocketManager>,
    service: &Arc<RerollService>,
) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(
                session_id = %session_id,
                error = %e,
                text = %text,
                "Failed to parse client message"
            );
            let error = e.to_string();
            ws_manager.send_to(
                session_id,
                ServerMessage::Error {
                    code: "parse_error".to_string(),
                    message: service.i18n.format(
                        service.locale(),
                        "error-parse",
                        &[("error", error.as_str())],
                    ),
                    recoverable: true,
                },
            );
            return;
        }
    };

    match msg {
        ClientMessage::Auth {
            user_id,
            user_name,
            role,
            session_id: client_session_id,
        } => {
            debug!(
                session_id = %session_id,
                user_id = %user_id,
                user_name = %user_name,
                role = role,
                client_session_id = ?client_session_id,
                "Processing auth message"
            );

            ws_manager.authenticate(
                session_id,
                UserContext {
                    user_id: user_id.clone(),
                    user_name,
                    role,
                },
            );

            ws_manager.send_to(
                session_id,
                ServerMessage::AuthResponse {
                    success: true,
                    session_id: session_id.to_string(),
                    message: None,
                },
            );

            info!(
                session_id = %session_id,
                user_id = %user_id,
                "WebSocket connection authenticated"
            );
        }
        ClientMessage::Ping => {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);

            ws_manager.send_to(session_id, ServerMessage::Pong { timestamp });
        }
        ClientMessage::ChatMessageRendered {
            message,
            world,
            has_reroll_control,
        } => {
            let Some(user) = ws_manager.user(session_id) else {
                warn!(session_id = %session_id, "Ignoring render event from unauthenticated connection");
                return;
            };
            service.handle_render(session_id, &user, &message, &world, has_reroll_control);
        }
        ClientMessage::RerollRequested {
            message,
            roll_index,
            world,
        } => {
            let Some(user) = ws_manager.user(session_id) else {
                warn!(session_id = %session_id, "Ignoring reroll request from unauthenticated connection");
                return;
            };
            if !service.reroll_permitted(&user, &message, &world, roll_index) {
                warn!(
                    session_id = %session_id,
                    user_id = %user.user_id,
                    message_id = %message.id,
                    roll_index = roll_index,
                    "Ignoring reroll request the user was not offered"
                );
                return;
            }
            service.spawn_reroll(
                session_id.to_string(),
                RerollRequest {
                    message,
                    roll_index,
                },
            );
        }
        ClientMessage::RollEvaluated { request_id, roll } => {
            service.resolve_request(&request_id, Ok(roll));
        }
        ClientMessage::MessagePublished {
            request_id,
            message_id,
        } => {
            service.resolve_request(&request_id, Ok(serde_json::Value::String(message_id)));
        }
        ClientMessage::RequestFailed { request_id, error } => {
            debug!(
                session_id = %session_id,
                request_id = %request_id,
                error = %error,
                "Client reported request failure"
            );
            service.resolve_request(&request_id, Err(error));
        }
    }
}
