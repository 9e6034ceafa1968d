//! WebSocket connection manager.
//!
//! Handles connection lifecycle, authentication, and state tracking
//! for all active WebSocket connections.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::foundry::UserContext;

use super::messages::ServerMessage;

/// State for a single WebSocket connection
pub(crate) struct ConnectionState {
    pub(crate) user: Option<UserContext>,
    pub(crate) tx: mpsc::UnboundedSender<ServerMessage>,
}

/// Manager for all WebSocket connections
pub struct WebSocketManager {
    pub(crate) connections: DashMap<String, ConnectionState>,
}

impl Default for WebSocketManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSocketManager {
    /// Create a new WebSocket manager
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Add a new connection
    pub(crate) fn add_connection(
        &self,
        session_id: String,
        tx: mpsc::UnboundedSender<ServerMessage>,
    ) {
        debug!(session_id = %session_id, "Adding WebSocket connection");
        self.connections
            .insert(session_id, ConnectionState { user: None, tx });
    }

    /// Remove a connection
    pub(crate) fn remove_connection(&self, session_id: &str) {
        debug!(session_id = %session_id, "Removing WebSocket connection");
        self.connections.remove(session_id);
    }

    /// Authenticate a connection
    pub(crate) fn authenticate(&self, session_id: &str, user: UserContext) -> bool {
        if let Some(mut conn) = self.connections.get_mut(session_id) {
            conn.user = Some(user);
            true
        } else {
            false
        }
    }

    /// The authenticated user of a session
    pub fn user(&self, session_id: &str) -> Option<UserContext> {
        self.connections
            .get(session_id)
            .and_then(|conn| conn.user.clone())
    }

    /// Send a message to a specific connection.
    ///
    /// Returns false when the connection is gone.
    pub fn send_to(&self, session_id: &str, msg: ServerMessage) -> bool {
        match self.connections.get(session_id) {
            Some(conn) if conn.tx.send(msg).is_ok() => true,
            _ => {
                tracing::warn!(session_id = %session_id, "Failed to send message to connection");
                false
            }
        }
    }

    /// Get the number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
