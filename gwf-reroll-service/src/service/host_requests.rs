//! Request/reply round trips to a connected client module.

use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::RerollError;
use crate::websocket::ServerMessage;

use super::RerollService;

/// What the client answered: a payload, or the error it reported
pub type HostReply = Result<serde_json::Value, String>;

pub(crate) struct PendingRequest {
    session_id: String,
    tx: oneshot::Sender<HostReply>,
}

pub(crate) fn new_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

impl RerollService {
    /// Send `msg` to the client on `session_id` and wait for its reply.
    ///
    /// No timeout is applied; the wait ends when the client replies or the
    /// connection closes.
    pub(crate) async fn request_host(
        &self,
        session_id: &str,
        request_id: String,
        msg: ServerMessage,
    ) -> Result<HostReply, RerollError> {
        let (tx, rx) = oneshot::channel();
        self.pending_requests.insert(
            request_id.clone(),
            PendingRequest {
                session_id: session_id.to_string(),
                tx,
            },
        );

        if !self.ws_manager.send_to(session_id, msg) {
            self.pending_requests.remove(&request_id);
            return Err(RerollError::NoConnection {
                session_id: session_id.to_string(),
            });
        }

        debug!(request_id = %request_id, session_id = %session_id, "Waiting for host reply");
        rx.await.map_err(|_| {
            warn!(request_id = %request_id, "Host request channel closed");
            self.pending_requests.remove(&request_id);
            RerollError::HostDisconnected { request_id }
        })
    }

    /// Deliver a client's reply to the request waiting on it
    pub fn resolve_request(&self, request_id: &str, reply: HostReply) {
        if let Some((_, pending)) = self.pending_requests.remove(request_id) {
            if pending.tx.send(reply).is_err() {
                debug!(request_id = %request_id, "Host reply receiver already gone");
            }
        } else {
            warn!(request_id = %request_id, "No pending host request for reply");
        }
    }

    /// Fail every request still waiting on `session_id`
    pub fn drop_pending_requests(&self, session_id: &str) {
        self.pending_requests
            .retain(|_, pending| pending.session_id != session_id);
    }

    #[cfg(test)]
    pub fn pending_request_count(&self) -> usize {
        self.pending_requests.len()
    }
}
