//! Reroll pipeline collaborators backed by a client WebSocket session.

use crate::error::RerollError;
use crate::foundry::EvaluatedRoll;
use crate::reroll::dispatch::RerollMessage;
use crate::reroll::{ChatSurface, ControlHandle, RerollHost, RerollOffer};
use crate::websocket::{ServerMessage, WebSocketManager};

use super::RerollService;
use super::host_requests::new_request_id;

/// The roll engine and chat log of one connected client
pub(crate) struct SessionHost<'a> {
    service: &'a RerollService,
    session_id: &'a str,
}

impl<'a> SessionHost<'a> {
    pub(crate) fn new(service: &'a RerollService, session_id: &'a str) -> Self {
        Self {
            service,
            session_id,
        }
    }
}

impl RerollHost for SessionHost<'_> {
    async fn evaluate_roll(
        &self,
        formula: &str,
        data: &serde_json::Value,
    ) -> Result<EvaluatedRoll, RerollError> {
        let request_id = new_request_id();
        let msg = ServerMessage::EvaluateRoll {
            request_id: request_id.clone(),
            formula: formula.to_string(),
            data: data.clone(),
        };

        match self.service.request_host(self.session_id, request_id, msg).await? {
            Ok(roll) => Ok(EvaluatedRoll(roll)),
            Err(message) => Err(RerollError::Evaluation {
                formula: formula.to_string(),
                message,
            }),
        }
    }

    async fn publish_message(&self, message: RerollMessage) -> Result<String, RerollError> {
        let request_id = new_request_id();
        let msg = ServerMessage::PublishMessage {
            request_id: request_id.clone(),
            roll: message.roll,
            speaker: message.speaker,
            flavor: message.flavor,
            flags: message.flags,
        };

        match self
            .service
            .request_host(self.session_id, request_id.clone(), msg)
            .await?
        {
            Ok(serde_json::Value::String(message_id)) => Ok(message_id),
            Ok(other) => Err(RerollError::InvalidReply {
                request_id,
                message: format!("expected a message id, got {}", other),
            }),
            Err(message) => Err(RerollError::Publication { message }),
        }
    }

    fn notify_error(&self, message: &str) {
        self.service.ws_manager.send_to(
            self.session_id,
            ServerMessage::Notify {
                level: "error".to_string(),
                message: message.to_string(),
            },
        );
    }
}

/// The reroll control on one chat card in a client's chat log
pub(crate) struct SessionControl<'a> {
    ws_manager: &'a WebSocketManager,
    session_id: &'a str,
    message_id: &'a str,
}

impl<'a> SessionControl<'a> {
    pub(crate) fn new(ws_manager: &'a WebSocketManager, session_id: &'a str, message_id: &'a str) -> Self {
        Self {
            ws_manager,
            session_id,
            message_id,
        }
    }
}

impl ControlHandle for SessionControl<'_> {
    fn set_disabled(&self, disabled: bool) {
        self.ws_manager.send_to(
            self.session_id,
            ServerMessage::SetControlState {
                message_id: self.message_id.to_string(),
                disabled,
            },
        );
    }
}

/// A chat card as just rendered by a client
pub(crate) struct RenderedCard<'a> {
    ws_manager: &'a WebSocketManager,
    session_id: &'a str,
    has_control: bool,
}

impl<'a> RenderedCard<'a> {
    pub(crate) fn new(ws_manager: &'a WebSocketManager, session_id: &'a str, has_control: bool) -> Self {
        Self {
            ws_manager,
            session_id,
            has_control,
        }
    }
}

impl ChatSurface for RenderedCard<'_> {
    fn has_reroll_control(&self) -> bool {
        self.has_control
    }

    fn attach_reroll_control(&mut self, offer: &RerollOffer) {
        self.has_control = self.ws_manager.send_to(
            self.session_id,
            ServerMessage::AttachRerollControl {
                message_id: offer.message_id.clone(),
                roll_index: offer.roll_index,
                label: offer.label.clone(),
            },
        );
    }
}
