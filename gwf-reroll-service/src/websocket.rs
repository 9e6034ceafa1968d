//! WebSocket bridge to the Foundry client module.
//!
//! The client module forwards chat render events and control clicks; the
//! service answers with control attachments and drives roll evaluation,
//! message publication and notifications through request/reply messages.

pub mod handlers;
pub mod manager;
pub mod messages;

pub use handlers::handle_ws_connection;
pub use manager::WebSocketManager;
pub use messages::{ClientMessage, ServerMessage};
