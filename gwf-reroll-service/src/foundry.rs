//! Typed views of the Foundry VTT documents the client module forwards.
//!
//! These are read-only snapshots deserialized at the WebSocket boundary.
//! Only the fields the reroll pipeline reads are modeled; everything else in
//! the host's JSON is ignored.

pub mod chat;
pub mod roll;
pub mod world;

pub use chat::{ChatMessage, Speaker};
pub use roll::{DieResult, DieTerm, EvaluatedRoll, Roll, RollTerm};
pub use world::{Actor, OwnershipLevel, Scene, Token, UserContext, WorldDirectory, WorldSnapshot};
