//! Builders shared by the reroll tests.

use std::collections::HashMap;

use crate::foundry::chat::{Dnd5eFlags, MessageFlags, RollFlags};
use crate::foundry::{
    Actor, ChatMessage, DieResult, DieTerm, Roll, RollTerm, Scene, Speaker, Token, UserContext,
    WorldSnapshot,
};

pub fn die(faces: u32, results: &[(f64, bool)]) -> RollTerm {
    RollTerm::Die(DieTerm {
        number: Some(results.len() as u32),
        faces: Some(faces),
        results: results
            .iter()
            .map(|(value, active)| DieResult {
                result: serde_json::json!(value),
                active: Some(*active),
            })
            .collect(),
    })
}

pub fn roll(formula: &str, terms: Vec<RollTerm>) -> Roll {
    Roll {
        formula: formula.to_string(),
        terms,
        data: serde_json::json!({"mod": 3, "scale": {"barbarian": {"die": "d12"}}}),
    }
}

pub fn message_with_flags(flags: serde_json::Value) -> ChatMessage {
    ChatMessage {
        id: "msg".to_string(),
        flags: serde_json::from_value(flags).unwrap(),
        ..Default::default()
    }
}

pub fn damage_message(id: &str, rolls: Vec<Roll>) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        flags: MessageFlags {
            dnd5e: Some(Dnd5eFlags {
                message_type: Some("roll".to_string()),
                roll: Some(RollFlags {
                    roll_type: Some("damage".to_string()),
                }),
                item: None,
            }),
        },
        speaker: Speaker {
            actor: Some("ABC123".to_string()),
            alias: Some("Rue".to_string()),
            ..Default::default()
        },
        rolls,
        flavor: Some("Greataxe - Damage Roll".to_string()),
    }
}

/// A damage message for Rue with a single low d12 roll
pub fn low_d12_message() -> ChatMessage {
    damage_message(
        "msg1",
        vec![roll(
            "1d12 + 2d8 + 3",
            vec![die(12, &[(2.0, true)]), die(8, &[(5.0, true), (6.0, true)])],
        )],
    )
}

pub fn actor(id: &str, name: &str, owner: &str) -> Actor {
    Actor {
        id: id.to_string(),
        name: name.to_string(),
        ownership: HashMap::from([(owner.to_string(), 3), ("default".to_string(), 0)]),
    }
}

pub fn player(id: &str) -> UserContext {
    UserContext {
        user_id: id.to_string(),
        user_name: format!("{id} name"),
        role: 1,
    }
}

pub fn gm(id: &str) -> UserContext {
    UserContext {
        user_id: id.to_string(),
        user_name: "Gamemaster".to_string(),
        role: 4,
    }
}

/// Rue (owned by `user1`) in the directory, plus a scene with an unlinked token
pub fn world() -> WorldSnapshot {
    WorldSnapshot {
        actors: vec![actor("ABC123", "Rue", "user1"), actor("DEF456", "Brakka", "user2")],
        scenes: vec![
            Scene {
                id: "scene1".to_string(),
                tokens: vec![Token {
                    id: "tok1".to_string(),
                    actor: Some(actor("synthetic1", "Rue", "user1")),
                }],
            },
            Scene {
                id: "scene2".to_string(),
                tokens: vec![Token {
                    id: "tok2".to_string(),
                    actor: Some(actor("synthetic2", "Goblin", "gm")),
                }],
            },
        ],
        active_scene_id: Some("scene2".to_string()),
    }
}
