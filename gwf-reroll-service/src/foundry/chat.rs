//! Chat message snapshot and its dnd5e flags.

use serde::{Deserialize, Serialize};

use super::roll::Roll;

/// A rendered chat message as forwarded by the client module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub flags: MessageFlags,

    #[serde(default)]
    pub speaker: Speaker,

    #[serde(default)]
    pub rolls: Vec<Roll>,

    #[serde(default)]
    pub flavor: Option<String>,
}

/// Who a message is attributed to (`ChatMessage#speaker`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default)]
    pub scene: Option<String>,

    #[serde(default)]
    pub actor: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub alias: Option<String>,
}

/// Message flags; only the dnd5e scope is read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageFlags {
    #[serde(default)]
    pub dnd5e: Option<Dnd5eFlags>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dnd5eFlags {
    /// `"roll"` for dice roll cards, `"usage"` for item cards, etc.
    #[serde(default)]
    pub message_type: Option<String>,

    #[serde(default)]
    pub roll: Option<RollFlags>,

    #[serde(default)]
    pub item: Option<ItemFlags>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollFlags {
    /// Semantic roll category: `"attack"`, `"damage"`, `"healing"`, ...
    #[serde(default, rename = "type")]
    pub roll_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFlags {
    /// e.g. `Actor.Nrh2UoJky0POpiu9.Item.fy0oagBB9SLops4F`
    #[serde(default)]
    pub uuid: Option<String>,
}

impl ChatMessage {
    pub fn dnd5e(&self) -> Option<&Dnd5eFlags> {
        self.flags.dnd5e.as_ref()
    }

    /// The source item UUID recorded by dnd5e, if any
    pub fn item_uuid(&self) -> Option<&str> {
        self.dnd5e()?.item.as_ref()?.uuid.as_deref()
    }
}
