//! Decides whether a chat message is a dnd5e damage roll.

use crate::foundry::ChatMessage;

const ROLL_MESSAGE_TYPE: &str = "roll";
const DAMAGE_ROLL_TYPE: &str = "damage";

/// A message that passed qualification, with the fields later stages need
#[derive(Debug, Clone, Copy)]
pub struct DamageRollMessage<'a> {
    pub message: &'a ChatMessage,
    /// Source item UUID, when the roll came from an item
    pub item_uuid: Option<&'a str>,
}

impl<'a> DamageRollMessage<'a> {
    /// Returns `None` unless the dnd5e flags mark this as a damage roll card.
    /// Any missing flag disqualifies.
    pub fn qualify(message: &'a ChatMessage) -> Option<Self> {
        let dnd5e = message.dnd5e()?;
        if dnd5e.message_type.as_deref() != Some(ROLL_MESSAGE_TYPE) {
            return None;
        }
        let roll_type = dnd5e.roll.as_ref()?.roll_type.as_deref();
        if roll_type != Some(DAMAGE_ROLL_TYPE) {
            return None;
        }

        Some(Self {
            message,
            item_uuid: message.item_uuid(),
        })
    }
}
