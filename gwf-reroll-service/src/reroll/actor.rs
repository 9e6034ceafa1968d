//! Finds the actor a chat message belongs to.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::foundry::{Actor, WorldDirectory};

use super::qualifier::DamageRollMessage;

/// `Actor.<actorId>.Item.<itemId>`; embedded items of world actors only
static ITEM_UUID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Actor\.([^.]+)\.Item\.").unwrap());

/// Extract the owning actor id from an item UUID.
///
/// Compendium and token-embedded UUIDs do not match and yield `None`.
pub fn actor_id_from_item_uuid(uuid: &str) -> Option<&str> {
    ITEM_UUID_REGEX
        .captures(uuid)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve the actor that produced a damage roll message.
///
/// The first identifier present decides the strategy: a world item UUID
/// (`Actor.<id>.Item.`), else the speaker's actor id, else the speaker's
/// token in the speaker's scene (or the active scene). Once an identifier is
/// chosen, a failed lookup yields `None` rather than trying the next one.
pub fn resolve_actor<'w, W: WorldDirectory>(
    damage: DamageRollMessage<'_>,
    world: &'w W,
) -> Option<&'w Actor> {
    let message = damage.message;
    if let Some(actor_id) = damage.item_uuid.and_then(actor_id_from_item_uuid) {
        let actor = world.actor(actor_id);
        debug!(
            message_id = %message.id,
            actor_id = %actor_id,
            found = actor.is_some(),
            "Actor lookup from item UUID"
        );
        return actor;
    }

    let speaker = &message.speaker;
    if let Some(actor_id) = speaker.actor.as_deref() {
        let actor = world.actor(actor_id);
        debug!(
            message_id = %message.id,
            actor_id = %actor_id,
            found = actor.is_some(),
            "Actor lookup from speaker"
        );
        return actor;
    }

    let scene = speaker
        .scene
        .as_deref()
        .and_then(|id| world.scene(id))
        .or_else(|| world.active_scene())?;
    let actor = scene.token(speaker.token.as_deref()?)?.actor.as_ref()?;
    debug!(
        message_id = %message.id,
        scene_id = %scene.id,
        actor_id = %actor.id,
        "Actor resolved from speaker token"
    );
    Some(actor)
}
