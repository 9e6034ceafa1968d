//! Decides whether a rendered chat card gets the reroll control.

use serde::Serialize;
use tracing::debug;

use crate::config::HouseRuleConfig;
use crate::foundry::{ChatMessage, OwnershipLevel, UserContext, WorldDirectory};
use crate::i18n::I18n;

use super::actor::resolve_actor;
use super::inspector::RollInspector;
use super::qualifier::DamageRollMessage;

/// The rendered card a control can be appended to
pub trait ChatSurface {
    fn has_reroll_control(&self) -> bool;

    fn attach_reroll_control(&mut self, offer: &RerollOffer);
}

/// A control to show on one message, bound to one of its rolls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RerollOffer {
    pub message_id: String,
    pub roll_index: usize,
    pub label: String,
}

pub struct RenderAdvisor {
    actor_name: String,
    inspector: RollInspector,
    label: String,
}

impl RenderAdvisor {
    pub fn new(rule: &HouseRuleConfig, i18n: &I18n, locale: &str) -> Self {
        let faces = rule.die_faces.to_string();
        let low = rule.low_threshold.to_string();
        let label = i18n.format(
            locale,
            "reroll-button-label",
            &[("faces", faces.as_str()), ("low", low.as_str())],
        );

        Self {
            actor_name: rule.actor_name.clone(),
            inspector: RollInspector::new(rule),
            label,
        }
    }

    /// The offer for `message` as seen by `user`, or `None` when any gate
    /// fails: not a damage roll, no resolvable actor, not the configured
    /// character, user doesn't own it or is a GM, or no low die result.
    pub fn offer_for<W: WorldDirectory>(
        &self,
        message: &ChatMessage,
        world: &W,
        user: &UserContext,
    ) -> Option<RerollOffer> {
        let damage = DamageRollMessage::qualify(message)?;
        let actor = resolve_actor(damage, world)?;

        let is_target = actor.name == self.actor_name
            || message.speaker.alias.as_deref() == Some(self.actor_name.as_str());
        if !is_target {
            return None;
        }

        if !actor.test_user_permission(user, OwnershipLevel::Owner) || user.is_gm() {
            debug!(
                message_id = %message.id,
                user_id = %user.user_id,
                "User may not reroll for this actor"
            );
            return None;
        }

        let roll_index = self.inspector.find_target(&message.rolls)?;
        Some(RerollOffer {
            message_id: message.id.clone(),
            roll_index,
            label: self.label.clone(),
        })
    }

    /// Attach the control to `surface` when the message qualifies and the
    /// surface doesn't already carry one. Returns whether a control was attached.
    pub fn handle_render<W: WorldDirectory, S: ChatSurface>(
        &self,
        message: &ChatMessage,
        world: &W,
        user: &UserContext,
        surface: &mut S,
    ) -> bool {
        let Some(offer) = self.offer_for(message, world, user) else {
            return false;
        };

        if surface.has_reroll_control() {
            debug!(message_id = %message.id, "Reroll control already present");
            return false;
        }

        debug!(
            message_id = %offer.message_id,
            roll_index = offer.roll_index,
            "Attaching reroll control"
        );
        surface.attach_reroll_control(&offer);
        true
    }
}
