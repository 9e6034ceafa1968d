mod host_bridge;
mod host_requests;

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::foundry::{ChatMessage, UserContext, WorldSnapshot};
use crate::i18n::I18n;
use crate::reroll::{
    DispatchOutcome, FormulaRewriter, RenderAdvisor, RerollDispatcher, RerollRequest,
};
use crate::websocket::WebSocketManager;

use host_bridge::{RenderedCard, SessionControl, SessionHost};
use host_requests::PendingRequest;

/// Main service coordinator
///
/// Owns the configured reroll pipeline and routes host round trips through
/// the WebSocket connection that triggered them.
pub struct RerollService {
    pub config: StaticConfig,
    pub i18n: Arc<I18n>,
    pub ws_manager: Arc<WebSocketManager>,
    advisor: RenderAdvisor,
    dispatcher: RerollDispatcher,
    /// Outstanding host requests, keyed by request id
    pending_requests: DashMap<String, PendingRequest>,
}

impl RerollService {
    /// Create a new service instance
    pub fn new(config: StaticConfig) -> ServiceResult<Self> {
        config.validate()?;

        let i18n = Arc::new(I18n::new());
        if let Some(dir) = &config.i18n.locales_dir {
            let loaded = i18n
                .load_dir(dir)
                .map_err(|message| ServiceError::Config { message })?;
            info!(locales_dir = %dir.display(), locales = ?loaded, "Loaded translations");
        }

        let rule = config.house_rule.clone();
        let locale = config.i18n.locale.clone();
        if !i18n.has_locale(&locale) {
            warn!(locale = %locale, "No translations for configured locale, using English");
        }

        let advisor = RenderAdvisor::new(&rule, &i18n, &locale);
        let rewriter = FormulaRewriter::new(&rule)?;
        let dispatcher = RerollDispatcher::new(rule.clone(), rewriter, i18n.clone(), locale);

        info!(
            actor_name = %rule.actor_name,
            die_faces = rule.die_faces,
            low_threshold = rule.low_threshold,
            "Reroll house rule configured"
        );

        Ok(Self {
            config,
            i18n,
            ws_manager: Arc::new(WebSocketManager::new()),
            advisor,
            dispatcher,
            pending_requests: DashMap::new(),
        })
    }

    pub fn locale(&self) -> &str {
        &self.config.i18n.locale
    }

    /// Run the render pipeline for a message rendered on `session_id`'s
    /// client. Returns whether a control was attached.
    pub fn handle_render(
        &self,
        session_id: &str,
        user: &UserContext,
        message: &ChatMessage,
        world: &WorldSnapshot,
        has_reroll_control: bool,
    ) -> bool {
        let mut card = RenderedCard::new(&self.ws_manager, session_id, has_reroll_control);
        self.advisor.handle_render(message, world, user, &mut card)
    }

    /// Whether `user` would have been offered the control for `roll_index`
    /// on `message`. Clicks go through the same gates as rendering.
    pub fn reroll_permitted(
        &self,
        user: &UserContext,
        message: &ChatMessage,
        world: &WorldSnapshot,
        roll_index: usize,
    ) -> bool {
        match self.advisor.offer_for(message, world, user) {
            Some(offer) if offer.roll_index == roll_index => true,
            offer => {
                debug!(
                    message_id = %message.id,
                    user_id = %user.user_id,
                    requested = roll_index,
                    offered = ?offer.map(|o| o.roll_index),
                    "Reroll not permitted"
                );
                false
            }
        }
    }

    /// Dispatch a reroll on its own task
    pub fn spawn_reroll(self: &Arc<Self>, session_id: String, request: RerollRequest) {
        let service = self.clone();
        tokio::spawn(async move {
            service.reroll(&session_id, &request).await;
        });
    }

    /// Carry out a reroll against the client on `session_id`
    pub async fn reroll(&self, session_id: &str, request: &RerollRequest) -> DispatchOutcome {
        let host = SessionHost::new(self, session_id);
        let control = SessionControl::new(&self.ws_manager, session_id, &request.message.id);
        self.dispatcher.dispatch(&host, &control, request).await
    }
}
