//! Carries out a reroll once the user clicks the control.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::HouseRuleConfig;
use crate::error::RerollError;
use crate::foundry::{ChatMessage, EvaluatedRoll, Speaker};
use crate::i18n::I18n;

use super::formula::FormulaRewriter;

/// The host operations a reroll needs.
///
/// Evaluation and publication are the only points where a dispatch waits.
pub trait RerollHost: Send + Sync {
    /// `new Roll(formula, data).evaluate()`
    fn evaluate_roll(
        &self,
        formula: &str,
        data: &serde_json::Value,
    ) -> impl Future<Output = Result<EvaluatedRoll, RerollError>> + Send;

    /// `roll.toMessage(...)`; returns the new message id
    fn publish_message(
        &self,
        message: RerollMessage,
    ) -> impl Future<Output = Result<String, RerollError>> + Send;

    /// `ui.notifications.error(...)`
    fn notify_error(&self, message: &str);
}

/// The clicked control on the original chat card
pub trait ControlHandle: Send + Sync {
    fn set_disabled(&self, disabled: bool);
}

/// Re-enables the control when dropped, however the dispatch ends
struct ControlGuard<'a, C: ControlHandle> {
    control: &'a C,
}

impl<'a, C: ControlHandle> ControlGuard<'a, C> {
    fn disable(control: &'a C) -> Self {
        control.set_disabled(true);
        Self { control }
    }
}

impl<C: ControlHandle> Drop for ControlGuard<'_, C> {
    fn drop(&mut self) {
        self.control.set_disabled(false);
    }
}

/// A click on the reroll control
#[derive(Debug, Clone)]
pub struct RerollRequest {
    pub message: ChatMessage,
    pub roll_index: usize,
}

/// The chat message to publish for an evaluated reroll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerollMessage {
    pub roll: EvaluatedRoll,
    pub speaker: Speaker,
    pub flavor: String,
    pub flags: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Published { message_id: String },
    /// The message no longer has the roll the control pointed at
    RollMissing,
    Failed(RerollError),
}

pub struct RerollDispatcher {
    rule: HouseRuleConfig,
    rewriter: FormulaRewriter,
    i18n: Arc<I18n>,
    locale: String,
}

impl RerollDispatcher {
    pub fn new(
        rule: HouseRuleConfig,
        rewriter: FormulaRewriter,
        i18n: Arc<I18n>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            rewriter,
            i18n,
            locale: locale.into(),
        }
    }

    /// Disable the control, reroll, publish, and re-enable the control.
    ///
    /// Failures are logged and shown to the user as a single notification;
    /// nothing is published when evaluation or publication fails.
    pub async fn dispatch<H: RerollHost, C: ControlHandle>(
        &self,
        host: &H,
        control: &C,
        request: &RerollRequest,
    ) -> DispatchOutcome {
        let _guard = ControlGuard::disable(control);

        match self.reroll(host, request).await {
            Ok(Some(message_id)) => {
                info!(
                    source_message_id = %request.message.id,
                    message_id = %message_id,
                    "Published GWF reroll"
                );
                DispatchOutcome::Published { message_id }
            }
            Ok(None) => {
                debug!(
                    source_message_id = %request.message.id,
                    roll_index = request.roll_index,
                    "Reroll requested for a roll the message does not have"
                );
                DispatchOutcome::RollMissing
            }
            Err(e) => {
                error!(
                    source_message_id = %request.message.id,
                    code = e.error_code(),
                    error = %e,
                    "GWF reroll failed"
                );
                host.notify_error(&e.user_message(&self.i18n, &self.locale));
                DispatchOutcome::Failed(e)
            }
        }
    }

    async fn reroll<H: RerollHost>(
        &self,
        host: &H,
        request: &RerollRequest,
    ) -> Result<Option<String>, RerollError> {
        let Some(base_roll) = request.message.rolls.get(request.roll_index) else {
            return Ok(None);
        };

        let formula = self.rewriter.rewrite(&base_roll.formula);
        debug!(
            original = %base_roll.formula,
            rewritten = %formula,
            "Evaluating reroll formula"
        );
        let roll = host.evaluate_roll(&formula, &base_roll.data).await?;
        debug!(
            formula = roll.formula().unwrap_or(&formula),
            total = ?roll.total(),
            "Reroll evaluated"
        );

        let message = RerollMessage {
            roll,
            speaker: request.message.speaker.clone(),
            flavor: self.flavor(&request.message),
            flags: self.flags(&request.message),
        };
        let message_id = host.publish_message(message).await?;
        Ok(Some(message_id))
    }

    fn flavor(&self, message: &ChatMessage) -> String {
        let base = message
            .flavor
            .clone()
            .unwrap_or_else(|| self.i18n.get(&self.locale, "reroll-default-flavor", None));
        let faces = self.rule.die_faces.to_string();
        let low = self.rule.low_threshold.to_string();
        let suffix = self.i18n.format(
            &self.locale,
            "reroll-flavor-suffix",
            &[("faces", faces.as_str()), ("low", low.as_str())],
        );
        format!("{} | {}", base, suffix)
    }

    fn flags(&self, message: &ChatMessage) -> serde_json::Value {
        let mut flags = serde_json::Map::new();
        flags.insert(
            self.rule.flag_scope.clone(),
            serde_json::json!({
                "sourceMessageId": message.id,
                "applied": true,
            }),
        );
        serde_json::Value::Object(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reroll::fixtures::low_d12_message;
    use std::sync::Mutex;

    /// Host fake that records every call into a shared event log
    #[derive(Default)]
    struct FakeHost {
        fail_evaluation: bool,
        fail_publication: bool,
        events: Arc<Mutex<Vec<String>>>,
        evaluated: Mutex<Vec<(String, serde_json::Value)>>,
        published: Mutex<Vec<RerollMessage>>,
        notifications: Mutex<Vec<String>>,
    }

    impl RerollHost for FakeHost {
        async fn evaluate_roll(
            &self,
            formula: &str,
            data: &serde_json::Value,
        ) -> Result<EvaluatedRoll, RerollError> {
            self.events.lock().unwrap().push("evaluate".to_string());
            self.evaluated
                .lock()
                .unwrap()
                .push((formula.to_string(), data.clone()));
            if self.fail_evaluation {
                return Err(RerollError::Evaluation {
                    formula: formula.to_string(),
                    message: "unparseable".to_string(),
                });
            }
            Ok(EvaluatedRoll(serde_json::json!({"formula": formula, "total": 11})))
        }

        async fn publish_message(&self, message: RerollMessage) -> Result<String, RerollError> {
            self.events.lock().unwrap().push("publish".to_string());
            if self.fail_publication {
                return Err(RerollError::Publication {
                    message: "socket closed".to_string(),
                });
            }
            self.published.lock().unwrap().push(message);
            Ok("new-msg".to_string())
        }

        fn notify_error(&self, message: &str) {
            self.events.lock().unwrap().push("notify".to_string());
            self.notifications.lock().unwrap().push(message.to_string());
        }
    }

    struct FakeControl {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl ControlHandle for FakeControl {
        fn set_disabled(&self, disabled: bool) {
            let event = if disabled { "disable" } else { "enable" };
            self.events.lock().unwrap().push(event.to_string());
        }
    }

    fn setup(host: FakeHost) -> (RerollDispatcher, FakeHost, FakeControl) {
        let rule = HouseRuleConfig::default();
        let rewriter = FormulaRewriter::new(&rule).unwrap();
        let dispatcher = RerollDispatcher::new(rule, rewriter, Arc::new(I18n::new()), "en");
        let control = FakeControl {
            events: host.events.clone(),
        };
        (dispatcher, host, control)
    }

    fn events(host: &FakeHost) -> Vec<String> {
        host.events.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_successful_reroll() {
        let (dispatcher, host, control) = setup(FakeHost::default());
        let message = low_d12_message();
        let request = RerollRequest {
            message: message.clone(),
            roll_index: 0,
        };

        let outcome = dispatcher.dispatch(&host, &control, &request).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Published {
                message_id: "new-msg".to_string()
            }
        );
        assert_eq!(events(&host), vec!["disable", "evaluate", "publish", "enable"]);

        let evaluated = host.evaluated.lock().unwrap();
        assert_eq!(evaluated[0].0, "1d12ro<=2 + 2d8 + 3");
        assert_eq!(evaluated[0].1, message.rolls[0].data);

        let published = host.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].speaker, message.speaker);
        assert_eq!(
            published[0].flavor,
            "Greataxe - Damage Roll | GWF reroll once on d12 results 1–2"
        );
        assert_eq!(
            published[0].flags,
            serde_json::json!({"gwf-d12-rue": {"sourceMessageId": "msg1", "applied": true}})
        );
        assert_eq!(published[0].roll.formula(), Some("1d12ro<=2 + 2d8 + 3"));
        assert!(host.notifications.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_flavor_uses_default() {
        let (dispatcher, host, control) = setup(FakeHost::default());
        let mut message = low_d12_message();
        message.flavor = None;
        let request = RerollRequest {
            message,
            roll_index: 0,
        };

        dispatcher.dispatch(&host, &control, &request).await;
        assert_eq!(
            host.published.lock().unwrap()[0].flavor,
            "Damage Roll | GWF reroll once on d12 results 1–2"
        );
    }

    #[tokio::test]
    async fn test_evaluation_failure() {
        let (dispatcher, host, control) = setup(FakeHost {
            fail_evaluation: true,
            ..Default::default()
        });
        let request = RerollRequest {
            message: low_d12_message(),
            roll_index: 0,
        };

        let outcome = dispatcher.dispatch(&host, &control, &request).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Failed(RerollError::Evaluation { .. })
        ));
        assert_eq!(events(&host), vec!["disable", "evaluate", "notify", "enable"]);
        assert_eq!(
            *host.notifications.lock().unwrap(),
            vec!["GWF reroll failed. Check console (F12).".to_string()]
        );
        assert!(host.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publication_failure() {
        let (dispatcher, host, control) = setup(FakeHost {
            fail_publication: true,
            ..Default::default()
        });
        let request = RerollRequest {
            message: low_d12_message(),
            roll_index: 0,
        };

        let outcome = dispatcher.dispatch(&host, &control, &request).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Failed(RerollError::Publication { .. })
        ));
        assert_eq!(
            events(&host),
            vec!["disable", "evaluate", "publish", "notify", "enable"]
        );
        assert_eq!(host.notifications.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_roll_is_silent() {
        let (dispatcher, host, control) = setup(FakeHost::default());
        let request = RerollRequest {
            message: low_d12_message(),
            roll_index: 5,
        };

        let outcome = dispatcher.dispatch(&host, &control, &request).await;
        assert_eq!(outcome, DispatchOutcome::RollMissing);
        assert_eq!(events(&host), vec!["disable", "enable"]);
    }

    #[test]
    fn test_repeated_dispatches_are_independent() {
        let (dispatcher, host, control) = setup(FakeHost::default());
        let request = RerollRequest {
            message: low_d12_message(),
            roll_index: 0,
        };

        tokio_test::block_on(dispatcher.dispatch(&host, &control, &request));
        tokio_test::block_on(dispatcher.dispatch(&host, &control, &request));

        assert_eq!(host.published.lock().unwrap().len(), 2);
        assert_eq!(
            events(&host),
            vec![
                "disable", "evaluate", "publish", "enable", "disable", "evaluate", "publish",
                "enable"
            ]
        );
    }
}
