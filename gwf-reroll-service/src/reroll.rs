//! Great Weapon Fighting d12 reroll.
//!
//! The pipeline runs strictly forward for each rendered chat message:
//! [`qualifier`] gates [`actor`] resolution, which gates the [`inspector`],
//! which decides whether [`render`] offers a control. Clicking the control
//! runs the [`dispatch`] sequence, which uses [`formula`] to build the
//! reroll. No stage keeps state between invocations.

pub mod actor;
pub mod dispatch;
pub mod formula;
pub mod inspector;
pub mod qualifier;
pub mod render;

pub use dispatch::{ControlHandle, DispatchOutcome, RerollDispatcher, RerollHost, RerollRequest};
pub use formula::FormulaRewriter;
pub use inspector::RollInspector;
pub use qualifier::DamageRollMessage;
pub use render::{ChatSurface, RenderAdvisor, RerollOffer};

#[cfg(test)]
pub(crate) mod fixtures;
