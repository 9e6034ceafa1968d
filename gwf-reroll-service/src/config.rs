//! Service configuration.
//!
//! Everything here is read once at startup from an optional `config` file and
//! `GWF_REROLL__*` environment variables, then handed to the components that
//! need it. Nothing is hot-reloadable.

mod loader;
mod static_config;

pub use loader::load_static_config;
pub use static_config::{HouseRuleConfig, I18nConfig, ServerConfig, StaticConfig};
