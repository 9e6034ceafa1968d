//! Static configuration that cannot be changed at runtime.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};

/// Static configuration that cannot be changed at runtime
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_house_rule")]
    pub house_rule: HouseRuleConfig,

    #[serde(default = "default_i18n")]
    pub i18n: I18nConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// The character, die and threshold the reroll applies to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HouseRuleConfig {
    /// Display name of the only character offered the reroll
    #[serde(default = "default_actor_name")]
    pub actor_name: String,

    #[serde(default = "default_die_faces")]
    pub die_faces: u32,

    /// Results at or below this value are rerolled once
    #[serde(default = "default_low_threshold")]
    pub low_threshold: u32,

    /// Flag scope written on reroll messages (`flags.<scope>.sourceMessageId`)
    #[serde(default = "default_flag_scope")]
    pub flag_scope: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct I18nConfig {
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Directory of `<locale>.ftl` files layered over the embedded English
    #[serde(default)]
    pub locales_dir: Option<PathBuf>,
}

impl StaticConfig {
    pub fn validate(&self) -> ServiceResult<()> {
        self.house_rule.validate()
    }
}

impl HouseRuleConfig {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.actor_name.trim().is_empty() {
            return Err(ServiceError::Config {
                message: "house_rule.actor_name must not be empty".to_string(),
            });
        }
        if self.die_faces < 2 {
            return Err(ServiceError::Config {
                message: format!("house_rule.die_faces must be at least 2, got {}", self.die_faces),
            });
        }
        if self.low_threshold == 0 || self.low_threshold >= self.die_faces {
            return Err(ServiceError::Config {
                message: format!(
                    "house_rule.low_threshold must be between 1 and {}, got {}",
                    self.die_faces - 1,
                    self.low_threshold
                ),
            });
        }
        if self.flag_scope.is_empty() {
            return Err(ServiceError::Config {
                message: "house_rule.flag_scope must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            house_rule: default_house_rule(),
            i18n: default_i18n(),
        }
    }
}

impl Default for HouseRuleConfig {
    fn default() -> Self {
        default_house_rule()
    }
}

// ==================== Default Value Functions ====================

pub(crate) fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8787
}

pub(crate) fn default_house_rule() -> HouseRuleConfig {
    HouseRuleConfig {
        actor_name: default_actor_name(),
        die_faces: default_die_faces(),
        low_threshold: default_low_threshold(),
        flag_scope: default_flag_scope(),
    }
}

pub(crate) fn default_actor_name() -> String {
    "Rue".to_string()
}

pub(crate) fn default_die_faces() -> u32 {
    12
}

pub(crate) fn default_low_threshold() -> u32 {
    2
}

pub(crate) fn default_flag_scope() -> String {
    "gwf-d12-rue".to_string()
}

pub(crate) fn default_i18n() -> I18nConfig {
    I18nConfig {
        locale: default_locale(),
        locales_dir: None,
    }
}

pub(crate) fn default_locale() -> String {
    "en".to_string()
}
