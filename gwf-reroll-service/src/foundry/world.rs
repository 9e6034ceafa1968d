//! Actors, scenes, tokens and the current user.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Document ownership levels (`CONST.DOCUMENT_OWNERSHIP_LEVELS`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i8)]
#[allow(dead_code)] // Full level set; only Owner is required today
pub enum OwnershipLevel {
    /// Defer to the `default` entry
    Inherit = -1,
    None = 0,
    Limited = 1,
    Observer = 2,
    Owner = 3,
}

/// User context from FVTT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub user_name: String,
    pub role: u8, // CONST.USER_ROLES: 0=None, 1=Player, 2=Trusted, 3=Assistant, 4=GM
}

impl UserContext {
    pub fn is_gm(&self) -> bool {
        self.role >= 4
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actor {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    /// User id (or `"default"`) to ownership level; `-1` inherits the default
    #[serde(default)]
    pub ownership: HashMap<String, i8>,
}

impl Actor {
    /// Mirrors `Actor#testUserPermission(user, level)`.
    ///
    /// GMs pass every check. Otherwise the user's explicit level applies,
    /// falling back to the `default` entry when absent or inherited.
    pub fn test_user_permission(&self, user: &UserContext, level: OwnershipLevel) -> bool {
        if user.is_gm() {
            return true;
        }
        let explicit = |key: &str| {
            self.ownership
                .get(key)
                .copied()
                .filter(|granted| *granted > OwnershipLevel::Inherit as i8)
        };
        let granted = explicit(&user.user_id)
            .or_else(|| explicit("default"))
            .unwrap_or(OwnershipLevel::None as i8);
        granted >= level as i8
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Token {
    #[serde(alias = "_id")]
    pub id: String,

    /// The token's actor; for unlinked tokens this is the synthetic actor
    #[serde(default)]
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Scene {
    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }
}

/// Read access to the host's actor and scene directories
pub trait WorldDirectory {
    /// `game.actors.get(id)`
    fn actor(&self, id: &str) -> Option<&Actor>;

    /// `game.scenes.get(id)`
    fn scene(&self, id: &str) -> Option<&Scene>;

    /// `canvas.scene`
    fn active_scene(&self) -> Option<&Scene>;
}

/// The slice of the world the client module sends alongside a render event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub actors: Vec<Actor>,

    #[serde(default)]
    pub scenes: Vec<Scene>,

    #[serde(default)]
    pub active_scene_id: Option<String>,
}

impl WorldDirectory for WorldSnapshot {
    fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    fn active_scene(&self) -> Option<&Scene> {
        self.active_scene_id.as_deref().and_then(|id| self.scene(id))
    }
}
