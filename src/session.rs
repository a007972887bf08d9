use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::{ConfigError, read_json};
use crate::work_item::ParseLabelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Profiles without a recognised role are plain users.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default()
    }
}

// Stored profiles may carry roles this service does not know; those read as `user`.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Role::from_stored(raw.as_deref()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(ParseLabelError::new("role", s)),
        }
    }
}

/// The signed-in user as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role,
        }
    }
}

/// Call contract of the external auth service.
pub trait SessionProvider: Send + Sync {
    fn current(&self, token: &str) -> Option<Session>;
    fn refresh(&self, token: &str) -> Option<Session>;
    fn sign_out(&self, token: &str);
}

/// Fixed token table, for local runs and tests.
#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    sessions: RwLock<HashMap<String, Session>>,
}

impl StaticSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, token: impl Into<String>, session: Session) -> Self {
        self.insert(token, session);
        self
    }

    /// Reads a JSON object mapping bearer tokens to sessions.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let sessions: HashMap<String, Session> = read_json(path)?;
        Ok(Self {
            sessions: RwLock::new(sessions),
        })
    }

    pub fn insert(&self, token: impl Into<String>, session: Session) {
        self.sessions.write().insert(token.into(), session);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current(&self, token: &str) -> Option<Session> {
        self.sessions.read().get(token).cloned()
    }

    // static tokens never expire
    fn refresh(&self, token: &str) -> Option<Session> {
        self.current(token)
    }

    fn sign_out(&self, token: &str) {
        if let Some(session) = self.sessions.write().remove(token) {
            debug!(user_id = %session.user_id, "session signed out");
        }
    }
}
