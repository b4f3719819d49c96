//! Actor and key identifiers.
//!
//! An [`ActorId`] is the textual principal bound to every signature in the
//! kernel: `role:name` where role is one of `user`, `agent`, `provider`, or
//! `adapter`. [`KeyId`] derives deterministically from an `ActorId` so a
//! keystore lookup never needs a side table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid actor id '{0}': expected role:name with role in user|agent|provider|adapter")]
    InvalidActorId(String),
}

/// The role a principal plays. Determines nothing about authority by
/// itself — scope matching is what grants or denies actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    Provider,
    Adapter,
}

impl Role {
    fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Provider => "provider",
            Role::Adapter => "adapter",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "agent" => Some(Role::Agent),
            "provider" => Some(Role::Provider),
            "adapter" => Some(Role::Adapter),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A principal of the form `role:name`. Used as the signer field on every
/// event and receipt, and as the lookup key into the keystore (via
/// [`KeyId`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId {
    role: Role,
    name: String,
}

impl ActorId {
    pub fn new(role: Role, name: impl Into<String>) -> Result<Self, IdentityError> {
        let name = name.into();
        if name.is_empty() || !name.chars().all(is_name_char) {
            return Err(IdentityError::InvalidActorId(format!("{role}:{name}")));
        }
        Ok(Self { role, name })
    }

    pub fn user(name: impl Into<String>) -> Result<Self, IdentityError> {
        Self::new(Role::User, name)
    }

    pub fn agent(name: impl Into<String>) -> Result<Self, IdentityError> {
        Self::new(Role::Agent, name)
    }

    pub fn provider(name: impl Into<String>) -> Result<Self, IdentityError> {
        Self::new(Role::Provider, name)
    }

    pub fn adapter(name: impl Into<String>) -> Result<Self, IdentityError> {
        Self::new(Role::Adapter, name)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `ed25519:<actor_id>` — the key this actor signs with.
    pub fn key_id(&self) -> KeyId {
        KeyId(format!("ed25519:{self}"))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.name)
    }
}

impl FromStr for ActorId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role_str, name) = s
            .split_once(':')
            .ok_or_else(|| IdentityError::InvalidActorId(s.to_string()))?;
        let role = Role::parse(role_str).ok_or_else(|| IdentityError::InvalidActorId(s.to_string()))?;
        if name.is_empty() || !name.chars().all(is_name_char) {
            return Err(IdentityError::InvalidActorId(s.to_string()));
        }
        Ok(Self {
            role,
            name: name.to_string(),
        })
    }
}

impl TryFrom<String> for ActorId {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActorId> for String {
    fn from(value: ActorId) -> Self {
        value.to_string()
    }
}

/// A keystore lookup key, always `ed25519:<actor_id>` in this kernel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId(pub String);

impl KeyId {
    pub fn for_actor(actor: &ActorId) -> Self {
        actor.key_id()
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
