//! Mandate scope and validity window types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pattern;

/// What a mandate authorizes: a set of action patterns, a set of resource
/// patterns, and an optional spending ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Scope {
    pub fn new(actions: Vec<String>, resources: Vec<String>) -> Self {
        Self {
            actions,
            resources,
            max_value: None,
            currency: None,
        }
    }

    pub fn with_budget(mut self, max_value: i64, currency: impl Into<String>) -> Self {
        self.max_value = Some(max_value);
        self.currency = Some(currency.into());
        self
    }

    /// True if any action pattern in this scope matches `action`.
    pub fn allows_action(&self, action: &str) -> bool {
        pattern::any_matches(self.actions.iter().map(String::as_str), action)
    }

    /// True if any resource pattern in this scope matches `resource`.
    pub fn allows_resource(&self, resource: &str) -> bool {
        pattern::any_matches(self.resources.iter().map(String::as_str), resource)
    }

    /// True if `max_value` is unset, or `value` does not exceed it.
    pub fn within_budget(&self, value: i64) -> bool {
        match self.max_value {
            None => true,
            Some(max) => value <= max,
        }
    }
}

/// Optional not-before / not-after bounds on a mandate's validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Validity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_after: Option<DateTime<Utc>>,
}

impl Validity {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_not_yet_valid(&self, now: DateTime<Utc>) -> bool {
        self.not_before.is_some_and(|nb| now < nb)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.not_after.is_some_and(|na| now > na)
    }
}
