//! Client configuration read from the environment.

use std::str::FromStr;

use thiserror::Error;

use crate::error::{Field, ValidationError};
use crate::types::TodoDraft;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const BASE_URL_VAR: &str = "TODO_API_URL";
pub const VALIDATION_VAR: &str = "TODO_VALIDATION";

/// Which drafts create and update accept.
///
/// The same policy applies to both operations. Delete is never validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Reject only when title and description are both empty.
    #[default]
    AtLeastOneField,
    /// Reject when either field is empty.
    AllFields,
}

impl ValidationPolicy {
    pub fn check(self, draft: &TodoDraft) -> Result<(), ValidationError> {
        match self {
            ValidationPolicy::AtLeastOneField if draft.is_blank() => Err(ValidationError::BlankDraft),
            ValidationPolicy::AtLeastOneField => Ok(()),
            ValidationPolicy::AllFields if draft.is_blank() => Err(ValidationError::BlankDraft),
            ValidationPolicy::AllFields if draft.title.is_empty() => {
                Err(ValidationError::MissingField(Field::Title))
            }
            ValidationPolicy::AllFields if draft.description.is_empty() => {
                Err(ValidationError::MissingField(Field::Description))
            }
            ValidationPolicy::AllFields => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown validation policy {0:?}, expected \"any\" or \"all\"")]
    UnknownPolicy(String),
}

impl FromStr for ValidationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(ValidationPolicy::AtLeastOneField),
            "all" => Ok(ValidationPolicy::AllFields),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub validation: ValidationPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            validation: ValidationPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Read `TODO_API_URL` and `TODO_VALIDATION`, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }
        if let Some(policy) = lookup(VALIDATION_VAR) {
            config.validation = policy.parse()?;
        }
        Ok(config)
    }
}
