//! SchoolDigger API credentials.

use std::fmt;

use crate::error::{Result, SchoolDiggerError};

pub const API_ID_ENV: &str = "SCHOOLDIGGER_API_ID";
pub const API_KEY_ENV: &str = "SCHOOLDIGGER_API_KEY";

/// The app id/key pair SchoolDigger expects on every request.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_id: String,
    api_key: String,
}

impl Credentials {
    pub fn new(api_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_id = api_id.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();
        if api_id.is_empty() {
            return Err(missing(API_ID_ENV));
        }
        if api_key.is_empty() {
            return Err(missing(API_KEY_ENV));
        }
        Ok(Self { api_id, api_key })
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_id = lookup(API_ID_ENV).ok_or_else(|| missing(API_ID_ENV))?;
        let api_key = lookup(API_KEY_ENV).ok_or_else(|| missing(API_KEY_ENV))?;
        Self::new(api_id, api_key)
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_id", &self.api_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn missing(var: &str) -> SchoolDiggerError {
    SchoolDiggerError::Configuration(format!("{var} must be set to a non-empty value"))
}
