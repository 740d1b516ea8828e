//! Types for authentication and user management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Session;
use crate::error::Error;

/// User record returned by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID; stable once issued
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub app_metadata: serde_json::Value,

    #[serde(default)]
    pub user_metadata: serde_json::Value,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// First non-empty string found under any of `keys` in the user metadata
    pub fn metadata_str(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.user_metadata.get(*key))
            .filter_map(|value| value.as_str())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// OAuth providers the site offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Kakao,
    Google,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kakao" => Ok(Self::Kakao),
            "google" => Ok(Self::Google),
            other => Err(Error::auth(format!("unsupported OAuth provider: {}", other))),
        }
    }
}

/// Result of a sign-up call
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The project signs users in right away
    Session(Session),

    /// The project requires email confirmation before the first login
    ConfirmationRequired(User),
}

/// Credentials and profile fields submitted from the sign-up form
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub user_name: String,
}
