//! The signed-in user's profile as the app displays it

use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::backend::ProfileRow;

/// Shown when the user has no avatar
pub const DEFAULT_THUMBNAIL: &str = "/assets/user.webp";

/// Profile snapshot kept in the application context and in local storage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Nickname chosen on My Page
    #[serde(default)]
    pub nickname: Option<String>,

    /// Name given at sign-up or by the OAuth provider
    #[serde(default)]
    pub user_name: Option<String>,

    /// Uploaded avatar; `None` after a reset
    #[serde(default)]
    pub profilepic: Option<String>,

    /// Avatar supplied by the OAuth provider
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl UserInfo {
    pub fn from_auth_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            nickname: None,
            user_name: user.metadata_str(&["userName", "name", "full_name"]),
            profilepic: None,
            profile_image_url: user.metadata_str(&["profileImageUrl", "avatar_url", "picture"]),
        }
    }

    /// Fold the stored profile row over the auth-derived fields
    pub fn apply_profile(&mut self, row: &ProfileRow) {
        if let Some(nickname) = non_empty(&row.nickname) {
            self.nickname = Some(nickname.to_string());
        }
        self.profilepic = row.profilepic.clone();
    }

    /// Name shown in the header and on My Page
    pub fn display_nickname(&self) -> String {
        non_empty(&self.nickname)
            .or_else(|| non_empty(&self.user_name))
            .unwrap_or_default()
            .to_string()
    }

    /// Nickname written alongside an avatar change
    pub fn fallback_nickname(&self) -> String {
        if let Some(name) = non_empty(&self.nickname).or_else(|| non_empty(&self.user_name)) {
            return name.to_string();
        }
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .unwrap_or_default()
            .to_string()
    }

    pub fn avatar_url(&self) -> String {
        non_empty(&self.profilepic)
            .or_else(|| non_empty(&self.profile_image_url))
            .unwrap_or(DEFAULT_THUMBNAIL)
            .to_string()
    }
}
