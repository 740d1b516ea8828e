//! Profile edits made from My Page

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::validation::validate_nickname;
use crate::auth::AuthProvider;
use crate::backend::{ImageStore, ProfilePatch, ProfileStore};
use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::user::UserInfo;

/// What the profile section shows
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub avatar_url: String,
    pub nickname: String,
    pub email: String,
}

impl From<&UserInfo> for ProfileView {
    fn from(user: &UserInfo) -> Self {
        Self {
            avatar_url: user.avatar_url(),
            nickname: user.display_nickname(),
            email: user.email.clone().unwrap_or_default(),
        }
    }
}

/// Content type for an uploaded image, by file extension
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Object path a new avatar is stored at
pub fn avatar_path(file_name: &str, millis: i64) -> String {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());
    format!("avatars/{}.{}", millis, extension)
}

/// Applies profile changes to the backend and then to the app context
pub struct ProfileEditor {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    images: Arc<dyn ImageStore>,
    ctx: AppContext,
}

impl ProfileEditor {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        images: Arc<dyn ImageStore>,
        ctx: AppContext,
    ) -> Self {
        Self {
            auth,
            profiles,
            images,
            ctx,
        }
    }

    async fn user(&self) -> Result<UserInfo> {
        self.ctx.current_user().await.ok_or(Error::LoginRequired)
    }

    pub async fn view(&self) -> Result<ProfileView> {
        Ok(ProfileView::from(&self.user().await?))
    }

    /// Upload a new avatar and make it the profile picture. Returns its public URL.
    pub async fn upload_avatar(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let user = self.user().await?;

        let path = avatar_path(file_name, Utc::now().timestamp_millis());
        let extension = path.rsplit('.').next().unwrap_or_default();
        self.images
            .upload(&path, bytes, content_type_for(extension))
            .await?;
        let public_url = self.images.public_url(&path);

        if self.auth.get_session().await?.is_none() {
            warn!("avatar uploaded to {} but no session is ready", path);
            return Err(Error::MissingSession);
        }
        if self.auth.get_user().await?.is_none() {
            warn!("avatar uploaded to {} but no user came back", path);
            return Err(Error::MissingUser);
        }

        let patch = ProfilePatch::new(&user.id)
            .nickname(&user.fallback_nickname())
            .profilepic(Some(public_url.as_str()));
        self.profiles.upsert_profile(patch).await?;

        let updated = UserInfo {
            profilepic: Some(public_url.clone()),
            ..user
        };
        self.ctx.set_user(Some(updated)).await?;
        info!("avatar changed to {}", public_url);
        Ok(public_url)
    }

    /// Drop the uploaded avatar; the view falls back to the provider avatar, then the default thumbnail
    pub async fn reset_avatar(&self) -> Result<ProfileView> {
        let user = self.user().await?;
        if self.auth.get_user().await?.is_none() {
            warn!("profile reset for {} found no authenticated user", user.id);
            return Err(Error::ResetUnavailable);
        }

        let patch = ProfilePatch::new(&user.id)
            .nickname(&user.fallback_nickname())
            .profilepic(None);
        self.profiles.upsert_profile(patch).await?;

        let updated = UserInfo {
            profilepic: None,
            ..user
        };
        let view = ProfileView::from(&updated);
        self.ctx.set_user(Some(updated)).await?;
        info!("avatar reset");
        Ok(view)
    }

    /// Save a new nickname and return the confirmation text
    pub async fn save_nickname(&self, nickname: &str) -> Result<String> {
        validate_nickname(nickname)?;
        let user = self.user().await?;

        self.profiles
            .upsert_profile(ProfilePatch::new(&user.id).nickname(nickname))
            .await?;

        let updated = UserInfo {
            nickname: Some(nickname.to_string()),
            ..user
        };
        self.ctx.set_user(Some(updated)).await?;
        info!("nickname changed to {}", nickname);
        Ok(format!("닉네임이 \"{}\"(으)로 저장되었습니다.", nickname))
    }

    /// Re-read the stored profile row and show it
    pub async fn refresh(&self) -> Result<ProfileView> {
        let mut user = self.user().await?;
        if let Some(row) = self.profiles.fetch_profile(&user.id).await? {
            user.apply_profile(&row);
            self.ctx.set_user(Some(user.clone())).await?;
        }
        Ok(ProfileView::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_path() {
        assert_eq!(avatar_path("me.PNG", 1700000000000), "avatars/1700000000000.png");
        assert_eq!(avatar_path("noext", 5), "avatars/5.bin");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("jpg"), "image/jpeg");
        assert_eq!(content_type_for("WEBP"), "image/webp");
        assert_eq!(content_type_for("bin"), "application/octet-stream");
    }
}
