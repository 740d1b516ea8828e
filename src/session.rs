//! Login state transitions: startup, log in, sign up, OAuth and log out

use tracing::{info, warn};

use crate::auth::{AuthProvider, SignUpForm, SignUpOutcome, SupabaseAuth, User};
use crate::backend::ProfileStore;
use crate::context::AppContext;
use crate::error::Result;
use crate::profile::{validate_email, validate_nickname, validate_password, validate_password_confirm};
use crate::routes::Route;
use crate::user::UserInfo;

/// Build the displayed profile for `user`, folding in the stored profile row.
///
/// A snapshot of the same user keeps its last written values if the row
/// cannot be read.
async fn resolve_user(profiles: &dyn ProfileStore, user: &User, previous: Option<UserInfo>) -> UserInfo {
    let mut info = UserInfo::from_auth_user(user);
    if let Some(previous) = previous.filter(|p| p.id == user.id) {
        info.nickname = previous.nickname;
        info.profilepic = previous.profilepic;
    }

    match profiles.fetch_profile(&user.id).await {
        Ok(Some(row)) => info.apply_profile(&row),
        Ok(None) => {}
        Err(e) => warn!("keeping cached profile for {}: {}", user.id, e),
    }
    info
}

/// Establish the login state on startup.
///
/// The persisted snapshot is shown first; the auth lookup then decides. When
/// the lookup fails the app is put in the logged-out state and the error is
/// returned.
pub async fn bootstrap(
    auth: &dyn AuthProvider,
    profiles: &dyn ProfileStore,
    ctx: &AppContext,
) -> Result<Option<UserInfo>> {
    let previous = ctx.restore().await?;

    match auth.get_user().await {
        Ok(Some(user)) => {
            let info = resolve_user(profiles, &user, previous).await;
            ctx.set_user(Some(info.clone())).await?;
            info!("session restored for {}", info.id);
            Ok(Some(info))
        }
        Ok(None) => {
            ctx.set_user(None).await?;
            Ok(None)
        }
        Err(e) => {
            warn!("session lookup failed: {}", e);
            ctx.set_user(None).await?;
            Err(e)
        }
    }
}

pub async fn log_in(
    auth: &dyn AuthProvider,
    profiles: &dyn ProfileStore,
    ctx: &AppContext,
    email: &str,
    password: &str,
) -> Result<UserInfo> {
    let session = auth.sign_in_with_password(email, password).await?;
    let info = resolve_user(profiles, &session.user, ctx.current_user().await).await;
    ctx.set_user(Some(info.clone())).await?;
    Ok(info)
}

/// Validate the sign-up form, then register
pub async fn sign_up(auth: &dyn AuthProvider, ctx: &AppContext, form: &SignUpForm) -> Result<SignUpOutcome> {
    validate_email(&form.email)?;
    validate_password(&form.password)?;
    validate_password_confirm(&form.password, &form.password_confirm)?;
    validate_nickname(&form.user_name)?;

    let outcome = auth
        .sign_up(&form.email, &form.password, &form.user_name)
        .await?;

    match &outcome {
        SignUpOutcome::Session(session) => {
            ctx.set_user(Some(UserInfo::from_auth_user(&session.user)))
                .await?;
        }
        SignUpOutcome::ConfirmationRequired(user) => {
            info!("{} must confirm their email before logging in", user.id);
        }
    }
    Ok(outcome)
}

/// Finish an OAuth login from the provider's redirect and return where to go next
pub async fn complete_oauth(
    auth: &SupabaseAuth,
    profiles: &dyn ProfileStore,
    ctx: &AppContext,
    callback_url: &str,
) -> Result<Route> {
    let session = auth.session_from_callback(callback_url).await?;
    let info = resolve_user(profiles, &session.user, ctx.current_user().await).await;
    ctx.set_user(Some(info)).await?;
    Ok(Route::Home)
}

/// Sign out. The app is logged out locally even if the server call fails.
pub async fn log_out(auth: &dyn AuthProvider, ctx: &AppContext) -> Result<()> {
    let remote = auth.sign_out().await;
    ctx.set_user(None).await?;
    info!("logged out");
    remote
}
