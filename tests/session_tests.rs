use std::sync::Arc;

use cinevisor::auth::{AuthProvider, SignUpForm, SignUpOutcome};
use cinevisor::backend::{ProfilePatch, ProfileStore};
use cinevisor::context::{AppContext, SessionState};
use cinevisor::error::Error;
use cinevisor::memory::{Failure, MemoryBackend};
use cinevisor::persist::{self, LocalStore, MemoryStore, USER_INFO_KEY};
use cinevisor::profile::ValidationError;
use cinevisor::session;
use cinevisor::user::UserInfo;

fn context() -> (Arc<MemoryStore>, AppContext) {
    let store = Arc::new(MemoryStore::new());
    let ctx = AppContext::new(store.clone());
    (store, ctx)
}

fn form(user_name: &str) -> SignUpForm {
    SignUpForm {
        email: "new@visor.kr".to_string(),
        password: "movie1234".to_string(),
        password_confirm: "movie1234".to_string(),
        user_name: user_name.to_string(),
    }
}

#[tokio::test]
async fn test_bootstrap_without_user_is_logged_out() {
    let backend = MemoryBackend::new();
    let (_, ctx) = context();

    let user = session::bootstrap(&backend, &backend, &ctx).await.unwrap();
    assert!(user.is_none());
    assert_eq!(ctx.snapshot().await, SessionState::default());
}

#[tokio::test]
async fn test_bootstrap_clears_stale_snapshot() {
    let backend = MemoryBackend::new();
    let (store, ctx) = context();
    persist::set_item(
        store.as_ref(),
        USER_INFO_KEY,
        &UserInfo {
            id: "gone".into(),
            ..UserInfo::default()
        },
    )
    .unwrap();

    session::bootstrap(&backend, &backend, &ctx).await.unwrap();
    let state = ctx.snapshot().await;
    assert!(!state.is_logged_in);
    assert!(state.user.is_none());
    assert!(store.get(USER_INFO_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_bootstrap_merges_profile_row() {
    let backend = MemoryBackend::new();
    let user = backend.add_account("cine@visor.kr", "movie1234", "영화광").unwrap();
    backend.sign_in_as(&user).unwrap();
    backend
        .upsert_profile(
            ProfilePatch::new(&user.id)
                .nickname("ab12")
                .profilepic(Some("memory://profile/avatars/1.png")),
        )
        .await
        .unwrap();
    let (_, ctx) = context();

    let info = session::bootstrap(&backend, &backend, &ctx).await.unwrap().unwrap();
    assert_eq!(info.id, user.id);
    assert_eq!(info.display_nickname(), "ab12");
    assert_eq!(info.avatar_url(), "memory://profile/avatars/1.png");

    let state = ctx.snapshot().await;
    assert!(state.is_logged_in);
    assert_eq!(state.user, Some(info));
}

#[tokio::test]
async fn test_bootstrap_keeps_snapshot_when_profile_read_fails() {
    let backend = MemoryBackend::new();
    let user = backend.add_account("cine@visor.kr", "movie1234", "영화광").unwrap();
    backend.sign_in_as(&user).unwrap();
    let (store, ctx) = context();
    persist::set_item(
        store.as_ref(),
        USER_INFO_KEY,
        &UserInfo {
            id: user.id.clone(),
            nickname: Some("ab12".into()),
            ..UserInfo::default()
        },
    )
    .unwrap();
    backend.fail(Failure::ProfileRead).unwrap();

    let info = session::bootstrap(&backend, &backend, &ctx).await.unwrap().unwrap();
    assert_eq!(info.display_nickname(), "ab12");
    assert_eq!(info.email.as_deref(), Some("cine@visor.kr"));
}

#[tokio::test]
async fn test_bootstrap_lookup_failure_logs_out() {
    let backend = MemoryBackend::new();
    let user = backend.add_account("cine@visor.kr", "movie1234", "영화광").unwrap();
    backend.sign_in_as(&user).unwrap();
    backend.fail(Failure::UserLookup).unwrap();
    let (_, ctx) = context();
    ctx.set_user(Some(UserInfo::from_auth_user(&user))).await.unwrap();

    let err = session::bootstrap(&backend, &backend, &ctx).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(ctx.snapshot().await, SessionState::default());
}

#[tokio::test]
async fn test_log_in_and_out() {
    let backend = MemoryBackend::new();
    backend.add_account("cine@visor.kr", "movie1234", "영화광").unwrap();
    let (store, ctx) = context();

    let err = session::log_in(&backend, &backend, &ctx, "cine@visor.kr", "wrong1234")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert!(!ctx.is_logged_in().await);

    let info = session::log_in(&backend, &backend, &ctx, "cine@visor.kr", "movie1234")
        .await
        .unwrap();
    assert_eq!(info.display_nickname(), "영화광");
    assert!(ctx.is_logged_in().await);
    assert!(store.get(USER_INFO_KEY).unwrap().is_some());

    session::log_out(&backend, &ctx).await.unwrap();
    assert_eq!(ctx.snapshot().await, SessionState::default());
    assert!(backend.get_session().await.unwrap().is_none());
    assert!(store.get(USER_INFO_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_log_out_is_local_even_when_server_fails() {
    let backend = MemoryBackend::new();
    backend.add_account("cine@visor.kr", "movie1234", "영화광").unwrap();
    let (_, ctx) = context();
    session::log_in(&backend, &backend, &ctx, "cine@visor.kr", "movie1234")
        .await
        .unwrap();
    backend.fail(Failure::SignOut).unwrap();

    assert!(session::log_out(&backend, &ctx).await.is_err());
    assert!(!ctx.is_logged_in().await);
}

#[tokio::test]
async fn test_sign_up_validates_before_calling_auth() {
    let backend = MemoryBackend::new();
    let (_, ctx) = context();

    let err = session::sign_up(&backend, &ctx, &form("a")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::Nickname)));

    let mismatched = SignUpForm {
        password_confirm: "movie9999".into(),
        ..form("ab12")
    };
    let err = session::sign_up(&backend, &ctx, &mismatched).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::PasswordMismatch)));

    // Nothing was registered, so the real sign-up still works
    let outcome = session::sign_up(&backend, &ctx, &form("ab12")).await.unwrap();
    assert!(matches!(outcome, SignUpOutcome::Session(_)));
    assert_eq!(ctx.current_user().await.unwrap().display_nickname(), "ab12");
}

#[tokio::test]
async fn test_sign_up_with_email_confirmation() {
    let backend = MemoryBackend::new();
    backend.require_confirmation(true).unwrap();
    let (_, ctx) = context();

    let outcome = session::sign_up(&backend, &ctx, &form("ab12")).await.unwrap();
    assert!(matches!(outcome, SignUpOutcome::ConfirmationRequired(_)));
    assert!(!ctx.is_logged_in().await);
}
