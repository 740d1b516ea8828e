use std::sync::Arc;

use cinevisor::auth::{AuthProvider, User};
use cinevisor::backend::{ProfilePatch, ProfileStore};
use cinevisor::context::AppContext;
use cinevisor::error::Error;
use cinevisor::memory::{Failure, MemoryBackend};
use cinevisor::persist::{self, LocalStore, MemoryStore, USER_INFO_KEY};
use cinevisor::profile::{ProfileEditor, ValidationError};
use cinevisor::user::{UserInfo, DEFAULT_THUMBNAIL};

struct Fixture {
    backend: MemoryBackend,
    store: Arc<MemoryStore>,
    ctx: AppContext,
    editor: ProfileEditor,
    user: User,
}

async fn fixture() -> Fixture {
    let backend = MemoryBackend::new();
    let user = backend.add_account("cine@visor.kr", "movie1234", "영화광").unwrap();
    backend.sign_in_as(&user).unwrap();

    let store = Arc::new(MemoryStore::new());
    let ctx = AppContext::new(store.clone());
    ctx.set_user(Some(UserInfo::from_auth_user(&user))).await.unwrap();

    let editor = ProfileEditor::new(
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        ctx.clone(),
    );
    Fixture {
        backend,
        store,
        ctx,
        editor,
        user,
    }
}

fn persisted(store: &dyn LocalStore) -> UserInfo {
    persist::get_item::<UserInfo>(store, USER_INFO_KEY)
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_upload_avatar_updates_row_context_and_storage() {
    let f = fixture().await;

    let url = f.editor.upload_avatar("me.png", vec![1, 2, 3]).await.unwrap();
    assert!(url.starts_with("memory://profile/avatars/"));
    assert!(url.ends_with(".png"));

    let path = url.trim_start_matches("memory://profile/");
    let (bytes, content_type) = f.backend.image(path).unwrap().unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);
    assert_eq!(content_type, "image/png");

    let row = f.backend.profile(&f.user.id).unwrap().unwrap();
    assert_eq!(row.profilepic.as_deref(), Some(url.as_str()));
    assert_eq!(row.nickname.as_deref(), Some("영화광"));

    let current = f.ctx.current_user().await.unwrap();
    assert_eq!(current.avatar_url(), url);
    assert_eq!(persisted(f.store.as_ref()), current);
}

#[tokio::test]
async fn test_upload_failure_changes_nothing() {
    let f = fixture().await;
    f.backend.fail(Failure::Upload).unwrap();

    let err = f.editor.upload_avatar("me.png", vec![1]).await.unwrap_err();
    assert!(matches!(err, Error::Upload(_)));
    assert!(err.alert_message().starts_with("이미지 업로드 실패: "));
    assert!(f.backend.profile(&f.user.id).unwrap().is_none());
    assert_eq!(f.ctx.current_user().await.unwrap().profilepic, None);
}

#[tokio::test]
async fn test_upload_without_session() {
    let f = fixture().await;
    f.backend.sign_out().await.unwrap();

    let err = f.editor.upload_avatar("me.jpg", vec![1]).await.unwrap_err();
    assert!(matches!(err, Error::MissingSession));
    assert_eq!(
        err.alert_message(),
        "세션이 준비되지 않았어요. 다시 로그인하거나 새로고침 해주세요."
    );
    assert!(f.backend.profile(&f.user.id).unwrap().is_none());
}

#[tokio::test]
async fn test_upload_without_user() {
    let f = fixture().await;
    f.backend.fail(Failure::UserMissing).unwrap();

    let err = f.editor.upload_avatar("me.jpg", vec![1]).await.unwrap_err();
    assert!(matches!(err, Error::MissingUser));
    assert_eq!(err.alert_message(), "유저 인증 정보를 가져오지 못했어요.");
}

#[tokio::test]
async fn test_reset_avatar_falls_back_to_default_thumbnail() {
    let f = fixture().await;
    f.editor.upload_avatar("me.webp", vec![9]).await.unwrap();

    let view = f.editor.reset_avatar().await.unwrap();
    assert_eq!(view.avatar_url, DEFAULT_THUMBNAIL);

    let row = f.backend.profile(&f.user.id).unwrap().unwrap();
    assert_eq!(row.profilepic, None);
    assert_eq!(persisted(f.store.as_ref()).profilepic, None);
    assert_eq!(f.editor.view().await.unwrap().avatar_url, DEFAULT_THUMBNAIL);
}

#[tokio::test]
async fn test_nickname_validation_happens_before_any_write() {
    let f = fixture().await;

    let err = f.editor.save_nickname("a").await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::Nickname)));
    assert_eq!(err.alert_message(), "닉네임 형식을 확인해주세요.");
    assert!(f.backend.profile(&f.user.id).unwrap().is_none());

    let message = f.editor.save_nickname("ab12").await.unwrap();
    assert_eq!(message, "닉네임이 \"ab12\"(으)로 저장되었습니다.");
    assert_eq!(
        f.backend.profile(&f.user.id).unwrap().unwrap().nickname.as_deref(),
        Some("ab12")
    );
    assert_eq!(f.editor.view().await.unwrap().nickname, "ab12");
    assert_eq!(persisted(f.store.as_ref()).nickname.as_deref(), Some("ab12"));
}

#[tokio::test]
async fn test_nickname_write_failure_keeps_old_name() {
    let f = fixture().await;
    f.backend.fail(Failure::ProfileWrite).unwrap();

    let err = f.editor.save_nickname("ab12").await.unwrap_err();
    assert_eq!(err.alert_message(), "서버 저장에 실패했어요 🥲");
    assert_eq!(f.editor.view().await.unwrap().nickname, "영화광");
}

#[tokio::test]
async fn test_refresh_reads_latest_row() {
    let f = fixture().await;
    f.backend
        .upsert_profile(ProfilePatch::new(&f.user.id).nickname("새이름"))
        .await
        .unwrap();

    let view = f.editor.refresh().await.unwrap();
    assert_eq!(view.nickname, "새이름");
    assert_eq!(view.email, "cine@visor.kr");
}

#[tokio::test]
async fn test_editor_requires_login() {
    let f = fixture().await;
    f.ctx.set_user(None).await.unwrap();

    let err = f.editor.save_nickname("ab12").await.unwrap_err();
    assert!(matches!(err, Error::LoginRequired));
    assert!(f.store.get(USER_INFO_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_reset_without_user_has_its_own_message() {
    let f = fixture().await;
    f.editor.upload_avatar("me.png", vec![1]).await.unwrap();
    f.backend.fail(Failure::UserMissing).unwrap();

    let err = f.editor.reset_avatar().await.unwrap_err();
    assert!(matches!(err, Error::ResetUnavailable));
    assert_eq!(
        err.alert_message(),
        "세션 정보를 불러올 수 없어 프로필을 초기화할 수 없습니다."
    );
    assert!(f.backend.profile(&f.user.id).unwrap().unwrap().profilepic.is_some());
}

#[tokio::test]
async fn test_reset_shows_provider_avatar_when_there_is_one() {
    let f = fixture().await;
    let oauth_user = UserInfo {
        profile_image_url: Some("http://k.kakaocdn.net/p.jpg".into()),
        ..UserInfo::from_auth_user(&f.user)
    };
    f.ctx.set_user(Some(oauth_user)).await.unwrap();
    f.editor.upload_avatar("me.png", vec![1]).await.unwrap();

    let view = f.editor.reset_avatar().await.unwrap();
    assert_eq!(view.avatar_url, "http://k.kakaocdn.net/p.jpg");
    assert_eq!(f.backend.profile(&f.user.id).unwrap().unwrap().profilepic, None);
}
