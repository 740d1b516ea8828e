//! Error handling for the CineVisor client

use std::fmt;
use thiserror::Error;

use crate::profile::ValidationError;
use crate::routes::Route;

/// Unified error type for the CineVisor client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Local persistence errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Movie metadata API errors
    #[error("Movie API error: {0}")]
    Movies(#[from] cinevisor_tmdb::TmdbError),

    /// Client-side input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Table store errors
    #[error("Database error: {0}")]
    Database(String),

    /// Object storage errors other than uploads
    #[error("Storage error: {0}")]
    Storage(String),

    /// Object storage rejected a write
    #[error("Upload error: {0}")]
    Upload(String),

    /// No session is available for a mutating call
    #[error("Session is not ready")]
    MissingSession,

    /// The session exists but the backend returned no user
    #[error("Authenticated user not found")]
    MissingUser,

    /// The profile reset found no authenticated user
    #[error("Authenticated user not found for profile reset")]
    ResetUnavailable,

    /// The action needs a logged-in user
    #[error("Login required")]
    LoginRequired,

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new database error
    pub fn database<T: fmt::Display>(msg: T) -> Self {
        Error::Database(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new upload error
    pub fn upload<T: fmt::Display>(msg: T) -> Self {
        Error::Upload(msg.to_string())
    }

    /// Create a new config error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Message shown to the user when this error ends an action
    pub fn alert_message(&self) -> String {
        match self {
            Error::Upload(msg) => format!("이미지 업로드 실패: {}", msg),
            Error::MissingSession => {
                "세션이 준비되지 않았어요. 다시 로그인하거나 새로고침 해주세요.".to_string()
            }
            Error::MissingUser => "유저 인증 정보를 가져오지 못했어요.".to_string(),
            Error::ResetUnavailable => {
                "세션 정보를 불러올 수 없어 프로필을 초기화할 수 없습니다.".to_string()
            }
            Error::LoginRequired => "해당 기능은 로그인 후 이용하실 수 있습니다.".to_string(),
            Error::Validation(ValidationError::Nickname) => "닉네임 형식을 확인해주세요.".to_string(),
            Error::Validation(err) => err.to_string(),
            Error::Auth(msg) => format!("로그인 처리 중 문제가 발생했어요: {}", msg),
            Error::Database(_) | Error::Storage(_) => "서버 저장에 실패했어요 🥲".to_string(),
            other => format!("에러 발생: {}", other),
        }
    }

    /// Route the user should be sent to after seeing the alert, if any
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Error::LoginRequired | Error::MissingSession => Some(Route::LogIn),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
