//! Shared header state and user-facing notices

use crate::context::SessionState;
use crate::error::Error;
use crate::routes::Route;
use crate::user::DEFAULT_THUMBNAIL;

/// Header of the shared layout
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    pub logged_in: bool,
    pub nickname: String,
    pub avatar_url: String,
}

impl From<&SessionState> for NavState {
    fn from(state: &SessionState) -> Self {
        match &state.user {
            Some(user) if state.is_logged_in => Self {
                logged_in: true,
                nickname: user.display_nickname(),
                avatar_url: user.avatar_url(),
            },
            _ => Self {
                logged_in: false,
                nickname: String::new(),
                avatar_url: DEFAULT_THUMBNAIL.to_string(),
            },
        }
    }
}

/// Blocking alert shown when an action fails, and where to go afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub redirect: Option<Route>,
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        Self {
            message: err.alert_message(),
            redirect: err.redirect(),
        }
    }
}
