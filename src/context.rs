//! Application-wide session state

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::Result;
use crate::persist::{self, LocalStore, USER_INFO_KEY};
use crate::user::UserInfo;

/// Who is signed in. `is_logged_in` is true exactly when `user` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<UserInfo>,
    pub is_logged_in: bool,
}

/// Shared store for the signed-in user, passed to every page and action
#[derive(Clone)]
pub struct AppContext {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn LocalStore>,
}

impl AppContext {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            store,
        }
    }

    /// Load the persisted snapshot without touching the network
    pub async fn restore(&self) -> Result<Option<UserInfo>> {
        let user = match persist::get_item::<UserInfo>(self.store.as_ref(), USER_INFO_KEY) {
            Ok(user) => user,
            Err(e) => {
                warn!("ignoring unreadable user snapshot: {}", e);
                None
            }
        };

        let mut state = self.state.write().await;
        state.is_logged_in = user.is_some();
        state.user = user.clone();
        Ok(user)
    }

    /// Replace the signed-in user.
    ///
    /// The persisted copy is written first; if that fails nothing in memory
    /// changes.
    pub async fn set_user(&self, user: Option<UserInfo>) -> Result<()> {
        match &user {
            Some(user) => persist::set_item(self.store.as_ref(), USER_INFO_KEY, user)?,
            None => persist::remove_item(self.store.as_ref(), USER_INFO_KEY)?,
        }

        let mut state = self.state.write().await;
        debug!(
            "session state: {}",
            user.as_ref().map(|u| u.id.as_str()).unwrap_or("logged out")
        );
        state.is_logged_in = user.is_some();
        state.user = user;
        Ok(())
    }

    pub async fn current_user(&self) -> Option<UserInfo> {
        self.state.read().await.user.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.is_logged_in
    }

    /// Both fields, read under one lock
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }
}
