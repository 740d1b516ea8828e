//! Page routes

use std::fmt;

use url::form_urlencoded;

use crate::auth::OAuthProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search { query: String },
    Details { id: u64 },
    Genre { id: u64 },
    MyPage,
    SignUp,
    LogIn,
    OAuthCallback(OAuthProvider),
}

impl Route {
    /// Match a path, with optional query string, to a route
    pub fn parse(path: &str) -> Option<Route> {
        let without_fragment = path.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Home,
            ["search"] => {
                let query = form_urlencoded::parse(query.as_bytes())
                    .find(|(k, _)| k == "query")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                Route::Search { query }
            }
            ["details", id] => Route::Details { id: id.parse().ok()? },
            ["genres", id] => Route::Genre { id: id.parse().ok()? },
            ["mypage"] => Route::MyPage,
            ["signup"] => Route::SignUp,
            ["login"] => Route::LogIn,
            ["oauth", provider] => Route::OAuthCallback(provider.parse().ok()?),
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Search { query } => {
                let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
                format!("/search?query={}", encoded)
            }
            Route::Details { id } => format!("/details/{}", id),
            Route::Genre { id } => format!("/genres/{}", id),
            Route::MyPage => "/mypage".to_string(),
            Route::SignUp => "/signup".to_string(),
            Route::LogIn => "/login".to_string(),
            Route::OAuthCallback(provider) => format!("/oauth/{}", provider),
        }
    }

    /// Whether the page is wrapped in the shared header layout
    pub fn uses_layout(&self) -> bool {
        matches!(
            self,
            Route::Home | Route::Search { .. } | Route::Details { .. } | Route::Genre { .. } | Route::MyPage
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
