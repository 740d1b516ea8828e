//! My Page: profile section and bookmarked movies

use super::{MovieCard, PageLoader};
use crate::bookmarks::{self, BookmarkTarget};
use crate::error::{Error, Result};
use crate::profile::ProfileView;

#[derive(Debug, Clone, PartialEq)]
pub struct MyPage {
    pub profile: ProfileView,
    pub bookmarks: Vec<MovieCard>,
}

impl PageLoader {
    pub async fn mypage(&self) -> Result<MyPage> {
        let user = self.ctx.current_user().await.ok_or(Error::LoginRequired)?;

        let cards = bookmarks::list(self.bookmarks.as_ref(), &user.id)
            .await?
            .iter()
            .map(|b| MovieCard::new(&BookmarkTarget::from(b), &self.image_base_url, true))
            .collect();

        Ok(MyPage {
            profile: ProfileView::from(&user),
            bookmarks: cards,
        })
    }
}
