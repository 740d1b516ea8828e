//! Page loaders and the view models they return

mod card;
mod catalog;
mod detail;
mod layout;
mod meta;
mod mypage;

use std::collections::HashSet;
use std::sync::Arc;

use cinevisor_tmdb::TmdbClient;

use crate::backend::BookmarkStore;
use crate::bookmarks::{self, BookmarkTarget};
use crate::context::AppContext;
use crate::error::Result;

pub use card::*;
pub use catalog::*;
pub use detail::*;
pub use layout::*;
pub use meta::*;
pub use mypage::*;

/// Loads the data behind each page
#[derive(Clone)]
pub struct PageLoader {
    movies: TmdbClient,
    bookmarks: Arc<dyn BookmarkStore>,
    ctx: AppContext,
    image_base_url: String,
    site_url: String,
}

impl PageLoader {
    pub fn new(
        movies: TmdbClient,
        bookmarks: Arc<dyn BookmarkStore>,
        ctx: AppContext,
        image_base_url: &str,
        site_url: &str,
    ) -> Self {
        Self {
            movies,
            bookmarks,
            ctx,
            image_base_url: image_base_url.to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Cards for `movies`, with the bookmark flag filled in for a signed-in user
    async fn cards(&self, movies: Vec<BookmarkTarget>) -> Result<Vec<MovieCard>> {
        let bookmarked: HashSet<u64> = match self.ctx.current_user().await {
            Some(user) if !movies.is_empty() => bookmarks::list(self.bookmarks.as_ref(), &user.id)
                .await?
                .into_iter()
                .map(|b| b.movie_id)
                .collect(),
            _ => HashSet::new(),
        };

        Ok(movies
            .iter()
            .map(|movie| MovieCard::new(movie, &self.image_base_url, bookmarked.contains(&movie.id)))
            .collect())
    }
}
