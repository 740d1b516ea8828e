//! Bookmark toggling for movie cards and the detail page

use cinevisor_tmdb::{MovieDetail, MovieSummary};
use tracing::info;

use crate::backend::{Bookmark, BookmarkStore};
use crate::context::AppContext;
use crate::error::{Error, Result};

/// The fields a bookmark row copies from the movie
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkTarget {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: f64,
}

impl From<&MovieSummary> for BookmarkTarget {
    fn from(movie: &MovieSummary) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            vote_average: movie.vote_average,
        }
    }
}

impl From<&MovieDetail> for BookmarkTarget {
    fn from(movie: &MovieDetail) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            vote_average: movie.vote_average,
        }
    }
}

impl From<&Bookmark> for BookmarkTarget {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.movie_id,
            title: bookmark.title.clone(),
            poster_path: bookmark.poster_path.clone(),
            vote_average: bookmark.vote_average,
        }
    }
}

pub async fn is_bookmarked(store: &dyn BookmarkStore, user_id: &str, movie_id: u64) -> Result<bool> {
    store.exists(user_id, movie_id).await
}

pub async fn add_bookmark(store: &dyn BookmarkStore, user_id: &str, movie: &BookmarkTarget) -> Result<()> {
    store
        .insert(Bookmark {
            user_id: user_id.to_string(),
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            vote_average: movie.vote_average,
        })
        .await
}

pub async fn remove_bookmark(store: &dyn BookmarkStore, user_id: &str, movie_id: u64) -> Result<()> {
    store.delete(user_id, movie_id).await
}

pub async fn list(store: &dyn BookmarkStore, user_id: &str) -> Result<Vec<Bookmark>> {
    store.list(user_id).await
}

/// Flip the bookmark on `movie` for the signed-in user and return the new state
pub async fn toggle(store: &dyn BookmarkStore, ctx: &AppContext, movie: &BookmarkTarget) -> Result<bool> {
    let user = ctx.current_user().await.ok_or(Error::LoginRequired)?;

    if is_bookmarked(store, &user.id, movie.id).await? {
        remove_bookmark(store, &user.id, movie.id).await?;
        info!("unbookmarked {} for {}", movie.id, user.id);
        Ok(false)
    } else {
        add_bookmark(store, &user.id, movie).await?;
        info!("bookmarked {} for {}", movie.id, user.id);
        Ok(true)
    }
}
