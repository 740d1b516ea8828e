//! Home, search and genre listings

use cinevisor_tmdb::{MovieSummary, Page};
use tracing::debug;

use super::{MovieCard, PageLoader};
use crate::bookmarks::BookmarkTarget;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub heading: String,
    pub cards: Vec<MovieCard>,
    pub page: u32,
    pub total_pages: u32,
}

impl PageLoader {
    async fn catalog(&self, heading: String, page: Page<MovieSummary>) -> Result<CatalogPage> {
        let page = page.without_adult();
        let targets = page.results.iter().map(BookmarkTarget::from).collect();
        Ok(CatalogPage {
            heading,
            cards: self.cards(targets).await?,
            page: page.page,
            total_pages: page.total_pages,
        })
    }

    pub async fn home(&self, page: u32) -> Result<CatalogPage> {
        let movies = self.movies.popular(page).await?;
        self.catalog("인기 영화".to_string(), movies).await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<CatalogPage> {
        let movies = self.movies.search(query, page).await?;
        debug!("search {:?} returned {} movies", query, movies.results.len());
        self.catalog(format!("\"{}\" 검색 결과", query.trim()), movies)
            .await
    }

    pub async fn genre(&self, genre_id: u64, page: u32) -> Result<CatalogPage> {
        let genres = self.movies.genres().await?;
        let heading = genres
            .into_iter()
            .find(|g| g.id == genre_id)
            .map(|g| g.name)
            .unwrap_or_else(|| "장르".to_string());

        let movies = self.movies.discover_by_genre(genre_id, page).await?;
        self.catalog(heading, movies).await
    }
}
