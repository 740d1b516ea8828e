//! Movie detail page

use cinevisor_tmdb::{image_url, CastMember};
use tracing::warn;

use super::{detailed_keywords, poster_url, score_color, Meta, MovieCard, PageLoader, DEFAULT_IMAGE};
use crate::bookmarks::{self, BookmarkTarget};
use crate::error::Result;
use crate::routes::Route;

/// Shown when the movie has no Korean overview
pub const NO_OVERVIEW: &str = "한국어로 작성된 시놉시스가 아직 없습니다.";

/// How many cast members the credit slider shows
const CAST_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct GenreLink {
    pub name: String,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastCard {
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
    /// Score rounded to one decimal
    pub score: f64,
    pub score_color: &'static str,
    pub genres: Vec<GenreLink>,
    pub overview: String,
    pub bookmarked: bool,
    pub cast: Vec<CastCard>,
    pub similar: Vec<MovieCard>,
    pub meta: Meta,
    /// What the bookmark button toggles
    pub target: BookmarkTarget,
}

fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

impl PageLoader {
    fn cast_cards(&self, mut cast: Vec<CastMember>) -> Vec<CastCard> {
        cast.sort_by_key(|c| c.order);
        cast.into_iter()
            .take(CAST_LIMIT)
            .map(|c| CastCard {
                name: c.name,
                character: c.character.unwrap_or_default(),
                profile_url: c
                    .profile_path
                    .as_deref()
                    .map(|p| image_url(&self.image_base_url, p)),
            })
            .collect()
    }

    pub async fn detail(&self, id: u64) -> Result<DetailPage> {
        let movie = self.movies.details(id).await?;

        // Cast, similar movies and the bookmark flag are extras; the page shows without them
        let cast = match self.movies.credits(id).await {
            Ok(credits) => self.cast_cards(credits.cast),
            Err(e) => {
                warn!("credits for {} unavailable: {}", id, e);
                Vec::new()
            }
        };
        let similar_targets: Vec<BookmarkTarget> = match self.movies.similar(id, 1).await {
            Ok(page) => page.without_adult().results.iter().map(BookmarkTarget::from).collect(),
            Err(e) => {
                warn!("similar movies for {} unavailable: {}", id, e);
                Vec::new()
            }
        };
        let similar = match self.cards(similar_targets).await {
            Ok(cards) => cards,
            Err(e) => {
                warn!("bookmark flags for similar movies of {} unavailable: {}", id, e);
                Vec::new()
            }
        };

        let bookmarked = match self.ctx.current_user().await {
            Some(user) => bookmarks::is_bookmarked(self.bookmarks.as_ref(), &user.id, movie.id)
                .await
                .unwrap_or_else(|e| {
                    warn!("bookmark state of {} unavailable: {}", movie.id, e);
                    false
                }),
            None => false,
        };

        let overview = movie
            .overview
            .clone()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| NO_OVERVIEW.to_string());

        let meta = Meta {
            title: format!("{} | CineVisor", movie.title),
            description: overview.clone(),
            keywords: detailed_keywords(&movie.title),
            image: match movie.poster_path.as_deref() {
                Some(path) => image_url(&self.image_base_url, path),
                None => DEFAULT_IMAGE.to_string(),
            },
            url: format!("{}/details/{}", self.site_url, movie.id),
            ..Meta::default()
        };

        let target = BookmarkTarget::from(&movie);

        Ok(DetailPage {
            id: movie.id,
            poster_url: poster_url(&self.image_base_url, movie.poster_path.as_deref()),
            score: round_score(movie.vote_average),
            score_color: score_color(movie.vote_average),
            genres: movie
                .genres
                .iter()
                .map(|g| GenreLink {
                    name: g.name.clone(),
                    route: Route::Genre { id: g.id },
                })
                .collect(),
            overview,
            bookmarked,
            cast,
            similar,
            meta,
            target,
            title: movie.title,
        })
    }
}
