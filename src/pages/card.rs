//! Movie card shown in every listing

use cinevisor_tmdb::image_url;

use crate::bookmarks::BookmarkTarget;

/// Poster shown when a movie has none
pub const NO_POSTER: &str = "/assets/no-poster.webp";

/// Colour of the score bar
pub fn score_color(score: f64) -> &'static str {
    if score >= 8.0 {
        "#ff5f5f"
    } else if score >= 6.0 {
        "#fb923c"
    } else {
        "#facc15"
    }
}

pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> String {
    match poster_path.filter(|p| !p.is_empty()) {
        Some(path) => image_url(image_base_url, path),
        None => NO_POSTER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
    pub score: f64,
    /// Width of the score bar, 0 to 100
    pub score_width: f64,
    pub score_color: &'static str,
    pub bookmarked: bool,
}

impl MovieCard {
    pub fn new(movie: &BookmarkTarget, image_base_url: &str, bookmarked: bool) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: poster_url(image_base_url, movie.poster_path.as_deref()),
            score: movie.vote_average,
            score_width: (movie.vote_average * 10.0).clamp(0.0, 100.0),
            score_color: score_color(movie.vote_average),
            bookmarked,
        }
    }

    /// Heart shown on the card
    pub fn bookmark_icon(&self) -> &'static str {
        if self.bookmarked {
            "❤️"
        } else {
            "🤍"
        }
    }
}
