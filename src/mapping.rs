use serde::Deserialize;

use crate::types::{Movie, Review, Tv};

/// Prefix for `poster_path` values.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// Wire records as the catalog sends them. Clients decode these and convert.

#[derive(Deserialize)]
pub struct TvRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: u64,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

#[derive(Deserialize)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: u64,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewRecord {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub author_details: Option<AuthorDetails>,
}

#[derive(Deserialize)]
pub struct AuthorDetails {
    #[serde(default)]
    pub rating: Option<f32>,
}

/// `"{average} ({count})"`, with whole averages keeping one decimal (`8.0`).
pub fn format_vote(average: f32, count: u64) -> String {
    if average.fract() == 0.0 {
        format!("{:.1} ({})", average, count)
    } else {
        format!("{} ({})", average, count)
    }
}

pub fn poster_url(path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}{}", POSTER_BASE_URL, p),
        _ => String::new(),
    }
}

impl From<TvRecord> for Tv {
    fn from(r: TvRecord) -> Self {
        Tv {
            id: r.id,
            name: r.name,
            overview: r.overview.unwrap_or_default(),
            poster_url: poster_url(r.poster_path.as_deref()),
            vote: format_vote(r.vote_average, r.vote_count),
            first_air_date: r.first_air_date.unwrap_or_default(),
        }
    }
}

impl From<MovieRecord> for Movie {
    fn from(r: MovieRecord) -> Self {
        Movie {
            id: r.id,
            title: r.title,
            overview: r.overview.unwrap_or_default(),
            poster_url: poster_url(r.poster_path.as_deref()),
            vote: format_vote(r.vote_average, r.vote_count),
            release_date: r.release_date.unwrap_or_default(),
        }
    }
}

impl From<ReviewRecord> for Review {
    fn from(r: ReviewRecord) -> Self {
        Review {
            id: r.id,
            author: r.author,
            content: r.content,
            url: r.url,
            created_at: r.created_at,
            rating: r.author_details.and_then(|d| d.rating),
        }
    }
}
