use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Which catalog family a feed is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Tv,
    Movie,
}

impl ContentKind {
    /// Path segment used by the catalog (`/tv/...`, `/movie/...`).
    pub fn as_path(&self) -> &'static str {
        match self {
            ContentKind::Tv => "tv",
            ContentKind::Movie => "movie",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_path()) }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tv" => Ok(ContentKind::Tv),
            "movie" | "movies" => Ok(ContentKind::Movie),
            other => Err(format!("unknown content kind `{}` (expected tv or movie)", other)),
        }
    }
}

/// One page of a catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListPage<T> {
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> ListPage<T> {
    /// Converts every result, keeping the paging fields.
    pub fn convert<U: From<T>>(self) -> ListPage<U> {
        ListPage {
            page: self.page,
            results: self.results.into_iter().map(U::from).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tv {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub poster_url: String,
    pub vote: String,
    pub first_air_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    pub vote: String,
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    pub url: String,
    pub created_at: String,
    pub rating: Option<f32>,
}

/// The three movie sub-lists shown together on the movie tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    NowPlaying,
    Popular,
    Upcoming,
}

impl MovieList {
    pub const ALL: [MovieList; 3] = [MovieList::NowPlaying, MovieList::Popular, MovieList::Upcoming];

    pub fn path(&self) -> &'static str {
        match self {
            MovieList::NowPlaying => "/movie/now_playing",
            MovieList::Popular => "/movie/popular",
            MovieList::Upcoming => "/movie/upcoming",
        }
    }
}

impl fmt::Display for MovieList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MovieList::NowPlaying => "now playing",
            MovieList::Popular => "popular",
            MovieList::Upcoming => "upcoming",
        })
    }
}

/// All three movie sub-lists fetched for one trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResult {
    pub now_playing: ListPage<Movie>,
    pub popular: ListPage<Movie>,
    pub upcoming: ListPage<Movie>,
}

impl MovieResult {
    /// Joins the three sub-fetches. Any failure fails the whole result; partial
    /// successes are discarded.
    pub fn join(
        now_playing: Result<ListPage<Movie>, FetchError>,
        popular: Result<ListPage<Movie>, FetchError>,
        upcoming: Result<ListPage<Movie>, FetchError>,
    ) -> Result<Self, FetchError> {
        match (now_playing, popular, upcoming) {
            (Ok(now_playing), Ok(popular), Ok(upcoming)) => Ok(Self { now_playing, popular, upcoming }),
            (a, b, c) => {
                let failures = [(MovieList::NowPlaying, a.err()), (MovieList::Popular, b.err()), (MovieList::Upcoming, c.err())]
                    .into_iter()
                    .filter_map(|(list, e)| e.map(|e| (list, e)))
                    .collect();
                Err(FetchError::Aggregate(failures))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize) -> ListPage<Movie> {
        ListPage {
            page: 1,
            results: (0..n as u64)
                .map(|id| Movie { id, title: format!("m{}", id), overview: String::new(), poster_url: String::new(), vote: "0.0 (0)".into(), release_date: String::new() })
                .collect(),
            total_pages: 1,
            total_results: n as u32,
        }
    }

    #[test]
    fn join_succeeds_only_with_all_three() {
        let joined = MovieResult::join(Ok(page(2)), Ok(page(3)), Ok(page(1))).unwrap();
        assert_eq!(joined.now_playing.results.len(), 2);
        assert_eq!(joined.popular.results.len(), 3);
        assert_eq!(joined.upcoming.results.len(), 1);
    }

    #[test]
    fn join_reports_every_failed_list() {
        let err = MovieResult::join(Ok(page(2)), Err(FetchError::Timeout), Err(FetchError::Decode("bad".into()))).unwrap_err();
        match err {
            FetchError::Aggregate(failures) => {
                assert_eq!(failures, vec![(MovieList::Popular, FetchError::Timeout), (MovieList::Upcoming, FetchError::Decode("bad".into()))]);
            }
            other => panic!("expected aggregate error, got {:?}", other),
        }
    }

    #[test]
    fn content_kind_parses_cli_spellings() {
        assert_eq!("TV".parse::<ContentKind>().unwrap(), ContentKind::Tv);
        assert_eq!("movies".parse::<ContentKind>().unwrap(), ContentKind::Movie);
        assert!("anime".parse::<ContentKind>().is_err());
    }

    #[test]
    fn movie_result_reads_back_what_it_writes() {
        let result = MovieResult::join(Ok(page(2)), Ok(page(1)), Ok(page(0))).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(serde_json::from_str::<MovieResult>(&json).unwrap(), result);
    }

    #[test]
    fn tv_and_review_read_back_what_they_write() {
        let tv = Tv { id: 1, name: "Dark".into(), overview: String::new(), poster_url: "p".into(), vote: "8.4 (9)".into(), first_air_date: "2017-12-01".into() };
        assert_eq!(serde_json::from_str::<Tv>(&serde_json::to_string(&tv).unwrap()).unwrap(), tv);
        let review = Review { id: "r1".into(), author: "a".into(), content: "c".into(), url: String::new(), created_at: String::new(), rating: None };
        assert_eq!(serde_json::from_str::<Review>(&serde_json::to_string(&review).unwrap()).unwrap(), review);
    }
}
