use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::mapping::{MovieRecord, ReviewRecord, TvRecord};
use crate::error::FetchError;
use crate::source::CatalogSource;
use crate::types::{ContentKind, ListPage, Movie, MovieList, Review, Tv};

/// Per-request parameters appended after `api_key`/`language`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Params<'a> {
    pub page: Option<u32>,
    pub query: Option<&'a str>,
    /// Overrides the configured language for this call.
    pub language: Option<&'a str>,
}

impl<'a> Params<'a> {
    pub fn page(page: u32) -> Self { Self { page: Some(page), ..Default::default() } }
    pub fn with_query(mut self, query: &'a str) -> Self { self.query = Some(query); self }
    pub fn with_language(mut self, language: &'a str) -> Self { self.language = Some(language); self }
}

/// Typed GET against the catalog for one decodable result family.
pub struct Catalog<T> {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for Catalog<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            language: self.language.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Catalog<T> {
    pub fn new(http: reqwest::Client, config: &CatalogConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            _payload: PhantomData,
        }
    }

    pub fn url_for(&self, path: &str, params: &Params<'_>) -> Result<Url, FetchError> {
        let mut pairs: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("language", params.language.unwrap_or(&self.language).to_string()),
        ];
        if let Some(page) = params.page { pairs.push(("page", page.to_string())); }
        if let Some(q) = params.query { pairs.push(("query", q.to_string())); }
        Url::parse_with_params(&format!("{}{}", self.base_url, path), &pairs)
            .map_err(|e| FetchError::InvalidRequest(format!("{}{}: {}", self.base_url, path, e)))
    }

    pub async fn fetch(&self, path: &str, params: Params<'_>) -> Result<T, FetchError> {
        let url = self.url_for(path, &params)?;
        debug!(path, page = ?params.page, query = ?params.query, "catalog request");
        let resp = self.http.get(url).send().await.map_err(|e| {
            warn!(path, error = %e, "catalog request failed");
            FetchError::from(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(path, status = status.as_u16(), "catalog returned error status");
            return Err(FetchError::Status { status: status.as_u16(), body });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(path, error = %e, "catalog payload did not decode");
            FetchError::from(e)
        })
    }
}

#[derive(Clone)]
pub struct TvCatalog {
    network: Catalog<ListPage<TvRecord>>,
}

impl TvCatalog {
    pub fn new(network: Catalog<ListPage<TvRecord>>) -> Self { Self { network } }

    pub async fn top_rated(&self, page: u32) -> Result<ListPage<Tv>, FetchError> {
        self.network.fetch("/tv/top_rated", Params::page(page)).await.map(ListPage::convert)
    }

    pub async fn search(&self, page: u32, query: &str) -> Result<ListPage<Tv>, FetchError> {
        self.network.fetch("/search/tv", Params::page(page).with_query(query)).await.map(ListPage::convert)
    }
}

#[derive(Clone)]
pub struct MovieCatalog {
    network: Catalog<ListPage<MovieRecord>>,
}

impl MovieCatalog {
    pub fn new(network: Catalog<ListPage<MovieRecord>>) -> Self { Self { network } }

    pub async fn list(&self, list: MovieList, page: u32) -> Result<ListPage<Movie>, FetchError> {
        self.network.fetch(list.path(), Params::page(page)).await.map(ListPage::convert)
    }

    pub async fn now_playing(&self, page: u32) -> Result<ListPage<Movie>, FetchError> { self.list(MovieList::NowPlaying, page).await }
    pub async fn popular(&self, page: u32) -> Result<ListPage<Movie>, FetchError> { self.list(MovieList::Popular, page).await }
    pub async fn upcoming(&self, page: u32) -> Result<ListPage<Movie>, FetchError> { self.list(MovieList::Upcoming, page).await }
}

#[derive(Clone)]
pub struct ReviewCatalog {
    network: Catalog<ListPage<ReviewRecord>>,
    language: String,
}

impl ReviewCatalog {
    pub fn new(network: Catalog<ListPage<ReviewRecord>>, language: impl Into<String>) -> Self {
        Self { network, language: language.into() }
    }

    pub async fn reviews(&self, id: u64, kind: ContentKind, page: u32) -> Result<ListPage<Review>, FetchError> {
        let path = format!("/{}/{}/reviews", kind.as_path(), id);
        self.network.fetch(&path, Params::page(page).with_language(&self.language)).await.map(ListPage::convert)
    }
}

/// HTTP-backed catalog: one typed client per result family over a shared connection pool.
#[derive(Clone)]
pub struct HttpCatalog {
    tv: TvCatalog,
    movie: MovieCatalog,
    review: ReviewCatalog,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent("cinefeed/0.1")
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::InvalidRequest(format!("building http client: {}", e)))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: &CatalogConfig) -> Self {
        Self {
            tv: TvCatalog::new(Catalog::new(http.clone(), config)),
            movie: MovieCatalog::new(Catalog::new(http.clone(), config)),
            review: ReviewCatalog::new(Catalog::new(http, config), config.review_language.clone()),
        }
    }

    pub fn tv(&self) -> &TvCatalog { &self.tv }
    pub fn movie(&self) -> &MovieCatalog { &self.movie }
    pub fn review(&self) -> &ReviewCatalog { &self.review }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn tv_top_rated(&self, page: u32) -> Result<ListPage<Tv>, FetchError> { self.tv.top_rated(page).await }

    async fn tv_search(&self, page: u32, query: &str) -> Result<ListPage<Tv>, FetchError> { self.tv.search(page, query).await }

    async fn movies(&self, list: MovieList, page: u32) -> Result<ListPage<Movie>, FetchError> { self.movie.list(list, page).await }

    async fn reviews(&self, id: u64, kind: ContentKind, page: u32) -> Result<ListPage<Review>, FetchError> {
        self.review.reviews(id, kind, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog<ListPage<TvRecord>> {
        let cfg = CatalogConfig { api_key: "KEY".into(), base_url: "https://api.example.org/3/".into(), ..Default::default() };
        Catalog::new(reqwest::Client::new(), &cfg)
    }

    #[test]
    fn url_keeps_base_path_and_encodes_query() {
        let url = catalog().url_for("/search/tv", &Params::page(2).with_query("the office")).unwrap();
        assert_eq!(url.path(), "/3/search/tv");
        assert_eq!(url.query(), Some("api_key=KEY&language=ko&page=2&query=the+office"));
    }

    #[test]
    fn language_override_applies_per_call() {
        let url = catalog().url_for("/tv/1/reviews", &Params::page(1).with_language("en")).unwrap();
        assert!(url.query().unwrap().contains("language=en"));
    }

    #[test]
    fn bad_base_url_is_an_invalid_request() {
        let cfg = CatalogConfig { base_url: "not a url".into(), ..Default::default() };
        let c: Catalog<ListPage<TvRecord>> = Catalog::new(reqwest::Client::new(), &cfg);
        assert!(matches!(c.url_for("/tv/top_rated", &Params::default()), Err(FetchError::InvalidRequest(_))));
    }
}
