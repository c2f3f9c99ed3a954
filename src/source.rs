use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{ContentKind, ListPage, Movie, MovieList, Review, Tv};

/// Listing calls the feed pipeline needs from a catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn tv_top_rated(&self, page: u32) -> Result<ListPage<Tv>, FetchError>;
    async fn tv_search(&self, page: u32, query: &str) -> Result<ListPage<Tv>, FetchError>;
    async fn movies(&self, list: MovieList, page: u32) -> Result<ListPage<Movie>, FetchError>;
    async fn reviews(&self, id: u64, kind: ContentKind, page: u32) -> Result<ListPage<Review>, FetchError>;

    /// Top-rated listing for an empty keyword, search otherwise.
    async fn tv_page(&self, page: u32, keyword: &str) -> Result<ListPage<Tv>, FetchError> {
        if keyword.is_empty() {
            self.tv_top_rated(page).await
        } else {
            self.tv_search(page, keyword).await
        }
    }
}
