pub mod accumulator;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod mapping;
pub mod pipeline;
pub mod session;
pub mod snapshot;
pub mod source;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::CatalogConfig;
    pub use crate::error::FetchError;
    pub use crate::pipeline::{FeedController, Input, MovieUpdate, Output, Pipeline, Trigger, TvUpdate};
    pub use crate::session::{AuthError, LoginMethod, Session, SessionProvider, Token, User};
    pub use crate::snapshot::{Content, Item, Section, Snapshot};
    pub use crate::source::CatalogSource;
    pub use crate::types::{ContentKind, ListPage, Movie, MovieList, MovieResult, Review, Tv};
    pub use crate::Cinefeed;
}

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::client::HttpCatalog;
use crate::config::CatalogConfig;
use crate::error::FetchError;
use crate::pipeline::{FeedController, Output, Pipeline};
use crate::source::CatalogSource;
use crate::types::{ContentKind, ListPage, Review};

/// Async library entry point. Owns the configuration and a shared HTTP catalog.
pub struct Cinefeed {
    config: CatalogConfig,
    catalog: Arc<HttpCatalog>,
}

impl Cinefeed {
    /// Builds the HTTP client. Does not touch the network.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let catalog = HttpCatalog::new(&config).context("initializing catalog client")?;
        Ok(Self { config, catalog: Arc::new(catalog) })
    }

    pub fn config(&self) -> &CatalogConfig { &self.config }
    pub fn catalog(&self) -> Arc<HttpCatalog> { self.catalog.clone() }

    /// Starts a feed that loads TV immediately, the way the app opens.
    pub fn feed(&self) -> (FeedController, Output) { self.feed_with(Some(ContentKind::Tv)) }

    /// Starts a feed; with `None` nothing is fetched until the first trigger.
    /// Must be called inside a tokio runtime.
    pub fn feed_with(&self, initial: Option<ContentKind>) -> (FeedController, Output) {
        let (controller, triggers) = FeedController::channel(self.config.scroll_lookahead);
        let source: Arc<dyn CatalogSource> = self.catalog.clone();
        let mut pipeline = Pipeline::new(source);
        if let Some(kind) = initial {
            pipeline = pipeline.initial_load(kind);
        }
        (controller, pipeline.transform_ordered(triggers))
    }

    /// One page of reviews, fetched on demand outside any feed.
    pub async fn reviews(&self, id: u64, kind: ContentKind, page: u32) -> Result<ListPage<Review>, FetchError> {
        self.catalog.reviews(id, kind, page.max(1)).await
    }
}
