//! Feed pipeline: turns kind / page / keyword triggers into catalog fetches and
//! emits accumulated TV lists and joined movie results.
//!
//! One task owns all feed state (mode, accumulator, latest page and keyword).
//! Fetches run as child tasks in a `JoinSet` and report back tagged with the
//! request they were issued for; the owning task decides whether the result is
//! still wanted.

use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::{self, Stream, StreamExt};
use tokio::task::{AbortHandle, JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::accumulator::{Accumulator, ScrollPager};
use crate::coordinator::{ModeState, RequestTag};
use crate::error::FetchError;
use crate::source::CatalogSource;
use crate::types::{ContentKind, ListPage, MovieList, MovieResult, Tv};

pub type TvUpdate = Result<Vec<Tv>, FetchError>;
pub type MovieUpdate = Result<MovieResult, FetchError>;

/// One user event, in the order the user produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Kind(ContentKind),
    Page(u32),
    Keyword(String),
}

/// Independent trigger streams feeding a pipeline.
pub struct Input<K, P, W> {
    pub kind_trigger: K,
    pub page_trigger: P,
    pub keyword_trigger: W,
}

/// Output streams. Both stay open across errors and close once the input
/// has ended and the last fetch has settled.
pub struct Output {
    pub tv_list: UnboundedReceiver<TvUpdate>,
    pub movie_list: UnboundedReceiver<MovieUpdate>,
    pub task: JoinHandle<()>,
}

pub struct Pipeline {
    source: Arc<dyn CatalogSource>,
    initial: Option<ContentKind>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self { Self { source, initial: None } }

    /// Fetch this kind as soon as the pipeline starts.
    pub fn initial_load(mut self, kind: ContentKind) -> Self {
        self.initial = Some(kind);
        self
    }

    /// Spawns the pipeline over three separate streams. Events are taken in the
    /// order they become ready; the streams carry no order relative to each
    /// other. Use [`Pipeline::transform_ordered`] when one producer emits all
    /// three and their order matters.
    pub fn transform<K, P, W>(self, input: Input<K, P, W>) -> Output
    where
        K: Stream<Item = ContentKind> + Unpin + Send + 'static,
        P: Stream<Item = u32> + Unpin + Send + 'static,
        W: Stream<Item = String> + Unpin + Send + 'static,
    {
        let Input { kind_trigger, page_trigger, keyword_trigger } = input;
        let merged = stream::select(
            stream::select(kind_trigger.map(Trigger::Kind), page_trigger.map(Trigger::Page)),
            keyword_trigger.map(Trigger::Keyword),
        );
        self.transform_ordered(merged)
    }

    /// Spawns the pipeline task on the current tokio runtime. Triggers are
    /// applied strictly in stream order.
    pub fn transform_ordered<S>(self, triggers: S) -> Output
    where
        S: Stream<Item = Trigger> + Unpin + Send + 'static,
    {
        let (tv_tx, tv_rx) = mpsc::unbounded();
        let (movie_tx, movie_rx) = mpsc::unbounded();
        let driver = Driver::new(self.source, tv_tx, movie_tx);
        let task = tokio::spawn(driver.run(self.initial, triggers));
        Output { tv_list: tv_rx, movie_list: movie_rx, task }
    }
}

enum Completion {
    Tv(RequestTag, Result<ListPage<Tv>, FetchError>),
    Movie(RequestTag, MovieUpdate),
}

struct Driver {
    source: Arc<dyn CatalogSource>,
    mode: ModeState,
    tv: Accumulator<Tv>,
    // latest combined values for the TV path
    page: u32,
    keyword: String,
    tasks: JoinSet<Completion>,
    tv_task: Option<AbortHandle>,
    movie_task: Option<AbortHandle>,
    tv_out: UnboundedSender<TvUpdate>,
    movie_out: UnboundedSender<MovieUpdate>,
}

impl Driver {
    fn new(source: Arc<dyn CatalogSource>, tv_out: UnboundedSender<TvUpdate>, movie_out: UnboundedSender<MovieUpdate>) -> Self {
        Self {
            source,
            mode: ModeState::default(),
            tv: Accumulator::new(),
            page: 1,
            keyword: String::new(),
            tasks: JoinSet::new(),
            tv_task: None,
            movie_task: None,
            tv_out,
            movie_out,
        }
    }

    async fn run<S>(mut self, initial: Option<ContentKind>, mut triggers: S)
    where
        S: Stream<Item = Trigger> + Unpin,
    {
        let mut open = true;
        if let Some(kind) = initial {
            self.on_kind(kind);
        }
        loop {
            tokio::select! {
                trigger = triggers.next(), if open => match trigger {
                    Some(trigger) => self.on_trigger(trigger),
                    None => open = false,
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => match joined {
                    Ok(done) => self.on_completion(done),
                    Err(e) if e.is_cancelled() => debug!("superseded fetch cancelled"),
                    Err(e) => warn!(error = %e, "fetch task panicked"),
                },
                else => break,
            }
        }
        debug!("feed pipeline finished");
    }

    fn on_trigger(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Kind(kind) => self.on_kind(kind),
            Trigger::Page(page) => self.on_page(page),
            Trigger::Keyword(keyword) => self.on_keyword(keyword),
        }
    }

    fn on_kind(&mut self, kind: ContentKind) {
        info!(%kind, "content kind selected");
        match kind {
            ContentKind::Tv => {
                self.page = 1;
                self.issue_tv();
            }
            ContentKind::Movie => self.issue_movies(),
        }
    }

    fn on_page(&mut self, page: u32) {
        self.page = page.max(1);
        if self.mode.current_kind() == ContentKind::Tv {
            self.issue_tv();
        }
    }

    // A new keyword always starts over at page 1.
    fn on_keyword(&mut self, keyword: String) {
        self.keyword = keyword.trim().to_string();
        self.page = 1;
        if self.mode.current_kind() == ContentKind::Tv {
            self.issue_tv();
        }
    }

    fn issue_tv(&mut self) {
        self.cancel_in_flight();
        let tag = self.mode.begin(ContentKind::Tv, &self.keyword, self.page);
        debug!(seq = tag.seq, page = tag.page, keyword = %tag.keyword, "fetching tv page");
        let source = self.source.clone();
        let handle = self.tasks.spawn(async move {
            let result = source.tv_page(tag.page, &tag.keyword).await;
            Completion::Tv(tag, result)
        });
        self.tv_task = Some(handle);
    }

    fn issue_movies(&mut self) {
        self.cancel_in_flight();
        let tag = self.mode.begin(ContentKind::Movie, "", 1);
        debug!(seq = tag.seq, "fetching movie lists");
        let source = self.source.clone();
        let handle = self.tasks.spawn(async move {
            let (now_playing, popular, upcoming) = futures::join!(
                source.movies(MovieList::NowPlaying, tag.page),
                source.movies(MovieList::Popular, tag.page),
                source.movies(MovieList::Upcoming, tag.page),
            );
            Completion::Movie(tag, MovieResult::join(now_playing, popular, upcoming))
        });
        self.movie_task = Some(handle);
    }

    fn cancel_in_flight(&mut self) {
        for handle in [self.tv_task.take(), self.movie_task.take()].into_iter().flatten() {
            handle.abort();
        }
    }

    // A fetch may finish before the trigger superseding it is handled; its
    // completion still arrives and must fail the tag check.
    fn on_completion(&mut self, done: Completion) {
        match done {
            Completion::Tv(tag, result) => {
                if !self.mode.is_current(&tag) {
                    debug!(seq = tag.seq, "dropping stale tv response");
                    return;
                }
                self.tv_task = None;
                let update = result.map(|page| self.tv.advance(tag.page, &tag.keyword, tag.kind, page.results));
                match &update {
                    Ok(items) => debug!(seq = tag.seq, total = items.len(), "tv list updated"),
                    Err(e) => warn!(seq = tag.seq, error = %e, "tv fetch failed"),
                }
                if self.tv_out.unbounded_send(update).is_err() {
                    debug!(seq = tag.seq, "tv list receiver gone");
                }
            }
            Completion::Movie(tag, result) => {
                if !self.mode.is_current(&tag) {
                    debug!(seq = tag.seq, "dropping stale movie response");
                    return;
                }
                self.movie_task = None;
                if let Err(e) = &result {
                    warn!(seq = tag.seq, error = %e, "movie fetch failed");
                }
                if self.movie_out.unbounded_send(result).is_err() {
                    debug!(seq = tag.seq, "movie list receiver gone");
                }
            }
        }
    }
}

/// Sending side of a feed, as a UI would hold it. Every event goes down one
/// channel, so the pipeline sees them in the order they were made.
pub struct FeedController {
    tx: UnboundedSender<Trigger>,
    pager: ScrollPager,
    kind: ContentKind,
}

impl FeedController {
    pub fn channel(lookahead: usize) -> (Self, UnboundedReceiver<Trigger>) {
        let (tx, rx) = mpsc::unbounded();
        (Self { tx, pager: ScrollPager::new(lookahead), kind: ContentKind::Tv }, rx)
    }

    pub fn kind(&self) -> ContentKind { self.kind }

    /// Returns false once the pipeline has gone away.
    pub fn switch_kind(&mut self, kind: ContentKind) -> bool {
        self.kind = kind;
        self.pager.reset();
        self.tx.unbounded_send(Trigger::Kind(kind)).is_ok()
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) -> bool {
        self.pager.reset();
        self.tx.unbounded_send(Trigger::Keyword(keyword.into())).is_ok()
    }

    pub fn advance_page(&mut self, page: u32) -> bool { self.tx.unbounded_send(Trigger::Page(page)).is_ok() }

    /// Report the last visible item of the TV list; requests the next page when
    /// the end is near. Returns the page requested, if any.
    pub fn scrolled(&mut self, last_visible: usize, item_count: usize) -> Option<u32> {
        if self.kind != ContentKind::Tv {
            return None;
        }
        let page = self.pager.observe(last_visible, item_count)?;
        self.tx.unbounded_send(Trigger::Page(page)).ok()?;
        Some(page)
    }

    /// Report that a page requested by [`FeedController::scrolled`] came back as
    /// an error, so scrolling near the end asks for it again.
    pub fn page_failed(&mut self, page: u32) { self.pager.failed(page); }
}
