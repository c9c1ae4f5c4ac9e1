//! Shared content store.
//!
//! Holds the three top-level content lists and the genre catalog. A single
//! load fetches all four concurrently and publishes them in one snapshot;
//! if any fetch fails the snapshot carries empty lists and a generic error
//! instead of a partial result.
#![allow(clippy::future_not_send)]

use reelmark_api::tmdb::LocalTmdbApi;
use reelmark_api::{Catalog, ContentItem, Genre};
use tokio::sync::watch;
use tracing::instrument;

/// Message published when the aggregate load fails.
pub const LOAD_FAILED_MESSAGE: &str = "failed to load content";

/// Lifecycle of the content store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// All lists loaded.
    Ready,
    /// The last load failed; lists are empty.
    Failed(String),
}

/// Everything the store publishes, replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSnapshot {
    /// Load lifecycle.
    pub state: LoadState,
    /// Trending movies and series.
    pub trending: Vec<ContentItem>,
    /// Popular movies and series.
    pub popular: Vec<ContentItem>,
    /// Top-rated movies and series.
    pub top_rated: Vec<ContentItem>,
    /// Movie and TV genres.
    pub genres: Vec<Genre>,
}

impl ContentSnapshot {
    /// Returns `true` while a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Returns `true` once every list has loaded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready)
    }

    /// Error message of a failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Observable store of the shared content lists.
#[derive(Debug)]
pub struct ContentStore {
    tx: watch::Sender<ContentSnapshot>,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore {
    /// Creates an idle store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(ContentSnapshot::default()),
        }
    }

    /// Subscribes to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ContentSnapshot> {
        self.tx.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ContentSnapshot {
        self.tx.borrow().clone()
    }

    /// Loads trending, popular, top-rated and genres concurrently and
    /// publishes the outcome. Calling it again performs a full reload.
    ///
    /// Returns the state the store ended in.
    #[instrument(skip_all)]
    pub async fn load<A: LocalTmdbApi>(&self, catalog: &Catalog<A>) -> LoadState {
        self.tx.send_modify(|snapshot| snapshot.state = LoadState::Loading);

        let result = futures::try_join!(
            catalog.try_trending(),
            catalog.try_popular(),
            catalog.try_top_rated(),
            catalog.try_genres(),
        );

        let snapshot = match result {
            Ok((trending, popular, top_rated, genres)) => {
                tracing::info!(
                    trending = trending.len(),
                    popular = popular.len(),
                    top_rated = top_rated.len(),
                    genres = genres.len(),
                    "Content loaded"
                );
                ContentSnapshot {
                    state: LoadState::Ready,
                    trending,
                    popular,
                    top_rated,
                    genres,
                }
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "Content load failed");
                ContentSnapshot {
                    state: LoadState::Failed(String::from(LOAD_FAILED_MESSAGE)),
                    ..ContentSnapshot::default()
                }
            }
        };

        let state = snapshot.state.clone();
        self.tx.send_replace(snapshot);
        state
    }
}
