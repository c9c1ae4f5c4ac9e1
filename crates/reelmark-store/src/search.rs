//! Debounced search session.
//!
//! Each submission waits out the debounce delay, then fetches. A newer
//! submission supersedes older ones: their results are dropped instead of
//! published, so the dropdown always shows the latest query.
#![allow(clippy::future_not_send)]

use std::time::Duration;

use reelmark_api::tmdb::LocalTmdbApi;
use reelmark_api::{Catalog, ContentItem};
use tokio::sync::watch;
use tracing::instrument;

use crate::generation::RequestGeneration;

/// Tunables of a [`SearchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Delay between a submission and its fetch.
    pub debounce: Duration,
    /// Shortest trimmed query that triggers a fetch.
    pub min_query_len: usize,
    /// Results kept per query.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_len: 2,
            max_results: 8,
        }
    }
}

/// Results published for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Query as submitted.
    pub query: String,
    /// Matching items, at most `max_results`.
    pub items: Vec<ContentItem>,
}

/// Search dropdown state.
#[derive(Debug)]
pub struct SearchSession<'a, A> {
    catalog: &'a Catalog<A>,
    settings: SearchSettings,
    generation: RequestGeneration,
    tx: watch::Sender<SearchResults>,
}

impl<'a, A> SearchSession<'a, A> {
    /// Creates a session with default settings.
    #[must_use]
    pub fn new(catalog: &'a Catalog<A>) -> Self {
        Self::with_settings(catalog, SearchSettings::default())
    }

    /// Creates a session with explicit settings.
    #[must_use]
    pub fn with_settings(catalog: &'a Catalog<A>, settings: SearchSettings) -> Self {
        Self {
            catalog,
            settings,
            generation: RequestGeneration::new(),
            tx: watch::Sender::new(SearchResults::default()),
        }
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> SearchSettings {
        self.settings
    }

    /// Subscribes to published results.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.tx.subscribe()
    }

    /// Latest published results.
    #[must_use]
    pub fn results(&self) -> SearchResults {
        self.tx.borrow().clone()
    }

    /// Clears the results and drops every outstanding submission.
    pub fn clear(&self) {
        self.generation.invalidate();
        self.tx.send_replace(SearchResults::default());
    }
}

impl<A: LocalTmdbApi> SearchSession<'_, A> {
    /// Submits a query.
    ///
    /// Queries shorter than `min_query_len` (after trimming) publish an
    /// empty result without fetching, as does any query when `max_results`
    /// is zero. Returns the published items, or
    /// `None` if a newer submission or [`Self::clear`] superseded this one.
    #[instrument(skip_all, fields(query = query))]
    pub async fn submit(&self, query: &str) -> Option<Vec<ContentItem>> {
        let ticket = self.generation.issue();
        tokio::time::sleep(self.settings.debounce).await;
        if !self.generation.is_current(ticket) {
            tracing::debug!("Search superseded during debounce");
            return None;
        }

        let trimmed = query.trim();
        let items = if self.settings.max_results == 0
            || trimmed.chars().count() < self.settings.min_query_len
        {
            Vec::new()
        } else {
            let mut items = self.catalog.search(trimmed).await;
            items.truncate(self.settings.max_results);
            items
        };

        if !self.generation.is_current(ticket) {
            tracing::debug!("Search superseded while fetching");
            return None;
        }

        self.tx.send_replace(SearchResults {
            query: String::from(query),
            items: items.clone(),
        });
        Some(items)
    }
}
