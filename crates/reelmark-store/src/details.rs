//! Detail view: one item opened at a time, latest request wins.
#![allow(clippy::future_not_send)]

use reelmark_api::tmdb::LocalTmdbApi;
use reelmark_api::{Catalog, ContentDetails, ContentKey, MediaType};
use tokio::sync::watch;
use tracing::instrument;

use crate::generation::RequestGeneration;

/// What the detail view shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    /// No item open.
    #[default]
    Closed,
    /// Details of the item are being fetched.
    Loading(ContentKey),
    /// Details loaded.
    Loaded(Box<ContentDetails>),
    /// The detail fetch failed.
    Unavailable(ContentKey),
}

/// Detail modal state with stale-result protection.
#[derive(Debug)]
pub struct DetailView<'a, A> {
    catalog: &'a Catalog<A>,
    generation: RequestGeneration,
    tx: watch::Sender<DetailState>,
}

impl<'a, A> DetailView<'a, A> {
    /// Creates a closed view.
    #[must_use]
    pub fn new(catalog: &'a Catalog<A>) -> Self {
        Self {
            catalog,
            generation: RequestGeneration::new(),
            tx: watch::Sender::new(DetailState::Closed),
        }
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.tx.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DetailState {
        self.tx.borrow().clone()
    }

    /// Closes the view. Outstanding fetches will not publish.
    pub fn close(&self) {
        self.generation.invalidate();
        self.tx.send_replace(DetailState::Closed);
    }
}

impl<A: LocalTmdbApi> DetailView<'_, A> {
    /// Opens an item and fetches its details.
    ///
    /// Returns the published state, or `None` if a later `open` or
    /// [`Self::close`] superseded this request.
    #[instrument(skip_all, fields(id = id, media_type = %media_type))]
    pub async fn open(&self, id: u64, media_type: MediaType) -> Option<DetailState> {
        let ticket = self.generation.issue();
        let key = ContentKey::new(id, media_type);
        self.tx.send_replace(DetailState::Loading(key));

        let details = self.catalog.details(id, media_type).await;
        if !self.generation.is_current(ticket) {
            tracing::debug!(%key, "Detail result superseded");
            return None;
        }

        let state = details.map_or(DetailState::Unavailable(key), |d| {
            DetailState::Loaded(Box::new(d))
        });
        self.tx.send_replace(state.clone());
        Some(state)
    }
}
