//! Genre browser: which genres have content for a page, and the grid of
//! items for the selected one.
#![allow(clippy::future_not_send)]

use futures::future::join_all;
use reelmark_api::tmdb::LocalTmdbApi;
use reelmark_api::{Catalog, ContentItem, DEFAULT_GENRE_ITEMS, Genre};
use tracing::instrument;

use crate::views::MediaFilter;

/// Items shown in a genre grid.
pub const DEFAULT_GRID_SIZE: usize = 30;

/// Browses genres for one page's media filter.
#[derive(Debug)]
pub struct GenreBrowser<'a, A> {
    catalog: &'a Catalog<A>,
    filter: MediaFilter,
    items_to_fetch: usize,
    grid_size: usize,
}

impl<'a, A> GenreBrowser<'a, A> {
    /// Creates a browser with the default fetch and grid sizes.
    #[must_use]
    pub const fn new(catalog: &'a Catalog<A>, filter: MediaFilter) -> Self {
        Self {
            catalog,
            filter,
            items_to_fetch: DEFAULT_GENRE_ITEMS,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }

    /// Overrides how many items are fetched per genre and how many are kept.
    #[must_use]
    pub const fn with_limits(mut self, items_to_fetch: usize, grid_size: usize) -> Self {
        self.items_to_fetch = items_to_fetch;
        self.grid_size = grid_size;
        self
    }

    /// Media filter of this browser.
    #[must_use]
    pub const fn filter(&self) -> MediaFilter {
        self.filter
    }

    /// Section heading.
    #[must_use]
    pub const fn section_title(&self) -> &'static str {
        match self.filter {
            MediaFilter::All => "Browse by Genre",
            MediaFilter::Movies => "Browse Movies by Genre",
            MediaFilter::Shows => "Browse TV Shows by Genre",
        }
    }
}

impl<A: LocalTmdbApi> GenreBrowser<'_, A> {
    /// Genres that have at least one item passing the filter.
    ///
    /// Checks every genre with a single-item fetch, all concurrently. A
    /// failed check drops the genre. Input order is preserved.
    #[instrument(skip_all, fields(filter = ?self.filter, genres = genres.len()))]
    pub async fn available_genres(&self, genres: &[Genre]) -> Vec<Genre> {
        let checks = genres.iter().map(|genre| async move {
            let sample = self.catalog.by_genre(genre.id, 1).await;
            sample
                .iter()
                .any(|item| self.filter.matches(item.media_type))
                .then(|| genre.clone())
        });

        let available: Vec<Genre> = join_all(checks).await.into_iter().flatten().collect();
        tracing::debug!(available = available.len(), "Genres checked");
        available
    }

    /// Grid items of one genre: fetches the genre, keeps items passing the
    /// filter, and truncates to the grid size.
    #[instrument(skip_all, fields(genre_id = genre_id, filter = ?self.filter))]
    pub async fn genre_content(&self, genre_id: u32) -> Vec<ContentItem> {
        self.catalog
            .by_genre(genre_id, self.items_to_fetch)
            .await
            .into_iter()
            .filter(|item| self.filter.matches(item.media_type))
            .take(self.grid_size)
            .collect()
    }
}
