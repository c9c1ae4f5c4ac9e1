//! Client-side state for reelmark.
//!
//! Owns the shared content store, the persisted watch list, and the views
//! derived from them. Every store publishes through a `tokio::sync::watch`
//! channel so front ends subscribe instead of polling.

/// Shared content store.
pub mod content;
/// Detail view with stale-result protection.
pub mod details;
/// Request generation counter.
pub mod generation;
/// Genre browser.
pub mod genres;
/// Debounced search session.
pub mod search;
/// Media filters and browse pages.
pub mod views;
/// Persisted watch list.
pub mod watchlist;

pub use content::{ContentSnapshot, ContentStore, LoadState};
pub use details::{DetailState, DetailView};
pub use generation::{RequestGeneration, Ticket};
pub use genres::GenreBrowser;
pub use search::{SearchResults, SearchSession, SearchSettings};
pub use views::{BrowsePage, ContentRow, MediaFilter, RowKind};
pub use watchlist::{SqliteStorage, WatchListEntry, WatchListStorage, WatchListStore};
