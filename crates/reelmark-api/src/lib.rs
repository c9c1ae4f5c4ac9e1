//! API client library for reelmark.
//!
//! Wraps the TMDB v3 API behind a typed client, normalizes movie and TV
//! records into a single content model, and exposes the catalog facade the
//! rest of the workspace consumes.

/// Catalog facade over the TMDB client.
pub mod catalog;

/// Image CDN URL helpers.
pub mod image;

/// Normalized content model.
pub mod model;

/// TMDB API client.
pub mod tmdb;

/// Canned API for tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use catalog::{Catalog, DEFAULT_GENRE_ITEMS};
pub use model::{ContentDetails, ContentItem, ContentKey, Genre, MediaType, Trailer};
