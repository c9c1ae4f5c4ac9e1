//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints for trending,
//! popular, top-rated, discover, genre, search, detail and video data.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverParams, SearchMultiParams, TmdbCompany, TmdbDetails, TmdbGenre,
    TmdbGenreList, TmdbMediaResult, TmdbPage, TmdbSpokenLanguage, TmdbVideo, TmdbVideoList,
};
