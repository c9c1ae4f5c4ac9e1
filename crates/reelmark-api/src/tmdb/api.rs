//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    DiscoverParams, SearchMultiParams, TmdbDetails, TmdbGenreList, TmdbMediaResult,
    TmdbPage, TmdbVideoList,
};
use crate::model::MediaType;

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches today's trending movies, series and people.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending(&self, language: &str) -> Result<TmdbPage<TmdbMediaResult>>;

    /// Fetches one page of the popular list for a media type.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn popular(
        &self,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<TmdbPage<TmdbMediaResult>>;

    /// Fetches one page of the top-rated list for a media type.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn top_rated(
        &self,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<TmdbPage<TmdbMediaResult>>;

    /// Fetches one page of genre-filtered results for a media type.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover(
        &self,
        media_type: MediaType,
        params: &DiscoverParams,
    ) -> Result<TmdbPage<TmdbMediaResult>>;

    /// Fetches the genre taxonomy of a media type.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genres(&self, media_type: MediaType, language: &str) -> Result<TmdbGenreList>;

    /// Searches movies, series and people at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_multi(&self, params: &SearchMultiParams) -> Result<TmdbPage<TmdbMediaResult>>;

    /// Fetches the detail record of a movie or series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn details(&self, media_type: MediaType, id: u64, language: &str) -> Result<TmdbDetails>;

    /// Fetches the videos attached to a movie or series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn videos(&self, media_type: MediaType, id: u64, language: &str)
    -> Result<TmdbVideoList>;
}
