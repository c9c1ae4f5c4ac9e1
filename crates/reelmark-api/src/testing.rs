//! In-process TMDB stand-in for tests.
//!
//! `FakeTmdb` serves canned results from plain fields, records the calls
//! it receives, and fails any operation named in `fail`. Detail lookups
//! decode the bundled fixtures so tests see realistic records.
#![allow(clippy::unwrap_used)]
#![allow(clippy::future_not_send)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{Result, bail};

use crate::model::MediaType;
use crate::tmdb::{
    DiscoverParams, LocalTmdbApi, SearchMultiParams, TmdbDetails, TmdbGenre, TmdbGenreList,
    TmdbMediaResult, TmdbPage, TmdbVideo, TmdbVideoList,
};

/// Results served per discover page.
const PAGE_SIZE: usize = 20;

/// A movie result as `trending/all` and `search/multi` return it.
#[must_use]
pub fn movie(id: u64, title: &str, popularity: f64) -> TmdbMediaResult {
    TmdbMediaResult {
        id,
        media_type: Some(String::from("movie")),
        title: Some(String::from(title)),
        popularity,
        vote_average: popularity / 10.0,
        ..TmdbMediaResult::default()
    }
}

/// A series result as `trending/all` and `search/multi` return it.
#[must_use]
pub fn show(id: u64, name: &str, popularity: f64) -> TmdbMediaResult {
    TmdbMediaResult {
        id,
        media_type: Some(String::from("tv")),
        name: Some(String::from(name)),
        popularity,
        vote_average: popularity / 10.0,
        ..TmdbMediaResult::default()
    }
}

/// A genre list entry.
#[must_use]
pub fn genre(id: u32, name: &str) -> TmdbGenre {
    TmdbGenre {
        id,
        name: String::from(name),
    }
}

/// A video list entry.
#[must_use]
pub fn video(kind: &str, site: &str, key: &str) -> TmdbVideo {
    TmdbVideo {
        key: String::from(key),
        name: format!("{kind} {key}"),
        site: String::from(site),
        kind: String::from(kind),
        official: true,
    }
}

/// Wraps results in a single page.
#[must_use]
pub fn page(results: Vec<TmdbMediaResult>) -> TmdbPage<TmdbMediaResult> {
    TmdbPage {
        page: 1,
        results,
        total_pages: 1,
        total_results: 0,
    }
}

/// Canned TMDB API.
#[derive(Debug, Default)]
pub struct FakeTmdb {
    /// `trending/all/day` results.
    pub trending: Vec<TmdbMediaResult>,
    /// Popular results per media type.
    pub popular: HashMap<MediaType, Vec<TmdbMediaResult>>,
    /// Top-rated results per media type.
    pub top_rated: HashMap<MediaType, Vec<TmdbMediaResult>>,
    /// Genre taxonomy per media type.
    pub genres: HashMap<MediaType, Vec<TmdbGenre>>,
    /// Discover results per genre and media type, served 20 per page.
    pub discover: HashMap<(u32, MediaType), Vec<TmdbMediaResult>>,
    /// `search/multi` results, whatever the query.
    pub search: Vec<TmdbMediaResult>,
    /// Videos attached to every item.
    pub videos: Vec<TmdbVideo>,
    /// Operation names that fail (`trending`, `popular`, `details`, ...).
    pub fail: HashSet<&'static str>,
    /// Genre ids whose discover requests fail.
    pub fail_genres: HashSet<u32>,
    /// Discover requests received, as media type and page.
    pub discover_calls: Mutex<Vec<(MediaType, u32)>>,
    /// Search queries received.
    pub search_queries: Mutex<Vec<String>>,
    /// Detail requests received.
    pub detail_requests: Mutex<Vec<(MediaType, u64)>>,
}

impl FakeTmdb {
    fn check(&self, operation: &'static str) -> Result<()> {
        if self.fail.contains(operation) {
            bail!("{operation} unavailable");
        }
        Ok(())
    }

    /// Search queries received so far.
    #[must_use]
    pub fn searched(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }

    /// Discover requests received so far, sorted.
    #[must_use]
    pub fn discovered(&self) -> Vec<(MediaType, u32)> {
        let mut calls = self.discover_calls.lock().unwrap().clone();
        calls.sort_unstable();
        calls
    }
}

impl LocalTmdbApi for FakeTmdb {
    async fn trending(&self, _language: &str) -> Result<TmdbPage<TmdbMediaResult>> {
        self.check("trending")?;
        Ok(page(self.trending.clone()))
    }

    async fn popular(
        &self,
        media_type: MediaType,
        _page: u32,
        _language: &str,
    ) -> Result<TmdbPage<TmdbMediaResult>> {
        self.check("popular")?;
        Ok(page(self.popular.get(&media_type).cloned().unwrap_or_default()))
    }

    async fn top_rated(
        &self,
        media_type: MediaType,
        _page: u32,
        _language: &str,
    ) -> Result<TmdbPage<TmdbMediaResult>> {
        self.check("top_rated")?;
        Ok(page(self.top_rated.get(&media_type).cloned().unwrap_or_default()))
    }

    async fn discover(
        &self,
        media_type: MediaType,
        params: &DiscoverParams,
    ) -> Result<TmdbPage<TmdbMediaResult>> {
        self.discover_calls
            .lock()
            .unwrap()
            .push((media_type, params.page));
        self.check("discover")?;
        if self.fail_genres.contains(&params.genre_id) {
            bail!("discover unavailable for genre {}", params.genre_id);
        }
        let skip = usize::try_from(params.page.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .saturating_mul(PAGE_SIZE);
        let results = self
            .discover
            .get(&(params.genre_id, media_type))
            .map(|all| all.iter().skip(skip).take(PAGE_SIZE).cloned().collect())
            .unwrap_or_default();
        Ok(page(results))
    }

    async fn genres(&self, media_type: MediaType, _language: &str) -> Result<TmdbGenreList> {
        self.check("genres")?;
        Ok(TmdbGenreList {
            genres: self.genres.get(&media_type).cloned().unwrap_or_default(),
        })
    }

    async fn search_multi(&self, params: &SearchMultiParams) -> Result<TmdbPage<TmdbMediaResult>> {
        self.search_queries
            .lock()
            .unwrap()
            .push(params.query.clone());
        self.check("search")?;
        Ok(page(self.search.clone()))
    }

    async fn details(&self, media_type: MediaType, id: u64, _language: &str) -> Result<TmdbDetails> {
        self.detail_requests.lock().unwrap().push((media_type, id));
        // Suspend once so concurrent callers interleave.
        tokio::task::yield_now().await;
        self.check("details")?;
        let json = match media_type {
            MediaType::Movie => include_str!("../../../fixtures/tmdb/movie_details_550.json"),
            MediaType::Tv => include_str!("../../../fixtures/tmdb/tv_details_1399.json"),
        };
        let mut details: TmdbDetails = serde_json::from_str(json)?;
        details.media.id = id;
        Ok(details)
    }

    async fn videos(
        &self,
        _media_type: MediaType,
        _id: u64,
        _language: &str,
    ) -> Result<TmdbVideoList> {
        self.check("videos")?;
        Ok(TmdbVideoList {
            results: self.videos.clone(),
        })
    }
}
