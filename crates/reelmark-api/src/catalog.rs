//! Catalog facade: typed, normalized accessors over the TMDB API.
//!
//! Every accessor comes in two flavours. The `try_*` methods return
//! `anyhow::Result` so callers that must observe failure can. The plain
//! methods log the failure and degrade to an empty list (or `None` for
//! details); views built on them never see an error.
#![allow(clippy::future_not_send)]

use std::collections::HashSet;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::instrument;

use crate::model::{ContentDetails, ContentItem, Genre, MediaType, Trailer, UNTITLED};
use crate::tmdb::{
    DiscoverParams, LocalTmdbApi, SearchMultiParams, TmdbDetails, TmdbGenre,
    TmdbMediaResult, TmdbPage, TmdbVideo,
};

/// Items requested by default for a genre grid.
pub const DEFAULT_GENRE_ITEMS: usize = 180;

/// Results per TMDB list page.
const RESULTS_PER_PAGE: usize = 20;

/// Highest page number TMDB serves for list endpoints.
const MAX_PAGES: u32 = 500;

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Normalized catalog over a TMDB API implementation.
#[derive(Debug)]
pub struct Catalog<A> {
    api: A,
    language: String,
}

impl<A> Catalog<A> {
    /// Wraps an API implementation. Responses are requested in `en-US`.
    pub fn new(api: A) -> Self {
        Self {
            api,
            language: String::from(DEFAULT_LANGUAGE),
        }
    }

    /// Sets the response language tag.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Response language tag.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Underlying API implementation.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }
}

impl<A: LocalTmdbApi> Catalog<A> {
    /// Trending movies and series of the day, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn try_trending(&self) -> Result<Vec<ContentItem>> {
        let page = self
            .api
            .trending(&self.language)
            .await
            .context("failed to fetch trending content")?;
        Ok(page.results.into_iter().filter_map(normalize_tagged).collect())
    }

    /// Popular movies and series merged, most popular first.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip_all)]
    pub async fn try_popular(&self) -> Result<Vec<ContentItem>> {
        let (movies, shows) = futures::try_join!(
            self.api.popular(MediaType::Movie, 1, &self.language),
            self.api.popular(MediaType::Tv, 1, &self.language),
        )
        .context("failed to fetch popular content")?;
        let mut items = merge(vec![movies], vec![shows]);
        sort_descending(&mut items, |item| item.popularity);
        Ok(items)
    }

    /// Top-rated movies and series merged, best rated first.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip_all)]
    pub async fn try_top_rated(&self) -> Result<Vec<ContentItem>> {
        let (movies, shows) = futures::try_join!(
            self.api.top_rated(MediaType::Movie, 1, &self.language),
            self.api.top_rated(MediaType::Tv, 1, &self.language),
        )
        .context("failed to fetch top rated content")?;
        let mut items = merge(vec![movies], vec![shows]);
        sort_descending(&mut items, |item| item.vote_average);
        Ok(items)
    }

    /// Up to `count` movies and series of a genre, most popular first.
    ///
    /// Requests `ceil(count / 20)` pages per media type concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip_all, fields(genre_id = genre_id, count = count))]
    pub async fn try_by_genre(&self, genre_id: u32, count: usize) -> Result<Vec<ContentItem>> {
        let pages = pages_needed(count);
        if pages == 0 {
            return Ok(Vec::new());
        }

        let requests = move |media_type: MediaType| {
            (1..=pages).map(move |page| {
                let params = DiscoverParams::new(genre_id, page).language(self.language.as_str());
                async move { self.api.discover(media_type, &params).await }
            })
        };
        let (movies, shows) = futures::try_join!(
            try_join_all(requests(MediaType::Movie)),
            try_join_all(requests(MediaType::Tv)),
        )
        .with_context(|| format!("failed to fetch content for genre {genre_id}"))?;

        let mut items = merge(movies, shows);
        sort_descending(&mut items, |item| item.popularity);
        items.truncate(count);
        tracing::debug!(pages, fetched = items.len(), "Genre content loaded");
        Ok(items)
    }

    /// Movie and TV genres, deduplicated by id and sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip_all)]
    pub async fn try_genres(&self) -> Result<Vec<Genre>> {
        let (movie, tv) = futures::try_join!(
            self.api.genres(MediaType::Movie, &self.language),
            self.api.genres(MediaType::Tv, &self.language),
        )
        .context("failed to fetch genres")?;

        let mut seen = HashSet::new();
        let mut genres: Vec<Genre> = movie
            .genres
            .into_iter()
            .chain(tv.genres)
            .filter(|g| seen.insert(g.id))
            .map(to_genre)
            .collect();
        genres.sort_by_cached_key(|g| g.name.to_lowercase());
        Ok(genres)
    }

    /// Movies and series matching `query`, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn try_search(&self, query: &str) -> Result<Vec<ContentItem>> {
        let params = SearchMultiParams::new(query).language(self.language.as_str());
        let page = self
            .api
            .search_multi(&params)
            .await
            .with_context(|| format!("failed to search for {query:?}"))?;
        Ok(page.results.into_iter().filter_map(normalize_tagged).collect())
    }

    /// Detail record of one item, with its trailer when one exists.
    ///
    /// A failed video lookup leaves the trailer empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail request fails.
    #[instrument(skip_all, fields(id = id, media_type = %media_type))]
    pub async fn try_details(&self, id: u64, media_type: MediaType) -> Result<ContentDetails> {
        let raw = self
            .api
            .details(media_type, id, &self.language)
            .await
            .with_context(|| format!("failed to fetch details for {media_type}/{id}"))?;

        let trailer = match self.api.videos(media_type, id, &self.language).await {
            Ok(list) => pick_trailer(list.results),
            Err(e) => {
                tracing::warn!(id, %media_type, error = %format!("{e:#}"), "Video lookup failed");
                None
            }
        };

        Ok(to_details(raw, media_type, trailer))
    }

    /// [`Self::try_trending`], empty on failure.
    pub async fn trending(&self) -> Vec<ContentItem> {
        or_default(self.try_trending().await, "trending")
    }

    /// [`Self::try_popular`], empty on failure.
    pub async fn popular(&self) -> Vec<ContentItem> {
        or_default(self.try_popular().await, "popular")
    }

    /// [`Self::try_top_rated`], empty on failure.
    pub async fn top_rated(&self) -> Vec<ContentItem> {
        or_default(self.try_top_rated().await, "top_rated")
    }

    /// [`Self::try_by_genre`], empty on failure.
    pub async fn by_genre(&self, genre_id: u32, count: usize) -> Vec<ContentItem> {
        or_default(self.try_by_genre(genre_id, count).await, "by_genre")
    }

    /// [`Self::try_genres`], empty on failure.
    pub async fn genres(&self) -> Vec<Genre> {
        or_default(self.try_genres().await, "genres")
    }

    /// [`Self::try_search`], empty on failure.
    pub async fn search(&self, query: &str) -> Vec<ContentItem> {
        or_default(self.try_search(query).await, "search")
    }

    /// [`Self::try_details`], `None` on failure.
    pub async fn details(&self, id: u64, media_type: MediaType) -> Option<ContentDetails> {
        or_default(self.try_details(id, media_type).await.map(Some), "details")
    }
}

/// Logs a failed operation and substitutes the empty value.
fn or_default<T: Default>(result: Result<T>, operation: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(operation, error = %format!("{e:#}"), "Catalog request failed");
        T::default()
    })
}

/// Number of pages needed to collect `count` results, capped at `MAX_PAGES`.
fn pages_needed(count: usize) -> u32 {
    u32::try_from(count.div_ceil(RESULTS_PER_PAGE))
        .unwrap_or(MAX_PAGES)
        .min(MAX_PAGES)
}

/// Concatenates movie pages then TV pages, tagging each result.
fn merge(
    movies: Vec<TmdbPage<TmdbMediaResult>>,
    shows: Vec<TmdbPage<TmdbMediaResult>>,
) -> Vec<ContentItem> {
    let tagged = |pages: Vec<TmdbPage<TmdbMediaResult>>, media_type: MediaType| {
        pages
            .into_iter()
            .flat_map(|page| page.results)
            .map(move |raw| normalize(raw, media_type))
    };
    tagged(movies, MediaType::Movie)
        .chain(tagged(shows, MediaType::Tv))
        .collect()
}

/// Stable sort, highest metric first. Ties keep their input order.
fn sort_descending(items: &mut [ContentItem], metric: impl Fn(&ContentItem) -> f64) {
    items.sort_by(|a, b| metric(b).total_cmp(&metric(a)));
}

/// Treats empty strings as missing.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Normalizes a result whose media type is known from the endpoint.
fn normalize(raw: TmdbMediaResult, media_type: MediaType) -> ContentItem {
    let title = non_empty(raw.title)
        .or_else(|| non_empty(raw.name))
        .unwrap_or_else(|| String::from(UNTITLED));
    ContentItem {
        id: raw.id,
        media_type,
        title,
        original_title: non_empty(raw.original_title).or_else(|| non_empty(raw.original_name)),
        overview: non_empty(raw.overview),
        release_date: non_empty(raw.release_date).or_else(|| non_empty(raw.first_air_date)),
        popularity: raw.popularity,
        vote_average: raw.vote_average,
        vote_count: raw.vote_count,
        poster_path: non_empty(raw.poster_path),
        backdrop_path: non_empty(raw.backdrop_path),
        genre_ids: raw.genre_ids,
        original_language: non_empty(raw.original_language),
    }
}

/// Normalizes a result from a mixed endpoint; drops people and unknown types.
fn normalize_tagged(raw: TmdbMediaResult) -> Option<ContentItem> {
    let media_type = raw.media_type.as_deref().and_then(MediaType::parse)?;
    Some(normalize(raw, media_type))
}

fn to_genre(genre: TmdbGenre) -> Genre {
    Genre {
        id: genre.id,
        name: genre.name,
    }
}

/// First YouTube trailer or teaser.
fn pick_trailer(videos: Vec<TmdbVideo>) -> Option<Trailer> {
    videos
        .into_iter()
        .find(|v| (v.kind == "Trailer" || v.kind == "Teaser") && v.site == "YouTube")
        .map(|v| Trailer {
            name: v.name,
            site: v.site,
            key: v.key,
            kind: v.kind,
        })
}

fn to_details(raw: TmdbDetails, media_type: MediaType, trailer: Option<Trailer>) -> ContentDetails {
    let runtime = raw
        .runtime
        .filter(|m| *m > 0)
        .or_else(|| raw.episode_run_time.first().copied());
    let mut item = normalize(raw.media, media_type);
    if item.genre_ids.is_empty() {
        item.genre_ids = raw.genres.iter().map(|g| g.id).collect();
    }

    ContentDetails {
        item,
        genres: raw.genres.into_iter().map(to_genre).collect(),
        runtime,
        tagline: non_empty(raw.tagline),
        status: non_empty(raw.status),
        homepage: non_empty(raw.homepage),
        budget: raw.budget,
        revenue: raw.revenue,
        number_of_seasons: raw.number_of_seasons,
        number_of_episodes: raw.number_of_episodes,
        production_companies: raw.production_companies.into_iter().map(|c| c.name).collect(),
        spoken_languages: raw
            .spoken_languages
            .into_iter()
            .map(|l| l.english_name)
            .filter(|name| !name.is_empty())
            .collect(),
        trailer,
    }
}
