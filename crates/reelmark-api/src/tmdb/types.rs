//! TMDB API response types and request parameters.

use serde::Deserialize;

// --- Paged lists ---

/// Paged response shared by trending, popular, top-rated, discover and
/// search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    /// Current page number.
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A movie, TV series, or (in mixed endpoints) person result.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`.
/// `media_type` is only present on `trending/all` and `search/multi`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMediaResult {
    /// TMDB id.
    pub id: u64,
    /// `movie`, `tv` or `person` (mixed endpoints only).
    #[serde(default)]
    pub media_type: Option<String>,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// Series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Original movie title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original series name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Movie release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Series first air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre ids (list endpoints).
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
}

// --- Genres ---

/// Response from `genre/{type}/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    /// Genres of one taxonomy.
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Details ---

/// Response from `movie/{id}` or `tv/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    /// Fields shared with list results.
    #[serde(flatten)]
    pub media: TmdbMediaResult,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Movie runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Series episode runtimes in minutes.
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Status (e.g. "Released", "Ended").
    #[serde(default)]
    pub status: Option<String>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Budget in USD.
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD.
    #[serde(default)]
    pub revenue: u64,
    /// Number of seasons (series).
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    /// Number of episodes (series).
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<TmdbCompany>,
    /// Spoken languages.
    #[serde(default)]
    pub spoken_languages: Vec<TmdbSpokenLanguage>,
}

/// Production company entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCompany {
    /// Company id.
    pub id: u64,
    /// Company name.
    pub name: String,
}

/// Spoken language entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSpokenLanguage {
    /// English language name.
    #[serde(default)]
    pub english_name: String,
    /// ISO 639-1 code.
    #[serde(default)]
    pub iso_639_1: String,
}

// --- Videos ---

/// Response from `{type}/{id}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideoList {
    /// Videos attached to the item.
    pub results: Vec<TmdbVideo>,
}

/// A single video.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    /// Site-specific key.
    pub key: String,
    /// Video title.
    #[serde(default)]
    pub name: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser", "Featurette").
    #[serde(rename = "type")]
    pub kind: String,
    /// Official flag.
    #[serde(default)]
    pub official: bool,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Request Parameters ---

/// Parameters for the `search/multi` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMultiParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMultiParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Parameters for the `discover/{type}` endpoint.
#[derive(Debug, Clone)]
pub struct DiscoverParams {
    /// Genre id filter (`with_genres`).
    pub genre_id: u32,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500).
    pub page: u32,
}

impl DiscoverParams {
    /// Creates discover params for one page of a genre.
    pub fn new(genre_id: u32, page: u32) -> Self {
        Self {
            genre_id,
            language: String::from("en-US"),
            page,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
