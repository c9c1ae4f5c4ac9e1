//! Normalized content model shared by every view.
//!
//! TMDB returns movies and TV series with different field names
//! (`title`/`name`, `release_date`/`first_air_date`). Everything past the
//! catalog facade works with [`ContentItem`] instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title used when an item has neither a movie title nor a series name.
pub const UNTITLED: &str = "No Title";

/// Label used when a value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Media type discriminator. Part of every item's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
}

impl MediaType {
    /// Both media types, movies first.
    pub const ALL: [Self; 2] = [Self::Movie, Self::Tv];

    /// TMDB path segment and wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    /// Parses a TMDB `media_type` value. Returns `None` for anything that is
    /// not a movie or a series (e.g. `person`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a content item: ids are only unique within a media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey {
    /// TMDB id.
    pub id: u64,
    /// Media type namespace of `id`.
    pub media_type: MediaType,
}

impl ContentKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(id: u64, media_type: MediaType) -> Self {
        Self { id, media_type }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.id)
    }
}

/// A movie or TV series, normalized.
///
/// Field names follow TMDB so persisted watch lists stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// TMDB id (scoped to `media_type`).
    pub id: u64,
    /// Media type.
    pub media_type: MediaType,
    /// Display title.
    pub title: String,
    /// Original-language title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release or first air date (`YYYY-MM-DD`).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Average rating (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Number of votes.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Genre ids.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
}

impl ContentItem {
    /// Creates an item with only identity and title set.
    pub fn new(id: u64, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            id,
            media_type,
            title: title.into(),
            original_title: None,
            overview: None,
            release_date: None,
            popularity: 0.0,
            vote_average: 0.0,
            vote_count: 0,
            poster_path: None,
            backdrop_path: None,
            genre_ids: Vec::new(),
            original_language: None,
        }
    }

    /// Identity of this item.
    #[must_use]
    pub const fn key(&self) -> ContentKey {
        ContentKey::new(self.id, self.media_type)
    }

    /// Returns `true` if this item has the given identity.
    #[must_use]
    pub fn is(&self, id: u64, media_type: MediaType) -> bool {
        self.id == id && self.media_type == media_type
    }

    /// Release year (first four characters of the release date).
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }

    /// Release year, or `N/A`.
    #[must_use]
    pub fn year_label(&self) -> &str {
        self.year().unwrap_or(NOT_AVAILABLE)
    }

    /// Rating rounded to one decimal.
    #[must_use]
    pub fn rating_label(&self) -> String {
        format_rating(self.vote_average)
    }
}

/// Genre entry, shared by the movie and TV taxonomies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    /// Genre id.
    pub id: u32,
    /// Display name.
    pub name: String,
}

/// A playable video picked for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    /// Video title.
    pub name: String,
    /// Hosting site (always `YouTube` for selected trailers).
    pub site: String,
    /// Site-specific video key.
    pub key: String,
    /// Video type (`Trailer` or `Teaser`).
    pub kind: String,
}

impl Trailer {
    /// Watch page URL.
    #[must_use]
    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }

    /// Embeddable player URL.
    #[must_use]
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.key)
    }
}

/// Full detail record for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDetails {
    /// Normalized summary (what the watch list stores).
    pub item: ContentItem,
    /// Genres.
    pub genres: Vec<Genre>,
    /// Runtime in minutes (movies) or typical episode runtime (series).
    pub runtime: Option<u32>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Release status (e.g. "Released", "Returning Series").
    pub status: Option<String>,
    /// Official homepage.
    pub homepage: Option<String>,
    /// Budget in USD (movies, 0 when unknown).
    pub budget: u64,
    /// Revenue in USD (movies, 0 when unknown).
    pub revenue: u64,
    /// Number of seasons (series).
    pub number_of_seasons: Option<u32>,
    /// Number of episodes (series).
    pub number_of_episodes: Option<u32>,
    /// Production company names.
    pub production_companies: Vec<String>,
    /// Spoken languages (English names).
    pub spoken_languages: Vec<String>,
    /// Trailer, if one was found.
    pub trailer: Option<Trailer>,
}

impl ContentDetails {
    /// TMDB website URL for this item.
    #[must_use]
    pub fn tmdb_url(&self) -> String {
        format!(
            "https://www.themoviedb.org/{}/{}",
            self.item.media_type, self.item.id
        )
    }

    /// Runtime as `"2h 5m"`, or `N/A`.
    #[must_use]
    pub fn runtime_label(&self) -> String {
        format_runtime(self.runtime)
    }

    /// Budget in dollars, or `N/A`.
    #[must_use]
    pub fn budget_label(&self) -> String {
        format_money(self.budget)
    }

    /// Revenue in dollars, or `N/A`.
    #[must_use]
    pub fn revenue_label(&self) -> String {
        format_money(self.revenue)
    }
}

/// Rounds a rating to one decimal place (`7.25` -> `"7.3"`).
#[must_use]
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", (rating * 10.0).round() / 10.0)
}

/// Formats minutes as hours and minutes.
#[must_use]
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{}h {}m", m / 60, m % 60),
        _ => String::from(NOT_AVAILABLE),
    }
}

/// Formats a whole-dollar amount with thousands separators.
#[must_use]
pub fn format_money(amount: u64) -> String {
    if amount == 0 {
        return String::from(NOT_AVAILABLE);
    }
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len().saturating_add(digits.len() / 3 + 1));
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        let remaining = digits.len().saturating_sub(i);
        if i > 0 && remaining % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_key_distinguishes_media_types() {
        // Arrange
        let movie = ContentItem::new(5, MediaType::Movie, "A");
        let show = ContentItem::new(5, MediaType::Tv, "A");

        // Act & Assert
        assert_ne!(movie.key(), show.key());
        assert!(movie.is(5, MediaType::Movie));
        assert!(!movie.is(5, MediaType::Tv));
    }

    #[test]
    fn test_media_type_parse() {
        // Arrange & Act & Assert
        assert_eq!(MediaType::parse("movie"), Some(MediaType::Movie));
        assert_eq!(MediaType::parse("tv"), Some(MediaType::Tv));
        assert_eq!(MediaType::parse("person"), None);
    }

    #[test]
    fn test_media_type_serializes_lowercase() {
        // Arrange & Act
        let json = serde_json::to_string(&MediaType::Tv).unwrap();

        // Assert
        assert_eq!(json, r#""tv""#);
    }

    #[test]
    fn test_year() {
        // Arrange
        let mut item = ContentItem::new(1, MediaType::Movie, "A");

        // Act & Assert
        assert_eq!(item.year(), None);
        assert_eq!(item.year_label(), "N/A");
        item.release_date = Some(String::from("2023-04-14"));
        assert_eq!(item.year(), Some("2023"));
        item.release_date = Some(String::from("20"));
        assert_eq!(item.year(), None);
    }

    #[test]
    fn test_format_rating() {
        // Arrange & Act & Assert
        assert_eq!(format_rating(7.25), "7.3");
        assert_eq!(format_rating(8.0), "8.0");
        assert_eq!(format_rating(0.0), "0.0");
    }

    #[test]
    fn test_format_runtime() {
        // Arrange & Act & Assert
        assert_eq!(format_runtime(Some(125)), "2h 5m");
        assert_eq!(format_runtime(Some(45)), "0h 45m");
        assert_eq!(format_runtime(Some(0)), "N/A");
        assert_eq!(format_runtime(None), "N/A");
    }

    #[test]
    fn test_format_money() {
        // Arrange & Act & Assert
        assert_eq!(format_money(0), "N/A");
        assert_eq!(format_money(950), "$950");
        assert_eq!(format_money(1_000), "$1,000");
        assert_eq!(format_money(160_000_000), "$160,000,000");
    }

    #[test]
    fn test_trailer_urls() {
        // Arrange
        let trailer = Trailer {
            name: String::from("Official Trailer"),
            site: String::from("YouTube"),
            key: String::from("abc123"),
            kind: String::from("Trailer"),
        };

        // Act & Assert
        assert_eq!(trailer.youtube_url(), "https://www.youtube.com/watch?v=abc123");
        assert_eq!(trailer.embed_url(), "https://www.youtube.com/embed/abc123");
    }

    #[test]
    fn test_item_deserializes_with_missing_optional_fields() {
        // Arrange
        let json = r#"{"id":5,"media_type":"movie","title":"Five"}"#;

        // Act
        let item: ContentItem = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(item.key(), ContentKey::new(5, MediaType::Movie));
        assert!(item.genre_ids.is_empty());
    }
}
