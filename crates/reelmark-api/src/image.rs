//! TMDB image CDN URLs.

use std::fmt;

/// Default base URL of the TMDB image CDN.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Image used when an item has no artwork.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x600?text=No+Image+Available";

/// Rendition sizes served by the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// 92px wide.
    W92,
    /// 154px wide.
    W154,
    /// 185px wide.
    W185,
    /// 300px wide.
    W300,
    /// 342px wide.
    W342,
    /// 500px wide (posters in grids).
    W500,
    /// 780px wide.
    W780,
    /// 1280px wide.
    W1280,
    /// Original upload (backdrops).
    #[default]
    Original,
}

impl ImageSize {
    /// CDN path segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W154 => "w154",
            Self::W185 => "w185",
            Self::W300 => "w300",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::W1280 => "w1280",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves image paths against a CDN base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    base_url: String,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageResolver {
    /// Creates a resolver. A trailing slash is added if missing.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Builds `{base}{size}{path}`, or the placeholder when `path` is absent
    /// or empty.
    #[must_use]
    pub fn url(&self, path: Option<&str>, size: ImageSize) -> String {
        match path {
            Some(p) if !p.is_empty() => format!("{}{}{}", self.base_url, size, p),
            _ => String::from(PLACEHOLDER_IMAGE),
        }
    }
}
