//! Views derived from a content snapshot.
//!
//! Nothing here is cached: pages are recomputed from the snapshot each time
//! they are requested.

use reelmark_api::{ContentItem, MediaType};

use crate::content::ContentSnapshot;

/// Items shown in the hero banner.
pub const HERO_SIZE: usize = 5;

/// Items shown in one carousel row.
pub const ROW_SIZE: usize = 20;

/// Which media types a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaFilter {
    /// Movies and series (home page).
    #[default]
    All,
    /// Movies only.
    Movies,
    /// Series only.
    Shows,
}

impl MediaFilter {
    /// Returns `true` if items of `media_type` pass this filter.
    #[must_use]
    pub const fn matches(self, media_type: MediaType) -> bool {
        match self {
            Self::All => true,
            Self::Movies => matches!(media_type, MediaType::Movie),
            Self::Shows => matches!(media_type, MediaType::Tv),
        }
    }
}

impl From<MediaType> for MediaFilter {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Movie => Self::Movies,
            MediaType::Tv => Self::Shows,
        }
    }
}

impl From<Option<MediaType>> for MediaFilter {
    fn from(media_type: Option<MediaType>) -> Self {
        media_type.map_or(Self::All, Self::from)
    }
}

/// Items passing `filter`, in their original order.
#[must_use]
pub fn filter_items(items: &[ContentItem], filter: MediaFilter) -> Vec<ContentItem> {
    items
        .iter()
        .filter(|item| filter.matches(item.media_type))
        .cloned()
        .collect()
}

/// The carousel rows of a browse page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Trending today.
    Trending,
    /// Most popular.
    Popular,
    /// Best rated.
    TopRated,
}

impl RowKind {
    /// Rows in display order.
    pub const ALL: [Self; 3] = [Self::Trending, Self::Popular, Self::TopRated];

    /// Row heading for a page showing `filter`.
    #[must_use]
    pub const fn title(self, filter: MediaFilter) -> &'static str {
        match (self, filter) {
            (Self::Trending, MediaFilter::All) => "Trending Now",
            (Self::Trending, MediaFilter::Movies) => "Trending Movies",
            (Self::Trending, MediaFilter::Shows) => "Trending TV Shows",
            (Self::Popular, MediaFilter::All) => "Popular",
            (Self::Popular, MediaFilter::Movies) => "Popular Movies",
            (Self::Popular, MediaFilter::Shows) => "Popular TV Shows",
            (Self::TopRated, MediaFilter::All) => "Top Rated",
            (Self::TopRated, MediaFilter::Movies) => "Top Rated Movies",
            (Self::TopRated, MediaFilter::Shows) => "Top Rated TV Shows",
        }
    }

    /// Source list of this row.
    #[must_use]
    pub fn source(self, snapshot: &ContentSnapshot) -> &[ContentItem] {
        match self {
            Self::Trending => &snapshot.trending,
            Self::Popular => &snapshot.popular,
            Self::TopRated => &snapshot.top_rated,
        }
    }
}

/// One carousel row.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRow {
    /// Which list the row shows.
    pub kind: RowKind,
    /// Heading.
    pub title: &'static str,
    /// At most [`ROW_SIZE`] items.
    pub items: Vec<ContentItem>,
}

/// Home, movies or shows page.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowsePage {
    /// Filter the page was built for.
    pub filter: MediaFilter,
    /// Featured items, at most [`HERO_SIZE`].
    pub hero: Vec<ContentItem>,
    /// Carousel rows; empty while the store is loading.
    pub rows: Vec<ContentRow>,
}

/// Builds the browse page for `filter` from `snapshot`.
#[must_use]
pub fn browse_page(snapshot: &ContentSnapshot, filter: MediaFilter) -> BrowsePage {
    if snapshot.is_loading() {
        return BrowsePage {
            filter,
            hero: Vec::new(),
            rows: Vec::new(),
        };
    }

    let take = |items: &[ContentItem], limit: usize| -> Vec<ContentItem> {
        items
            .iter()
            .filter(|item| filter.matches(item.media_type))
            .take(limit)
            .cloned()
            .collect()
    };

    let rows = RowKind::ALL
        .into_iter()
        .map(|kind| ContentRow {
            kind,
            title: kind.title(filter),
            items: take(kind.source(snapshot), ROW_SIZE),
        })
        .collect();

    BrowsePage {
        filter,
        hero: take(&snapshot.trending, HERO_SIZE),
        rows,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::content::LoadState;

    fn items(count: u64) -> Vec<ContentItem> {
        (0..count)
            .map(|i| {
                let media_type = if i % 2 == 0 {
                    MediaType::Movie
                } else {
                    MediaType::Tv
                };
                ContentItem::new(i, media_type, format!("Item {i}"))
            })
            .collect()
    }

    fn ready(trending: Vec<ContentItem>) -> ContentSnapshot {
        ContentSnapshot {
            state: LoadState::Ready,
            popular: trending.clone(),
            top_rated: trending.clone(),
            trending,
            genres: Vec::new(),
        }
    }

    #[test]
    fn test_filter_matches() {
        // Arrange & Act & Assert
        assert!(MediaFilter::All.matches(MediaType::Tv));
        assert!(MediaFilter::Movies.matches(MediaType::Movie));
        assert!(!MediaFilter::Movies.matches(MediaType::Tv));
        assert!(MediaFilter::Shows.matches(MediaType::Tv));
        assert_eq!(MediaFilter::from(None), MediaFilter::All);
        assert_eq!(MediaFilter::from(Some(MediaType::Tv)), MediaFilter::Shows);
    }

    #[test]
    fn test_filter_items_keeps_same_id_different_type() {
        // Arrange
        let list = vec![
            ContentItem::new(5, MediaType::Movie, "Five"),
            ContentItem::new(5, MediaType::Tv, "Five"),
        ];

        // Act
        let movies = filter_items(&list, MediaFilter::Movies);
        let all = filter_items(&list, MediaFilter::All);

        // Assert
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].media_type, MediaType::Movie);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_home_page_limits() {
        // Arrange
        let snapshot = ready(items(50));

        // Act
        let page = browse_page(&snapshot, MediaFilter::All);

        // Assert
        assert_eq!(page.hero.len(), HERO_SIZE);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.rows[0].title, "Trending Now");
        assert!(page.rows.iter().all(|row| row.items.len() == ROW_SIZE));
    }

    #[test]
    fn test_shows_page_filters_everything() {
        // Arrange
        let snapshot = ready(items(12));

        // Act
        let page = browse_page(&snapshot, MediaFilter::Shows);

        // Assert
        assert!(page.hero.iter().all(|i| i.media_type == MediaType::Tv));
        assert_eq!(page.hero.len(), HERO_SIZE);
        assert_eq!(page.rows[2].title, "Top Rated TV Shows");
        assert_eq!(page.rows[2].items.len(), 6);
    }

    #[test]
    fn test_loading_page_is_empty() {
        // Arrange
        let mut snapshot = ready(items(10));
        snapshot.state = LoadState::Loading;

        // Act
        let page = browse_page(&snapshot, MediaFilter::Movies);

        // Assert
        assert!(page.hero.is_empty());
        assert!(page.rows.is_empty());
    }
}
