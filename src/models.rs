//! Data models for the Nomflix catalog browser

/// Which half of the catalog an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Tv,
}

/// A single movie or show as displayed in a carousel box or the detail overlay.
///
/// Identifiers are only unique within one fetched list.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub release_or_air_date: String,
}

/// Ordered results of one catalog query. Order is server-defined and preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        let total_results = items.len() as u64;
        Self {
            items,
            page: 1,
            total_pages: 1,
            total_results,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item, reserved for the banner
    pub fn hero(&self) -> Option<&CatalogItem> {
        self.items.first()
    }

    pub fn find(&self, id: u64) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// One carousel row. Every row owns its own page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    MovieNowPlaying,
    MoviePopular,
    MovieTopRated,
    MovieUpcoming,
    TvAiringToday,
    TvOnTheAir,
    TvTopRated,
    TvPopular,
    MovieSearch,
    TvSearch,
}

impl Category {
    pub fn kind(&self) -> MediaKind {
        match self {
            Category::MovieNowPlaying
            | Category::MoviePopular
            | Category::MovieTopRated
            | Category::MovieUpcoming
            | Category::MovieSearch => MediaKind::Movie,
            Category::TvAiringToday
            | Category::TvOnTheAir
            | Category::TvTopRated
            | Category::TvPopular
            | Category::TvSearch => MediaKind::Tv,
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Category::MovieSearch | Category::TvSearch)
    }

    /// API path relative to the catalog base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::MovieNowPlaying => "movie/now_playing",
            Category::MoviePopular => "movie/popular",
            Category::MovieTopRated => "movie/top_rated",
            Category::MovieUpcoming => "movie/upcoming",
            Category::TvAiringToday => "tv/airing_today",
            Category::TvOnTheAir => "tv/on_the_air",
            Category::TvTopRated => "tv/top_rated",
            Category::TvPopular => "tv/popular",
            Category::MovieSearch => "search/movie",
            Category::TvSearch => "search/tv",
        }
    }

    /// Row heading
    pub fn title(&self) -> &'static str {
        match self {
            Category::MovieNowPlaying => "Now Playing",
            Category::MoviePopular => "Latest Movies",
            Category::MovieTopRated => "Top Rated Movies",
            Category::MovieUpcoming => "Upcoming Movies",
            Category::TvAiringToday => "Airing Today",
            Category::TvOnTheAir => "On The Air",
            Category::TvTopRated => "Top Rated Shows",
            Category::TvPopular => "Popular",
            Category::MovieSearch => "Movies",
            Category::TvSearch => "TV",
        }
    }
}

/// The three pages of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Movies,
    Tv,
    Search,
}

impl ViewKind {
    /// Rows in display order
    pub fn categories(&self) -> &'static [Category] {
        match self {
            ViewKind::Movies => &[
                Category::MovieNowPlaying,
                Category::MoviePopular,
                Category::MovieTopRated,
                Category::MovieUpcoming,
            ],
            ViewKind::Tv => &[
                Category::TvAiringToday,
                Category::TvOnTheAir,
                Category::TvTopRated,
                Category::TvPopular,
            ],
            ViewKind::Search => &[Category::MovieSearch, Category::TvSearch],
        }
    }

    /// Row whose first item fills the banner and which is searched first for focus
    pub fn reference_category(&self) -> Option<Category> {
        match self {
            ViewKind::Movies => Some(Category::MovieNowPlaying),
            ViewKind::Tv => Some(Category::TvAiringToday),
            ViewKind::Search => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewKind::Movies => "Home",
            ViewKind::Tv => "Tv Shows",
            ViewKind::Search => "Search",
        }
    }
}

/// Cache and dispatch key for one catalog request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub category: Category,
    pub keyword: Option<String>,
}

impl QueryKey {
    pub fn list(category: Category) -> Self {
        Self { category, keyword: None }
    }

    pub fn search(category: Category, keyword: Option<&str>) -> Self {
        Self {
            category,
            keyword: keyword.map(|k| k.to_string()),
        }
    }

    /// Trimmed keyword, `None` when absent or blank
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// A search without a usable keyword is never sent
    pub fn is_noop(&self) -> bool {
        self.category.is_search() && self.effective_keyword().is_none()
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.keyword {
            Some(keyword) => write!(f, "{} \"{}\"", self.category.endpoint(), keyword),
            None => write!(f, "{}", self.category.endpoint()),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_item(id: u64, title: &str) -> CatalogItem {
    CatalogItem {
        id,
        kind: MediaKind::Movie,
        title: title.to_string(),
        overview: format!("Overview of {}", title),
        backdrop_path: Some(format!("/backdrop{}.jpg", id)),
        poster_path: None,
        popularity: 10.0,
        vote_average: 7.5,
        vote_count: 100,
        release_or_air_date: "2024-01-01".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn sample_set(count: usize) -> ResultSet {
    ResultSet::from_items(
        (0..count as u64)
            .map(|i| sample_item(i + 1, &format!("Item {}", i + 1)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_view_row_matches_view_media() {
        for category in ViewKind::Movies.categories() {
            assert_eq!(category.kind(), MediaKind::Movie);
        }
        for category in ViewKind::Tv.categories() {
            assert_eq!(category.kind(), MediaKind::Tv);
        }
        assert!(ViewKind::Search.categories().iter().all(|c| c.is_search()));
    }

    #[test]
    fn test_blank_search_is_noop() {
        assert!(QueryKey::search(Category::MovieSearch, None).is_noop());
        assert!(QueryKey::search(Category::TvSearch, Some("   ")).is_noop());
        assert!(!QueryKey::search(Category::TvSearch, Some(" dune ")).is_noop());
        assert_eq!(
            QueryKey::search(Category::TvSearch, Some(" dune ")).effective_keyword(),
            Some("dune")
        );
        assert!(!QueryKey::list(Category::MoviePopular).is_noop());
    }

    #[test]
    fn test_hero_of_empty_set() {
        assert!(ResultSet::empty().hero().is_none());
        assert_eq!(sample_set(3).hero().map(|i| i.id), Some(1));
    }
}
