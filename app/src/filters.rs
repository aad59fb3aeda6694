use std::fmt;
use std::sync::Arc;

pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_MINIMUM_RATING: i32 = 9;
pub const PAGE_SIZES: [u32; 3] = [10, 20, DEFAULT_LIMIT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    All,
    Hd720,
    Hd1080,
    Uhd2160,
    ThreeD,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::All,
        Quality::Hd720,
        Quality::Hd1080,
        Quality::Uhd2160,
        Quality::ThreeD,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            Quality::All => "All",
            Quality::Hd720 => "720p",
            Quality::Hd1080 => "1080p",
            Quality::Uhd2160 => "2160p",
            Quality::ThreeD => "3D",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Title,
    Year,
    Rating,
    Peers,
    Seeds,
    DownloadCount,
    #[default]
    LikeCount,
    DateAdded,
}

impl SortBy {
    pub const ALL: [SortBy; 8] = [
        SortBy::Title,
        SortBy::Year,
        SortBy::Rating,
        SortBy::Peers,
        SortBy::Seeds,
        SortBy::DownloadCount,
        SortBy::LikeCount,
        SortBy::DateAdded,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            SortBy::Title => "title",
            SortBy::Year => "year",
            SortBy::Rating => "rating",
            SortBy::Peers => "peers",
            SortBy::Seeds => "seeds",
            SortBy::DownloadCount => "download_count",
            SortBy::LikeCount => "like_count",
            SortBy::DateAdded => "date_added",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Title => "Title",
            SortBy::Year => "Year",
            SortBy::Rating => "Rating",
            SortBy::Peers => "Peers",
            SortBy::Seeds => "Seeds",
            SortBy::DownloadCount => "Most watched",
            SortBy::LikeCount => "Popular",
            SortBy::DateAdded => "Recently added",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    Asc,
    #[default]
    Desc,
}

impl OrderBy {
    pub fn as_param(&self) -> &'static str {
        match self {
            OrderBy::Asc => "asc",
            OrderBy::Desc => "desc",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            OrderBy::Asc => OrderBy::Desc,
            OrderBy::Desc => OrderBy::Asc,
        }
    }
}

/// The page size after `current`. Sizes outside [`PAGE_SIZES`] restart
/// the cycle.
pub fn next_page_size(current: u32) -> u32 {
    cycle(&PAGE_SIZES, current)
}

fn cycle<T: Copy + PartialEq>(values: &[T], current: T) -> T {
    let position = values.iter().position(|v| *v == current).unwrap_or(0);
    values[(position + 1) % values.len()]
}

/// One immutable value of every query parameter sent to the listing
/// endpoint. New values are produced through [`FilterOptions::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub limit: u32,
    pub page: u32,
    pub quality: Quality,
    pub minimum_rating: i32,
    pub query_term: String,
    pub genre: String,
    pub sort_by: SortBy,
    pub order_by: OrderBy,
    pub with_rt_ratings: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: 1,
            quality: Quality::All,
            minimum_rating: 0,
            query_term: String::new(),
            genre: String::new(),
            sort_by: SortBy::LikeCount,
            order_by: OrderBy::Desc,
            with_rt_ratings: false,
        }
    }
}

/// A single-field change. Values are passed through unvalidated; the
/// service decides what it accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Limit(u32),
    Page(u32),
    Quality(Quality),
    MinimumRating(i32),
    QueryTerm(String),
    Genre(String),
    SortBy(SortBy),
    OrderBy(OrderBy),
    WithRtRatings(bool),
}

impl FilterUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            FilterUpdate::Limit(_) => "limit",
            FilterUpdate::Page(_) => "page",
            FilterUpdate::Quality(_) => "quality",
            FilterUpdate::MinimumRating(_) => "minimum_rating",
            FilterUpdate::QueryTerm(_) => "query_term",
            FilterUpdate::Genre(_) => "genre",
            FilterUpdate::SortBy(_) => "sort_by",
            FilterUpdate::OrderBy(_) => "order_by",
            FilterUpdate::WithRtRatings(_) => "with_rt_ratings",
        }
    }
}

impl FilterOptions {
    /// Merge one field into a copy of `self`; every other field is kept.
    pub fn update(&self, change: FilterUpdate) -> FilterOptions {
        let mut next = self.clone();
        match change {
            FilterUpdate::Limit(limit) => next.limit = limit,
            FilterUpdate::Page(page) => next.page = page,
            FilterUpdate::Quality(quality) => next.quality = quality,
            FilterUpdate::MinimumRating(rating) => next.minimum_rating = rating,
            FilterUpdate::QueryTerm(term) => next.query_term = term,
            FilterUpdate::Genre(genre) => next.genre = genre,
            FilterUpdate::SortBy(sort_by) => next.sort_by = sort_by,
            FilterUpdate::OrderBy(order_by) => next.order_by = order_by,
            FilterUpdate::WithRtRatings(with) => next.with_rt_ratings = with,
        }
        next
    }

    /// Query string pairs for `list_movies.json`, every field included.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
            ("quality", self.quality.as_param().to_string()),
            ("minimum_rating", self.minimum_rating.to_string()),
            ("query_term", self.query_term.clone()),
            ("genre", self.genre.clone()),
            ("sort_by", self.sort_by.as_param().to_string()),
            ("order_by", self.order_by.as_param().to_string()),
            ("with_rt_ratings", self.with_rt_ratings.to_string()),
        ]
    }
}

impl fmt::Display for FilterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page={} limit={} quality={} rating>={} genre={:?} query={:?} sort={} {}",
            self.page,
            self.limit,
            self.quality.as_param(),
            self.minimum_rating,
            self.genre,
            self.query_term,
            self.sort_by.as_param(),
            self.order_by.as_param(),
        )
    }
}

/// Holds the current snapshot. Every update swaps in a fresh `Arc`, so
/// consumers may compare by pointer or by [`FilterStore::version`].
#[derive(Debug)]
pub struct FilterStore {
    current: Arc<FilterOptions>,
    version: u64,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterOptions::default())
    }
}

impl FilterStore {
    pub fn new(initial: FilterOptions) -> Self {
        Self {
            current: Arc::new(initial),
            version: 0,
        }
    }

    pub fn snapshot(&self) -> Arc<FilterOptions> {
        Arc::clone(&self.current)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn update(&mut self, change: FilterUpdate) -> Arc<FilterOptions> {
        self.current = Arc::new(self.current.update(change));
        self.version += 1;
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customised() -> FilterOptions {
        FilterOptions {
            limit: 20,
            page: 3,
            quality: Quality::Hd1080,
            minimum_rating: 7,
            query_term: "alien".to_string(),
            genre: "Horror".to_string(),
            sort_by: SortBy::Year,
            order_by: OrderBy::Asc,
            with_rt_ratings: true,
        }
    }

    #[test]
    fn defaults_match_session_start() {
        let options = FilterOptions::default();
        assert_eq!(options.limit, 50);
        assert_eq!(options.page, 1);
        assert_eq!(options.quality, Quality::All);
        assert_eq!(options.minimum_rating, 0);
        assert_eq!(options.sort_by, SortBy::LikeCount);
        assert_eq!(options.order_by, OrderBy::Desc);
        assert!(options.query_term.is_empty());
        assert!(options.genre.is_empty());
        assert!(!options.with_rt_ratings);
    }

    #[test]
    fn update_preserves_every_other_field() {
        let base = customised();
        let changes = vec![
            FilterUpdate::Limit(10),
            FilterUpdate::Page(9),
            FilterUpdate::Quality(Quality::ThreeD),
            FilterUpdate::MinimumRating(2),
            FilterUpdate::QueryTerm("predator".to_string()),
            FilterUpdate::Genre("Comedy".to_string()),
            FilterUpdate::SortBy(SortBy::Title),
            FilterUpdate::OrderBy(OrderBy::Desc),
            FilterUpdate::WithRtRatings(false),
        ];

        for change in changes {
            let field = change.field();
            let next = base.update(change);
            let before = base.to_query_params();
            let after = next.to_query_params();
            for ((name, old), (_, new)) in before.iter().zip(after.iter()) {
                if *name == field {
                    assert_ne!(old, new, "{} should change", name);
                } else {
                    assert_eq!(old, new, "{} changed while updating {}", name, field);
                }
            }
        }
    }

    #[test]
    fn update_does_not_validate() {
        let next = FilterOptions::default().update(FilterUpdate::MinimumRating(42));
        assert_eq!(next.minimum_rating, 42);
    }

    #[test]
    fn store_produces_a_new_snapshot_per_update() {
        let mut store = FilterStore::default();
        let first = store.snapshot();
        let second = store.update(FilterUpdate::Page(1));

        assert_eq!(*first, *second);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn query_params_carry_all_fields() {
        let params = customised().to_query_params();
        let names: Vec<&str> = params.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "limit",
                "page",
                "quality",
                "minimum_rating",
                "query_term",
                "genre",
                "sort_by",
                "order_by",
                "with_rt_ratings",
            ]
        );
        assert!(params.contains(&("quality", "1080p".to_string())));
        assert!(params.contains(&("sort_by", "year".to_string())));
        assert!(params.contains(&("with_rt_ratings", "true".to_string())));
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(Quality::ThreeD.next(), Quality::All);
        assert_eq!(SortBy::DateAdded.next(), SortBy::Title);
        assert_eq!(OrderBy::Desc.toggle(), OrderBy::Asc);
        assert_eq!(next_page_size(DEFAULT_LIMIT), 10);
        assert_eq!(next_page_size(10), 20);
        assert_eq!(next_page_size(33), 20);
    }
}
