use std::sync::Arc;

use tracing::{debug, info};

use crate::coordinator::{ListRequest, ListState, QueryCoordinator, Resolution};
use crate::detail::{DetailFetcher, DetailRequest, DetailState};
use crate::error::CatalogError;
use crate::filters::{
    next_page_size, FilterOptions, FilterStore, FilterUpdate, MAX_MINIMUM_RATING,
};
use crate::genres::{GenreAggregator, GenreRequest, GenreState};
use crate::models::{MovieDetail, MoviePage, MovieSummary};
use crate::pagination::PaginationModel;

/// Fetch work the browser wants performed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchList(ListRequest),
    FetchGenres(GenreRequest),
    FetchDetail(DetailRequest),
}

/// A finished fetch, delivered back to the browser.
#[derive(Debug)]
pub enum CatalogEvent {
    ListLoaded {
        generation: u64,
        result: Result<MoviePage, CatalogError>,
    },
    GenresLoaded(Result<Vec<MovieSummary>, CatalogError>),
    DetailLoaded {
        movie_id: String,
        result: Result<MovieDetail, CatalogError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

/// All browsing state, driven from one thread: user intents and fetch
/// results go in, [`Command`]s come out.
#[derive(Debug)]
pub struct Browser {
    filters: FilterStore,
    coordinator: QueryCoordinator,
    pagination: PaginationModel,
    genres: GenreAggregator,
    detail: DetailFetcher,
    view: View,
    selected: usize,
}

impl Browser {
    pub fn new(genre_sample_limit: Option<u32>) -> Self {
        let filters = FilterStore::default();
        let pagination = PaginationModel::new(filters.snapshot().page);

        Self {
            filters,
            coordinator: QueryCoordinator::new(),
            pagination,
            genres: GenreAggregator::new(genre_sample_limit),
            detail: DetailFetcher::new(),
            view: View::List,
            selected: 0,
        }
    }

    /// Initial list fetch for the default snapshot plus the genre sample.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = vec![Command::FetchList(
            self.coordinator.issue(self.filters.snapshot()),
        )];
        if let Some(request) = self.genres.begin() {
            commands.push(Command::FetchGenres(request));
        }
        commands
    }

    pub fn set_filter(&mut self, change: FilterUpdate) -> Command {
        let field = change.field();
        let snapshot = self.filters.update(change);
        debug!("Filter {} changed, snapshot v{}", field, self.filters.version());
        self.selected = 0;
        Command::FetchList(self.coordinator.issue(snapshot))
    }

    pub fn next_page(&mut self) -> Option<Command> {
        let update = self.pagination.advance()?;
        Some(self.set_filter(update))
    }

    pub fn previous_page(&mut self) -> Option<Command> {
        let update = self.pagination.retreat()?;
        Some(self.set_filter(update))
    }

    pub fn cycle_quality(&mut self) -> Command {
        let quality = self.filters.snapshot().quality.next();
        self.set_filter(FilterUpdate::Quality(quality))
    }

    pub fn cycle_minimum_rating(&mut self) -> Command {
        let current = self.filters.snapshot().minimum_rating;
        let next = if (0..MAX_MINIMUM_RATING).contains(&current) {
            current + 1
        } else {
            0
        };
        self.set_filter(FilterUpdate::MinimumRating(next))
    }

    /// Steps through the sampled genres. Without a genre sample the
    /// filter stays on "any genre" and nothing is fetched.
    pub fn cycle_genre(&mut self) -> Option<Command> {
        let current = self.filters.snapshot().genre.clone();
        let next = match self.genres.genres() {
            Some(genres) => genres.next_after(&current),
            None if current.is_empty() => return None,
            None => String::new(),
        };
        Some(self.set_filter(FilterUpdate::Genre(next)))
    }

    pub fn cycle_sort(&mut self) -> Command {
        let sort_by = self.filters.snapshot().sort_by.next();
        self.set_filter(FilterUpdate::SortBy(sort_by))
    }

    pub fn toggle_order(&mut self) -> Command {
        let order_by = self.filters.snapshot().order_by.toggle();
        self.set_filter(FilterUpdate::OrderBy(order_by))
    }

    pub fn cycle_page_size(&mut self) -> Command {
        let limit = next_page_size(self.filters.snapshot().limit);
        self.set_filter(FilterUpdate::Limit(limit))
    }

    pub fn toggle_rt_ratings(&mut self) -> Command {
        let with_rt_ratings = !self.filters.snapshot().with_rt_ratings;
        self.set_filter(FilterUpdate::WithRtRatings(with_rt_ratings))
    }

    pub fn push_search_char(&mut self, c: char) -> Command {
        let mut term = self.filters.snapshot().query_term.clone();
        term.push(c);
        self.set_filter(FilterUpdate::QueryTerm(term))
    }

    pub fn pop_search_char(&mut self) -> Option<Command> {
        let mut term = self.filters.snapshot().query_term.clone();
        term.pop()?;
        Some(self.set_filter(FilterUpdate::QueryTerm(term)))
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.movies().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_detail(&mut self, movie_id: &str) -> Command {
        info!("Opening movie {}", movie_id);
        self.view = View::Detail;
        Command::FetchDetail(self.detail.request(movie_id))
    }

    pub fn open_selected(&mut self) -> Option<Command> {
        let movie_id = self.movies().get(self.selected)?.id.to_string();
        Some(self.open_detail(&movie_id))
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
        self.view = View::List;
    }

    /// Fold a finished fetch into state. A list result that pushes the
    /// current page out of range yields the re-fetch for the clamped page.
    pub fn apply(&mut self, event: CatalogEvent) -> Option<Command> {
        match event {
            CatalogEvent::ListLoaded { generation, result } => {
                if self.coordinator.resolve(generation, result) == Resolution::Stale {
                    return None;
                }
                let (total_count, limit) = match self.coordinator.state() {
                    ListState::Ready(result) => (result.page.total_count, result.options.limit),
                    _ => return None,
                };
                self.selected = self.selected.min(self.movies().len().saturating_sub(1));
                let update = self.pagination.recompute(total_count, limit)?;
                Some(self.set_filter(update))
            }
            CatalogEvent::GenresLoaded(result) => {
                self.genres.resolve(result);
                None
            }
            CatalogEvent::DetailLoaded { movie_id, result } => {
                self.detail.resolve(&movie_id, result);
                None
            }
        }
    }

    pub fn filters(&self) -> Arc<FilterOptions> {
        self.filters.snapshot()
    }

    pub fn list_state(&self) -> &ListState {
        self.coordinator.state()
    }

    pub fn movies(&self) -> &[MovieSummary] {
        match self.coordinator.state() {
            ListState::Ready(result) => &result.page.movies,
            _ => &[],
        }
    }

    pub fn pagination(&self) -> &PaginationModel {
        &self.pagination
    }

    pub fn genre_state(&self) -> &GenreState {
        self.genres.state()
    }

    pub fn detail_state(&self) -> &DetailState {
        self.detail.state()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected(&self) -> usize {
        self.selected
    }
}
