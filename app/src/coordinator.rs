use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::filters::FilterOptions;
use crate::models::MoviePage;

/// Monotonic id of an issued list request.
pub type Generation = u64;

/// A list fetch the coordinator wants performed.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub generation: Generation,
    pub options: Arc<FilterOptions>,
}

/// The last successful response together with the snapshot that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    pub page: MoviePage,
    pub options: Arc<FilterOptions>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<ListResult>),
    Failed(CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Maps filter snapshots onto list requests and lets only the newest
/// request's response through.
#[derive(Debug, Default)]
pub struct QueryCoordinator {
    latest: Generation,
    pending: Option<ListRequest>,
    state: ListState,
}

impl QueryCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation for `options`. Identical snapshots are not
    /// deduplicated; every call is a fresh request.
    pub fn issue(&mut self, options: Arc<FilterOptions>) -> ListRequest {
        self.latest += 1;
        let request = ListRequest {
            generation: self.latest,
            options,
        };
        debug!("Issuing list generation {}: {}", request.generation, request.options);

        self.pending = Some(request.clone());
        self.state = ListState::Loading;
        request
    }

    /// Apply a response if `generation` is still the newest one issued.
    pub fn resolve(
        &mut self,
        generation: Generation,
        result: Result<MoviePage, CatalogError>,
    ) -> Resolution {
        if generation != self.latest {
            warn!(
                "Discarding list response for generation {} (latest is {})",
                generation, self.latest
            );
            return Resolution::Stale;
        }

        let Some(request) = self.pending.take() else {
            warn!("Duplicate list response for generation {}", generation);
            return Resolution::Stale;
        };

        self.state = match result {
            Ok(page) => {
                debug!(
                    "Generation {} returned {} movies of {}",
                    generation,
                    page.movies.len(),
                    page.total_count
                );
                ListState::Ready(Arc::new(ListResult {
                    page,
                    options: request.options,
                }))
            }
            Err(err) => ListState::Failed(err),
        };
        Resolution::Applied
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }
}
