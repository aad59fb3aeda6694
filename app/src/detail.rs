use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::models::MovieDetail;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading,
    Loaded(Box<MovieDetail>),
    Failed(CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub movie_id: String,
}

/// Loads the detail record for whichever movie the detail view shows.
#[derive(Debug, Default)]
pub struct DetailFetcher {
    movie_id: Option<String>,
    state: DetailState,
}

impl DetailFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from `Loading` for `movie_id`.
    pub fn request(&mut self, movie_id: &str) -> DetailRequest {
        debug!("Requesting details for movie {}", movie_id);
        self.movie_id = Some(movie_id.to_string());
        self.state = DetailState::Loading;
        DetailRequest {
            movie_id: movie_id.to_string(),
        }
    }

    pub fn resolve(&mut self, movie_id: &str, result: Result<MovieDetail, CatalogError>) {
        if self.movie_id.as_deref() != Some(movie_id) || self.state != DetailState::Loading {
            warn!("Ignoring details for movie {} which is no longer shown", movie_id);
            return;
        }

        self.state = match result {
            Ok(detail) => DetailState::Loaded(Box::new(detail)),
            Err(err) => DetailState::Failed(err),
        };
    }

    pub fn close(&mut self) {
        self.movie_id = None;
        self.state = DetailState::Idle;
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieSummary;

    fn detail(id: u64, title: &str) -> MovieDetail {
        MovieDetail {
            summary: MovieSummary {
                id,
                title: title.to_string(),
                year: 1995,
                runtime: 170,
                rating: 8.3,
                cover_image_url: String::new(),
                genres: vec!["Crime".to_string()],
            },
            description: String::new(),
            language: None,
            download_count: 0,
            like_count: 0,
            large_cover_image: None,
            background_image: None,
            cast: vec![],
            torrents: vec![],
            trailer_code: String::new(),
        }
    }

    #[test]
    fn idle_until_requested() {
        let fetcher = DetailFetcher::new();
        assert_eq!(fetcher.state(), &DetailState::Idle);
    }

    #[test]
    fn loading_then_loaded() {
        let mut fetcher = DetailFetcher::new();
        let request = fetcher.request("123");
        assert_eq!(request.movie_id, "123");
        assert_eq!(fetcher.state(), &DetailState::Loading);

        fetcher.resolve("123", Ok(detail(123, "Heat")));
        match fetcher.state() {
            DetailState::Loaded(movie) => assert_eq!(movie.summary.title, "Heat"),
            other => panic!("expected loaded, got {:?}", other),
        }
    }

    #[test]
    fn network_failure_shows_an_error() {
        let mut fetcher = DetailFetcher::new();
        fetcher.request("123");
        fetcher.resolve("123", Err(CatalogError::Network("connection refused".into())));

        assert_eq!(
            fetcher.state(),
            &DetailState::Failed(CatalogError::Network("connection refused".into()))
        );
    }

    #[test]
    fn changing_the_id_restarts_from_loading() {
        let mut fetcher = DetailFetcher::new();
        fetcher.request("1");
        fetcher.resolve("1", Ok(detail(1, "First")));

        fetcher.request("2");
        assert_eq!(fetcher.state(), &DetailState::Loading);

        fetcher.resolve("1", Ok(detail(1, "First again")));
        assert_eq!(fetcher.state(), &DetailState::Loading);

        fetcher.resolve("2", Ok(detail(2, "Second")));
        assert!(matches!(fetcher.state(), DetailState::Loaded(m) if m.summary.id == 2));
    }

    #[test]
    fn close_discards_pending_response() {
        let mut fetcher = DetailFetcher::new();
        fetcher.request("7");
        fetcher.close();
        fetcher.resolve("7", Ok(detail(7, "Seven")));
        assert_eq!(fetcher.state(), &DetailState::Idle);
    }
}
