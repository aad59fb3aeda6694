use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::models::MovieSummary;

/// Distinct genre names, kept sorted for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenreSet(BTreeSet<String>);

impl GenreSet {
    pub fn from_movies(movies: &[MovieSummary]) -> Self {
        let genres = movies
            .iter()
            .flat_map(|movie| movie.genres.iter())
            // "" is the filter's "any genre" value, not a genre.
            .filter(|genre| !genre.is_empty())
            .cloned()
            .collect();
        GenreSet(genres)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The genre after `current` in filter order, where `""` (any genre)
    /// comes first and follows the last entry.
    pub fn next_after(&self, current: &str) -> String {
        if current.is_empty() {
            return self.iter().next().unwrap_or_default().to_string();
        }
        self.0
            .range::<str, _>((
                std::ops::Bound::Excluded(current),
                std::ops::Bound::Unbounded,
            ))
            .next()
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenreState {
    #[default]
    Idle,
    Loading,
    Ready(GenreSet),
    Failed(CatalogError),
}

/// Sample request for the genre vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreRequest {
    pub limit: Option<u32>,
}

/// Builds the genre filter vocabulary from one unfiltered listing page.
///
/// Only a single page is sampled, so genres that appear solely outside
/// that page are missing from the set. The service offers no genre
/// listing to do better.
#[derive(Debug, Default)]
pub struct GenreAggregator {
    sample_limit: Option<u32>,
    state: GenreState,
}

impl GenreAggregator {
    pub fn new(sample_limit: Option<u32>) -> Self {
        Self {
            sample_limit,
            state: GenreState::Idle,
        }
    }

    /// Returns the sample request on the first call only.
    pub fn begin(&mut self) -> Option<GenreRequest> {
        if self.state != GenreState::Idle {
            return None;
        }
        self.state = GenreState::Loading;
        Some(GenreRequest {
            limit: self.sample_limit,
        })
    }

    pub fn resolve(&mut self, result: Result<Vec<MovieSummary>, CatalogError>) {
        if self.state != GenreState::Loading {
            warn!("Ignoring genre sample that was not requested");
            return;
        }

        self.state = match result {
            Ok(movies) => {
                let genres = GenreSet::from_movies(&movies);
                debug!("Sampled {} genres from {} movies", genres.len(), movies.len());
                GenreState::Ready(genres)
            }
            Err(err) => GenreState::Failed(err),
        };
    }

    pub fn state(&self) -> &GenreState {
        &self.state
    }

    pub fn genres(&self) -> Option<&GenreSet> {
        match &self.state {
            GenreState::Ready(genres) => Some(genres),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, genres: &[&str]) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            year: 2001,
            runtime: 100,
            rating: 7.0,
            cover_image_url: String::new(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn duplicates_across_movies_collapse() {
        let movies = vec![
            movie(1, &["Action", "Drama"]),
            movie(2, &["Drama", "Comedy"]),
            movie(3, &["Action", "Action"]),
            movie(4, &[]),
            movie(5, &[" Drama", "Sci-Fi "]),
        ];

        let genres = GenreSet::from_movies(&movies);

        let distinct: BTreeSet<&String> = movies.iter().flat_map(|m| m.genres.iter()).collect();
        assert_eq!(genres.len(), distinct.len());
        assert_eq!(
            genres.iter().collect::<Vec<_>>(),
            vec![" Drama", "Action", "Comedy", "Drama", "Sci-Fi "]
        );
    }

    #[test]
    fn empty_genre_name_is_not_a_genre() {
        let genres = GenreSet::from_movies(&[movie(1, &["", "Drama"])]);
        assert_eq!(genres.iter().collect::<Vec<_>>(), vec!["Drama"]);
    }

    #[test]
    fn genre_cycle_starts_and_ends_with_any() {
        let genres = GenreSet::from_movies(&[movie(1, &["Drama", "Action"])]);

        assert_eq!(genres.next_after(""), "Action");
        assert_eq!(genres.next_after("Action"), "Drama");
        assert_eq!(genres.next_after("Drama"), "");
        assert_eq!(GenreSet::default().next_after(""), "");
    }

    #[test]
    fn genre_cycle_recovers_from_unknown_value() {
        let genres = GenreSet::from_movies(&[movie(1, &["Action", "Drama"])]);
        assert_eq!(genres.next_after("Biography"), "Drama");
    }

    #[test]
    fn aggregator_samples_once() {
        let mut aggregator = GenreAggregator::new(Some(20));

        assert_eq!(aggregator.begin(), Some(GenreRequest { limit: Some(20) }));
        assert_eq!(aggregator.begin(), None);

        aggregator.resolve(Ok(vec![movie(1, &["Horror"])]));
        assert!(aggregator.genres().unwrap().iter().any(|g| g == "Horror"));
        assert_eq!(aggregator.begin(), None);
    }

    #[test]
    fn failure_is_held_locally() {
        let mut aggregator = GenreAggregator::new(None);
        aggregator.begin();
        aggregator.resolve(Err(CatalogError::Network("dns".into())));

        assert_eq!(
            aggregator.state(),
            &GenreState::Failed(CatalogError::Network("dns".into()))
        );
        assert!(aggregator.genres().is_none());
    }

    #[test]
    fn unrequested_sample_is_ignored() {
        let mut aggregator = GenreAggregator::new(None);
        aggregator.resolve(Ok(vec![movie(1, &["Horror"])]));
        assert_eq!(aggregator.state(), &GenreState::Idle);
    }
}
