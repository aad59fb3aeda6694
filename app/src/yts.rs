use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::{CatalogError, ServiceError};
use crate::filters::FilterOptions;
use crate::models::{MovieDetail, MoviePage, MovieSummary};

pub const YTS_BASE_URL: &str = "https://yts.mx/api/v2";

/// Read-only access to the remote movie catalog.
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Filtered, paginated listing for one filter snapshot.
    async fn list_movies(&self, options: &FilterOptions) -> Result<MoviePage, CatalogError>;

    /// Unfiltered listing used to sample the genre vocabulary. `None`
    /// leaves the page size to the service.
    async fn sample_movies(&self, limit: Option<u32>) -> Result<Vec<MovieSummary>, CatalogError>;

    async fn movie_details(&self, movie_id: &str) -> Result<MovieDetail, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct YtsClient {
    client: Client,
    base_url: String,
}

impl YtsClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_envelope(status, &body).map_err(|err| {
            error!("Catalog request to {} failed: {}", endpoint, err);
            err
        })
    }
}

#[async_trait]
impl Catalog for YtsClient {
    async fn list_movies(&self, options: &FilterOptions) -> Result<MoviePage, CatalogError> {
        debug!("Listing movies: {}", options);

        let data: ListData = self
            .get("list_movies.json", &options.to_query_params())
            .await?;
        Ok(data.into())
    }

    async fn sample_movies(&self, limit: Option<u32>) -> Result<Vec<MovieSummary>, CatalogError> {
        debug!("Sampling movies for genres, limit={:?}", limit);

        let data: ListData = self
            .get("list_movies.json", &sample_params(limit))
            .await?;
        Ok(data.movies.unwrap_or_default())
    }

    async fn movie_details(&self, movie_id: &str) -> Result<MovieDetail, CatalogError> {
        debug!("Fetching details for movie {}", movie_id);

        let data: DetailData = self
            .get("movie_details.json", &detail_params(movie_id))
            .await?;
        data.into_detail(movie_id)
    }
}

/// The genre sample carries no filter fields, only an optional page size.
fn sample_params(limit: Option<u32>) -> Vec<(&'static str, String)> {
    limit
        .map(|limit| vec![("limit", limit.to_string())])
        .unwrap_or_default()
}

fn detail_params(movie_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("movie_id", movie_id.to_string()),
        ("with_images", "true".to_string()),
        ("with_cast", "true".to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    status_message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    movie_count: u64,
    // Absent when nothing matches.
    #[serde(default)]
    movies: Option<Vec<MovieSummary>>,
}

impl From<ListData> for MoviePage {
    fn from(data: ListData) -> Self {
        MoviePage {
            movies: data.movies.unwrap_or_default(),
            total_count: data.movie_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailData {
    #[serde(default)]
    movie: Option<MovieDetail>,
}

impl DetailData {
    fn into_detail(self, movie_id: &str) -> Result<MovieDetail, CatalogError> {
        // Unknown ids come back as "ok" with an empty movie whose id is 0.
        match self.movie {
            Some(movie) if movie.summary.id != 0 => Ok(movie),
            _ => Err(ServiceError::NotFound(movie_id.to_string()).into()),
        }
    }
}

fn parse_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, CatalogError> {
    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        }
        .into());
    }

    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if envelope.status != "ok" {
        return Err(ServiceError::Rejected(envelope.status_message).into());
    }

    envelope
        .data
        .ok_or_else(|| ServiceError::Malformed("response has no data".to_string()).into())
}
