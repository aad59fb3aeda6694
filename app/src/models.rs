use chrono::{DateTime, Utc};
use serde::Deserialize;

const TRAILER_EMBED_BASE: &str = "https://www.youtube.com/embed";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub runtime: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "medium_cover_image", default)]
    pub cover_image_url: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "description_full", default)]
    pub description: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub large_cover_image: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub torrents: Vec<Torrent>,
    #[serde(rename = "yt_trailer_code", default)]
    pub trailer_code: String,
}

impl MovieDetail {
    pub fn trailer_url(&self) -> Option<String> {
        let code = self.trailer_code.trim();
        if code.is_empty() {
            None
        } else {
            Some(format!("{}/{}", TRAILER_EMBED_BASE, code))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastMember {
    #[serde(rename = "imdb_code", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub character_name: String,
    #[serde(rename = "url_small_image", default)]
    pub image_url: Option<String>,
}

/// One downloadable variant of a movie.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Torrent {
    pub url: String,
    #[serde(default)]
    pub quality: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub seeds: u32,
    #[serde(default)]
    pub peers: u32,
    #[serde(
        rename = "date_uploaded_unix",
        default,
        with = "chrono::serde::ts_seconds_option"
    )]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// One successful list response: the page of movies and the server's
/// total match count, always replaced together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoviePage {
    pub movies: Vec<MovieSummary>,
    pub total_count: u64,
}
