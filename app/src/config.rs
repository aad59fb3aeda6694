use std::time::Duration;

use config::builder::DefaultState;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::yts::YTS_BASE_URL;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Page size of the genre sample; unset leaves it to the service.
    pub genre_sample_limit: Option<u32>,
    pub log_file: String,
    pub log_filter: String,
}

impl Config {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = defaults()?
            .add_source(File::with_name("catalog").required(false))
            .add_source(Environment::with_prefix("CATALOG"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    ConfigBuilder::builder()
        .set_default("api_base_url", YTS_BASE_URL)?
        .set_default("request_timeout_secs", 30i64)?
        .set_default("log_file", "catalog-browser.log")?
        .set_default("log_filter", "info")
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_point_at_the_public_service() {
        let config: Config = defaults().unwrap().build().unwrap().try_deserialize().unwrap();

        assert_eq!(config.api_base_url, "https://yts.mx/api/v2");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.genre_sample_limit, None);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn file_values_override_defaults() {
        let config: Config = defaults()
            .unwrap()
            .add_source(File::from_str(
                "genre_sample_limit = 50\n\
                 request_timeout_secs = 5\n\
                 log_filter = \"catalog_browser=debug\"",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.genre_sample_limit, Some(50));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.log_filter, "catalog_browser=debug");
        assert_eq!(config.log_file, "catalog-browser.log");
    }
}
