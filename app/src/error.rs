use thiserror::Error;

/// Failure of a single catalog request.
///
/// Each fetch consumer (list, genres, detail) keeps its own copy, so the
/// type is `Clone` and carries messages rather than the transport error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed catalog payload: {0}")]
    Malformed(String),

    #[error("Catalog rejected the query: {0}")]
    Rejected(String),

    #[error("Movie not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Service(ServiceError::Malformed(err.to_string()))
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Service(ServiceError::Malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_a_service_error() {
        let err: CatalogError = ServiceError::NotFound("123".to_string()).into();
        assert!(matches!(err, CatalogError::Service(ServiceError::NotFound(_))));
        assert_eq!(err.to_string(), "Movie not found: 123");
    }

    #[test]
    fn json_errors_are_malformed_payloads() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CatalogError::from(err);
        assert!(matches!(err, CatalogError::Service(ServiceError::Malformed(_))));
    }
}
