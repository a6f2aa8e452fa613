use thiserror::Error;

use crate::{models::Algorithm, search::SearchError};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no path found between the given points using {algorithm}")]
    NoPathFound { algorithm: Algorithm },
    #[error("internal routing error: {0}")]
    Internal(String),
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}

impl RouteError {
    /// Only a missing path is an expected outcome; everything else means the
    /// caller sent bad data or the core is broken.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RouteError::NoPathFound { .. })
    }

    pub fn from_search(err: SearchError, algorithm: Algorithm) -> Self {
        match err {
            SearchError::NoPathFound { .. } => RouteError::NoPathFound { algorithm },
            other => RouteError::Internal(other.to_string()),
        }
    }
}
