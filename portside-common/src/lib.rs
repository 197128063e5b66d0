//! Common types and utilities shared between portside-console and portside-cli

pub mod azure;
pub mod endpoint;
pub mod kubernetes;

/// Error returned by every backend collaborator
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API request failed: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        /// Error detail reported by the backend, when the body carried one
        details: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("System error: {0}")]
    System(String),
}

impl Error {
    /// Text shown to the user in a failure notification.
    ///
    /// Backend errors that carry a detail field are reported by that detail
    /// alone; everything else falls back to the display string.
    pub fn user_detail(&self) -> String {
        match self {
            Error::Api {
                details: Some(details),
                ..
            } if !details.is_empty() => details.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_detail_prefers_backend_detail() {
        let err = Error::Api {
            status: 409,
            message: "conflict".to_string(),
            details: Some("container group already exists".to_string()),
        };
        assert_eq!(err.user_detail(), "container group already exists");
    }

    #[test]
    fn test_user_detail_falls_back_to_display() {
        let err = Error::Api {
            status: 500,
            message: "boom".to_string(),
            details: None,
        };
        assert_eq!(err.user_detail(), "API request failed: 500 - boom");

        let err = Error::NotFound("pool web".to_string());
        assert_eq!(err.user_detail(), "Resource not found: pool web");
    }
}
