// ── Core error types ──
//
// User-facing errors from postboard-core. Consumers never see HTTP status
// codes or JSON parse failures directly: every `postboard_api::Error`
// becomes a `Fetch` error tagged with the collection that failed.

use strum::Display;
use thiserror::Error;

/// The two remote collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Posts,
    Users,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fetch errors ─────────────────────────────────────────────────
    #[error("Failed to fetch {resource}: {reason}")]
    Fetch {
        resource: Resource,
        reason: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Control errors ───────────────────────────────────────────────
    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidControl {
        field: String,
        value: String,
        reason: String,
    },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Board already started")]
    AlreadyStarted,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap a transport-layer error as a fetch failure for `resource`.
    pub fn fetch(resource: Resource, err: &postboard_api::Error) -> Self {
        Self::Fetch {
            resource,
            reason: err.to_string(),
            status: err.status(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<postboard_api::Error> for CoreError {
    fn from(err: postboard_api::Error) -> Self {
        match err {
            postboard_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            postboard_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS setup failed: {msg}"),
            },
            other => CoreError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_the_resource() {
        let api = postboard_api::Error::Status {
            status: 500,
            url: "http://localhost/users".into(),
        };
        let err = CoreError::fetch(Resource::Users, &api);
        assert!(err.to_string().starts_with("Failed to fetch users"));
        assert!(matches!(err, CoreError::Fetch { status: Some(500), .. }));
    }

    #[test]
    fn tls_setup_is_a_config_error() {
        let err = CoreError::from(postboard_api::Error::Tls("bad pem".into()));
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
