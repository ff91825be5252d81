//! Error types for the request pipeline.

use thiserror::Error;

use crate::request::Method;
use crate::response::Response;

/// Errors raised while building or running the pipeline.
///
/// `Pattern` and `MountConflict` are build-time errors returned by
/// [`Application::build`](crate::Application::build). The others are
/// per-request and are turned into responses by
/// [`Router::handle`](crate::Router::handle).
#[derive(Debug, Error)]
pub enum RouterError {
    /// Malformed route pattern.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },

    /// Two mounts share the same prefix inside one collection.
    #[error("conflicting mount at `{0}`")]
    MountConflict(String),

    /// A handler or middleware asked for a type nobody registered.
    #[error("unresolved dependency: no binding for `{type_name}`")]
    UnresolvedDependency { type_name: &'static str },

    /// No route matched the request path.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// The path matched, but not for this method.
    #[error("method not allowed: {method} for {path}")]
    MethodNotAllowed {
        method: String,
        path: String,
        allowed: Vec<Method>,
    },
}

impl RouterError {
    pub(crate) fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors that can only happen while building the tree.
    pub fn is_build_error(&self) -> bool {
        matches!(self, Self::Pattern { .. } | Self::MountConflict(_))
    }

    /// Translates a per-request error into the response sent to the client.
    pub fn into_response(self) -> Response {
        match self {
            Self::NotFound { .. } => Response::not_found(),
            Self::MethodNotAllowed { allowed, .. } => {
                let allow = allowed
                    .iter()
                    .map(|method| method.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Response::method_not_allowed().header("Allow", allow)
            }
            _ => Response::internal_server_error(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, RouterError>;
