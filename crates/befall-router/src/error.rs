//! Navigation error types

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Setup,
    Render,
    Destroy,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Setup => write!(f, "setup"),
            Hook::Render => write!(f, "render"),
            Hook::Destroy => write!(f, "destroy"),
        }
    }
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("no current route to return to")]
    NoCurrentRoute,

    #[error("route {0} already exists")]
    DuplicateRoute(String),

    #[error("failed to persist state to disk: {0}")]
    Persist(#[from] befall_state::StateError),

    #[error("{route}: {hook} failed: {source:#}")]
    Hook {
        route: String,
        hook: Hook,
        #[source]
        source: anyhow::Error,
    },
}

impl NavigationError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationError::RouteNotFound(_))
    }
}
