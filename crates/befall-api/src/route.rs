//! Testable route contract

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use befall_args::ArgMap;
use befall_state::SessionState;

use crate::context::ExecContext;
use crate::error::ApiError;
use crate::Result;

/// Result of executing a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Type identifier used to pick a dump renderer
    pub type_name: String,
    pub status: u16,
    pub body: Value,
}

/// An API call definition that can be filled in from decoded arguments.
pub trait TestableRoute: Send + Sync {
    fn id(&self) -> &str;

    fn description(&self) -> &str;

    /// Build the request from `args`. A mismatch between the supplied names
    /// or types and the request shape is reported as `ApiError::Populate`.
    fn populate_with_args(&self, args: &ArgMap) -> Result<Box<dyn PreparedCall>>;
}

/// A populated request, ready to send.
pub trait PreparedCall {
    /// Type identifier of the request
    fn type_name(&self) -> &str;

    /// The request as a JSON value, for debug output
    fn request(&self) -> Value;

    fn exec(&self, ctx: &ExecContext, state: &SessionState) -> Result<Response>;
}

/// The set of testable routes, in registration order.
#[derive(Clone, Default)]
pub struct TestableRoutes {
    routes: Vec<Arc<dyn TestableRoute>>,
}

impl TestableRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, route: Arc<dyn TestableRoute>) -> Result<()> {
        if self.get(route.id()).is_some() {
            return Err(ApiError::DuplicateRoute(route.id().to_string()));
        }
        self.routes.push(route);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn TestableRoute>> {
        self.routes.iter().find(|r| r.id() == id)
    }

    pub fn require(&self, id: &str) -> Result<&Arc<dyn TestableRoute>> {
        self.get(id)
            .ok_or_else(|| ApiError::UnknownRoute(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TestableRoute>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
