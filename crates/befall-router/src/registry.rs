//! Route registry
//!
//! Built once at startup and shared with the dispatcher and the navigator.
//! Registration order is kept for help output.

use crate::error::NavigationError;
use crate::route::Route;
use crate::Result;

#[derive(Default)]
pub struct RouteRegistry {
    routes: Vec<Box<dyn Route>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. A second route with the same command id is rejected and
    /// the registry is left unchanged.
    pub fn register(&mut self, route: Box<dyn Route>) -> Result<()> {
        if self.get(route.command()).is_some() {
            return Err(NavigationError::DuplicateRoute(route.command().to_string()));
        }

        tracing::debug!(route = %route.command(), "Registered route");
        self.routes.push(route);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&dyn Route> {
        self.routes
            .iter()
            .find(|r| r.command() == id)
            .map(|r| r.as_ref())
    }

    pub fn all(&self) -> impl Iterator<Item = &dyn Route> {
        self.routes.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
