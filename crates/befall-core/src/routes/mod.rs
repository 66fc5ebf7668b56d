//! Built-in routes

mod exec;
mod list;

pub use exec::{ExecRoute, FileMode};
pub use list::ListRoute;

use std::sync::Arc;
use std::time::Duration;

use befall_api::{CancelToken, Dumper, TestableRoutes};
use befall_router::RouteRegistry;

use crate::Result;

/// Build the route table. Registration order is the order shown in help.
///
/// A duplicate command id is a programming error; callers treat the
/// returned error as fatal at startup.
pub fn build_registry(
    testable: Arc<TestableRoutes>,
    timeout: Option<Duration>,
    cancel: CancelToken,
) -> Result<RouteRegistry> {
    let mut registry = RouteRegistry::new();

    registry.register(Box::new(ExecRoute::new(
        testable.clone(),
        Dumper::default(),
        timeout,
        cancel,
    )))?;
    registry.register(Box::new(ListRoute::new(testable)))?;

    Ok(registry)
}
