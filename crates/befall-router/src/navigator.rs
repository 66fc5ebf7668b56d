//! Navigation engine
//!
//! `goto` runs one transition:
//!
//! 1. persist the session as it stands; failure aborts with nothing changed
//! 2. point the session location at the target
//! 3. destroy the route being left, if any
//! 4. resolve the target (`RouteNotFound` if unregistered)
//! 5. `setup` the target
//! 6. `render` the target
//! 7. persist again
//!
//! The destroy hook always belongs to the route being left, never the
//! target. Re-entering the current route therefore destroys and sets it up
//! again.
//!
//! If any of steps 3 to 6 fails, the in-memory location is rolled back to
//! the route being left, matching what the first persist wrote to disk. The
//! left route has still been destroyed at that point. A failure in step 7
//! keeps the new location, since the target did render, and memory is then
//! ahead of disk until the next successful persist.

use std::io::Write;
use std::sync::Arc;

use befall_state::{Location, RawArgs, SessionState, StateStore};

use crate::error::{Hook, NavigationError};
use crate::registry::RouteRegistry;
use crate::route::Route;
use crate::Result;

pub struct Navigator {
    registry: Arc<RouteRegistry>,
    store: Box<dyn StateStore>,
}

impl Navigator {
    pub fn new(registry: Arc<RouteRegistry>, store: Box<dyn StateStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// The route named by the session location, if it is registered.
    pub fn current_route<'a>(&'a self, state: &SessionState) -> Option<&'a dyn Route> {
        state
            .location()
            .id
            .as_deref()
            .and_then(|id| self.registry.get(id))
    }

    /// Transition the session to `id`.
    pub fn goto(
        &self,
        id: &str,
        state: &mut SessionState,
        args: RawArgs,
        out: &mut dyn Write,
    ) -> Result<()> {
        self.store.persist(state)?;

        let previous = state.replace_location(Location::new(id, args.clone()));

        let result = self.transition(id, previous.id.as_deref(), state, &args, out);
        if let Err(e) = result {
            tracing::warn!(
                route = %id,
                previous = ?previous.id,
                error = %e,
                "Navigation failed, restoring previous location"
            );
            state.replace_location(previous);
            return Err(e);
        }

        self.store.persist(state)?;

        tracing::info!(route = %id, previous = ?previous.id, "Navigated");
        Ok(())
    }

    /// Re-enter the current route with the arguments it was reached with.
    pub fn goto_current(&self, state: &mut SessionState, out: &mut dyn Write) -> Result<()> {
        let Location { id, data } = state.location().clone();
        let id = id.ok_or(NavigationError::NoCurrentRoute)?;
        self.goto(&id, state, data, out)
    }

    fn transition(
        &self,
        id: &str,
        previous: Option<&str>,
        state: &SessionState,
        args: &RawArgs,
        out: &mut dyn Write,
    ) -> Result<()> {
        if let Some(leaving) = previous.and_then(|p| self.registry.get(p)) {
            leaving
                .destroy(state)
                .map_err(|source| hook_error(leaving, Hook::Destroy, source))?;
        }

        let route = self
            .registry
            .get(id)
            .ok_or_else(|| NavigationError::RouteNotFound(id.to_string()))?;

        route
            .setup(state)
            .map_err(|source| hook_error(route, Hook::Setup, source))?;

        route
            .render(state, args, out)
            .map_err(|source| hook_error(route, Hook::Render, source))?;

        Ok(())
    }
}

fn hook_error(route: &dyn Route, hook: Hook, source: anyhow::Error) -> NavigationError {
    NavigationError::Hook {
        route: route.command().to_string(),
        hook,
        source,
    }
}
