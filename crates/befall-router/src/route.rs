//! Route contract

use std::io::Write;

use befall_state::{RawArgs, SessionState};

/// One accepted argument: name, description and a default/type hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub hint: &'static str,
}

impl ArgSpec {
    pub const fn new(name: &'static str, description: &'static str, hint: &'static str) -> Self {
        Self {
            name,
            description,
            hint,
        }
    }
}

/// A page/operation the session can navigate to.
///
/// Hooks get a shared reference to the session; only the navigator changes
/// the session location.
pub trait Route: Send + Sync {
    /// Command id, unique across the registry
    fn command(&self) -> &str;

    fn description(&self) -> &str;

    fn arguments(&self) -> &[ArgSpec];

    /// Prepare any state the route needs before rendering.
    fn setup(&self, state: &SessionState) -> anyhow::Result<()>;

    /// Called when the session leaves this route.
    fn destroy(&self, state: &SessionState) -> anyhow::Result<()>;

    fn render(&self, state: &SessionState, args: &RawArgs, out: &mut dyn Write)
        -> anyhow::Result<()>;

    /// Routes with their own input completion return themselves here.
    fn as_completable(&self) -> Option<&dyn CompletableRoute> {
        None
    }
}

/// Custom input completion for a route's arguments.
pub trait CompletableRoute {
    fn completion(
        &self,
        state: &SessionState,
        line: &str,
        args: &RawArgs,
    ) -> anyhow::Result<Vec<String>>;
}
