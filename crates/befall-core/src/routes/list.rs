//! `apiexec.list`

use std::io::Write;
use std::sync::Arc;

use befall_api::TestableRoutes;
use befall_router::{ArgSpec, Route};
use befall_state::{RawArgs, SessionState};

pub struct ListRoute {
    routes: Arc<TestableRoutes>,
}

impl ListRoute {
    pub fn new(routes: Arc<TestableRoutes>) -> Self {
        Self { routes }
    }
}

impl Route for ListRoute {
    fn command(&self) -> &str {
        "apiexec.list"
    }

    fn description(&self) -> &str {
        "List the API endpoints that can be tested"
    }

    fn arguments(&self) -> &[ArgSpec] {
        &[]
    }

    fn setup(&self, _state: &SessionState) -> anyhow::Result<()> {
        Ok(())
    }

    fn destroy(&self, _state: &SessionState) -> anyhow::Result<()> {
        Ok(())
    }

    fn render(
        &self,
        _state: &SessionState,
        _args: &RawArgs,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let width = self.routes.iter().map(|r| r.id().len()).max().unwrap_or(0);
        for route in self.routes.iter() {
            writeln!(out, "{:<width$}  {}", route.id(), route.description(), width = width)?;
        }
        Ok(())
    }
}
