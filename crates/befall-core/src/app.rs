//! Application container
//!
//! Owns the one session state and the navigator. Every command the
//! dispatcher receives goes through here.

use std::io::Write;
use std::sync::Arc;

use befall_api::{default_catalog, ApiClient, CancelToken, TestableRoutes};
use befall_router::{Navigator, RouteRegistry};
use befall_state::{FileStore, RawArgs, SessionState, StateStore};

use crate::complete::{complete, Completion};
use crate::config::Config;
use crate::line::parse_command;
use crate::routes::build_registry;
use crate::Result;

pub struct App {
    config: Config,
    state: SessionState,
    registry: Arc<RouteRegistry>,
    navigator: Navigator,
    cancel: CancelToken,
}

impl App {
    /// Build the app against the configured API, restoring the last
    /// session location from disk when persistence is on.
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config.api_url)?;
        let testable = default_catalog(&client)?;
        let state = FileStore::restore(config.prefs())?;

        Self::with_parts(config, state, testable, Box::new(FileStore::new()))
    }

    pub fn with_parts(
        config: Config,
        state: SessionState,
        testable: TestableRoutes,
        store: Box<dyn StateStore>,
    ) -> Result<Self> {
        let cancel = CancelToken::new();
        let registry = Arc::new(build_registry(
            Arc::new(testable),
            config.exec_timeout(),
            cancel.clone(),
        )?);
        let navigator = Navigator::new(registry.clone(), store);

        tracing::info!(
            routes = registry.len(),
            api_url = %config.api_url,
            persist = ?config.persist,
            "Initialized app"
        );

        Ok(Self {
            config,
            state,
            registry,
            navigator,
            cancel,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Token that aborts the API call of the command in flight. It is
    /// cleared at the start of every command.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Navigate to the route registered under `command`.
    pub fn goto(&mut self, command: &str, args: RawArgs, out: &mut dyn Write) -> Result<()> {
        self.cancel.reset();
        Ok(self.navigator.goto(command, &mut self.state, args, out)?)
    }

    /// Re-run the current route with the arguments it was reached with.
    pub fn refresh(&mut self, out: &mut dyn Write) -> Result<()> {
        self.cancel.reset();
        Ok(self.navigator.goto_current(&mut self.state, out)?)
    }

    /// Parse and run one command line. Blank lines do nothing.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        match parse_command(line)? {
            Some((command, args)) => self.goto(&command, args, out),
            None => Ok(()),
        }
    }

    /// Completions for `line`; `extra_commands` are dispatcher built-ins.
    pub fn complete(&self, extra_commands: &[&str], line: &str) -> Completion {
        complete(&self.registry, &self.state, extra_commands, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use befall_api::{ExecContext, PreparedCall, Response, TestableRoute};
    use befall_args::ArgMap;
    use befall_router::NavigationError;
    use serde_json::{json, Value};

    struct Ping;

    impl TestableRoute for Ping {
        fn id(&self) -> &str {
            "ping"
        }

        fn description(&self) -> &str {
            "Check that the API is reachable"
        }

        fn populate_with_args(&self, _args: &ArgMap) -> befall_api::Result<Box<dyn PreparedCall>> {
            Ok(Box::new(Ping))
        }
    }

    impl PreparedCall for Ping {
        fn type_name(&self) -> &str {
            "PingRequest"
        }

        fn request(&self) -> Value {
            json!({})
        }

        fn exec(&self, ctx: &ExecContext, _state: &SessionState) -> befall_api::Result<Response> {
            ctx.check()?;
            Ok(Response {
                type_name: "PingResponse".to_string(),
                status: 200,
                body: json!({"pong": true}),
            })
        }
    }

    /// Stands in for a call the operator interrupts while it is pending.
    struct Interrupted;

    impl TestableRoute for Interrupted {
        fn id(&self) -> &str {
            "interrupted"
        }

        fn description(&self) -> &str {
            "Cancelled mid-call"
        }

        fn populate_with_args(&self, _args: &ArgMap) -> befall_api::Result<Box<dyn PreparedCall>> {
            Ok(Box::new(Interrupted))
        }
    }

    impl PreparedCall for Interrupted {
        fn type_name(&self) -> &str {
            "InterruptedRequest"
        }

        fn request(&self) -> Value {
            json!({})
        }

        fn exec(&self, ctx: &ExecContext, _state: &SessionState) -> befall_api::Result<Response> {
            ctx.cancel.cancel();
            ctx.check()?;
            unreachable!("cancelled call returned a response")
        }
    }

    fn app_with_state_file(path: &std::path::Path) -> App {
        app_with_routes(path, vec![Arc::new(Ping)])
    }

    fn app_with_routes(path: &std::path::Path, routes: Vec<Arc<dyn TestableRoute>>) -> App {
        let config = Config {
            persist: Some(path.to_path_buf()),
            ..Config::default()
        };
        let state = FileStore::restore(config.prefs()).unwrap();

        let mut testable = TestableRoutes::new();
        for route in routes {
            testable.add(route).unwrap();
        }

        App::with_parts(config, state, testable, Box::new(FileStore::new())).unwrap()
    }

    #[test]
    fn test_builtin_routes_registered() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_state_file(&dir.path().join("state.json"));

        let commands: Vec<&str> = app.registry().all().map(|r| r.command()).collect();
        assert_eq!(commands, vec!["apiexec.exec", "apiexec.list"]);
    }

    #[test]
    fn test_execute_line_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut app = app_with_state_file(&path);
        let mut out = Vec::new();
        app.execute_line("apiexec.exec route=ping", &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"pong\": true"));

        let restored = app_with_state_file(&path);
        assert_eq!(restored.state().location(), app.state().location());
        assert_eq!(restored.state().prefs, app.state().prefs);
    }

    #[test]
    fn test_unknown_command_keeps_session_usable() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_state_file(&dir.path().join("state.json"));
        let mut out = Vec::new();

        let err = app.execute_line("unknown-route", &mut out).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Navigation(NavigationError::RouteNotFound(_))
        ));

        app.execute_line("apiexec.list", &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("ping  Check that the API is reachable"));
    }

    #[test]
    fn test_refresh_reruns_current_route() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_state_file(&dir.path().join("state.json"));
        let mut out = Vec::new();

        assert!(app.refresh(&mut out).is_err());

        app.execute_line("apiexec.list", &mut out).unwrap();
        app.refresh(&mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("ping").count(), 2);
    }

    #[test]
    fn test_cancelled_command_does_not_block_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_routes(
            &dir.path().join("state.json"),
            vec![Arc::new(Ping), Arc::new(Interrupted)],
        );
        let mut out = Vec::new();

        let err = app
            .execute_line("apiexec.exec route=interrupted", &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("request cancelled"));
        assert!(app.cancel_token().is_cancelled());

        app.execute_line("apiexec.exec route=ping", &mut out).unwrap();

        app.cancel_token().cancel();
        app.refresh(&mut out).unwrap();
        assert!(!app.cancel_token().is_cancelled());
    }

    #[test]
    fn test_new_rejects_bad_api_url() {
        let config = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(App::new(config), Err(CoreError::Api(_))));
    }

    #[test]
    fn test_complete_through_app() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_state_file(&dir.path().join("state.json"));

        let completion = app.complete(&["help"], "apiexec.exec route=p");
        assert_eq!(completion.start, 13);
        assert_eq!(completion.candidates, vec!["route=ping"]);
    }
}
