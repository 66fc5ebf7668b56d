//! `apiexec.exec`: run a testable route with typed arguments
//!
//! Every argument other than `route` and the `__` control flags is decoded
//! with `befall_args` and used to populate the request. The response is
//! printed as pretty JSON, or written to `__file` as JSON or as a dump.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use befall_api::{CancelToken, Dumper, ExecContext, Response, TestableRoutes};
use befall_args::{decode_filtered, map_to_json};
use befall_router::{ArgSpec, CompletableRoute, Route};
use befall_state::{RawArgs, SessionState};

use crate::error::CoreError;
use crate::Result;

const ROUTE_ARG: &str = "route";
const CONTROL_PREFIX: &str = "__";

const DEBUG_FLAG: &str = "__debug";
const SPEW_REQ_FLAG: &str = "__spew.req";
const SPEW_RESP_FLAG: &str = "__spew.resp";
const FILE_ARG: &str = "__file";
const FILE_MODE_ARG: &str = "__file.mode";

const ARGUMENTS: &[ArgSpec] = &[
    ArgSpec::new(ROUTE_ARG, "Testable route to execute", "string"),
    ArgSpec::new(DEBUG_FLAG, "Print debug information", "bool"),
    ArgSpec::new(SPEW_REQ_FLAG, "Spew the request", "bool"),
    ArgSpec::new(SPEW_RESP_FLAG, "Spew the response", "bool"),
    ArgSpec::new(FILE_ARG, "Write the response to a file", "string"),
    ArgSpec::new(FILE_MODE_ARG, "File mode (json, spew)", "string"),
];

/// Output format for `__file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    #[default]
    Json,
    Spew,
}

impl FromStr for FileMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(FileMode::Json),
            "spew" => Ok(FileMode::Spew),
            other => Err(CoreError::UnsupportedFileMode(other.to_string())),
        }
    }
}

fn is_control_arg(key: &str) -> bool {
    key == ROUTE_ARG || key.starts_with(CONTROL_PREFIX)
}

fn flag(args: &RawArgs, name: &str) -> bool {
    args.get(name).is_some_and(|v| v == "true")
}

pub struct ExecRoute {
    routes: Arc<TestableRoutes>,
    dumper: Dumper,
    timeout: Option<Duration>,
    cancel: CancelToken,
}

impl ExecRoute {
    pub fn new(
        routes: Arc<TestableRoutes>,
        dumper: Dumper,
        timeout: Option<Duration>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            routes,
            dumper,
            timeout,
            cancel,
        }
    }

    fn execute(&self, state: &SessionState, args: &RawArgs, out: &mut dyn Write) -> Result<()> {
        if flag(args, DEBUG_FLAG) {
            for (k, v) in args {
                writeln!(out, "{} {} {:?}", k, v, v.as_bytes())?;
            }
        }

        let id = args
            .get(ROUTE_ARG)
            .ok_or(CoreError::MissingArgument(ROUTE_ARG))?;
        let route = self.routes.require(id)?;

        let decoded = decode_filtered(args, is_control_arg)?;

        writeln!(out, "Route ID: {}", route.id())?;
        writeln!(out, "Route Req Send:")?;
        writeln!(out, "{}", self.dumper.dump("ArgMap", &map_to_json(&decoded)))?;

        let call = route.populate_with_args(&decoded)?;

        if flag(args, SPEW_REQ_FLAG) {
            writeln!(out, "{}", self.dumper.dump(call.type_name(), &call.request()))?;
        }

        let ctx = ExecContext::with_cancel(self.timeout, self.cancel.clone());
        tracing::debug!(route = %route.id(), timeout = ?ctx.timeout, "Executing testable route");
        let resp = call.exec(&ctx, state)?;

        writeln!(out, "Route Resp Recv:")?;

        if flag(args, SPEW_RESP_FLAG) {
            writeln!(out, "{}", self.dumper.dump(&resp.type_name, &resp.body))?;
            return Ok(());
        }

        if let Some(file) = args.get(FILE_ARG).filter(|f| !f.is_empty()) {
            let mode = match args.get(FILE_MODE_ARG) {
                Some(mode) => mode.parse()?,
                None => FileMode::default(),
            };
            self.write_response(Path::new(file), mode, &resp)?;

            let label = match mode {
                FileMode::Json => "JSON",
                FileMode::Spew => "Spew",
            };
            writeln!(out, "{} response written to file: {}", label, file)?;
            return Ok(());
        }

        writeln!(out, "{}", serde_json::to_string_pretty(&resp.body)?)?;
        Ok(())
    }

    fn write_response(&self, path: &Path, mode: FileMode, resp: &Response) -> Result<()> {
        let mut file = File::create(path)?;
        match mode {
            FileMode::Json => {
                serde_json::to_writer(&mut file, &resp.body)?;
                writeln!(file)?;
            }
            FileMode::Spew => {
                file.write_all(self.dumper.dump(&resp.type_name, &resp.body).as_bytes())?;
            }
        }
        Ok(())
    }
}

impl Route for ExecRoute {
    fn command(&self) -> &str {
        "apiexec.exec"
    }

    fn description(&self) -> &str {
        "Execute/Make a request to an API endpoint that can be tested"
    }

    fn arguments(&self) -> &[ArgSpec] {
        ARGUMENTS
    }

    fn setup(&self, _state: &SessionState) -> anyhow::Result<()> {
        Ok(())
    }

    fn destroy(&self, _state: &SessionState) -> anyhow::Result<()> {
        Ok(())
    }

    fn render(
        &self,
        state: &SessionState,
        args: &RawArgs,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        Ok(self.execute(state, args, out)?)
    }

    fn as_completable(&self) -> Option<&dyn CompletableRoute> {
        Some(self)
    }
}

impl CompletableRoute for ExecRoute {
    fn completion(
        &self,
        _state: &SessionState,
        _line: &str,
        args: &RawArgs,
    ) -> anyhow::Result<Vec<String>> {
        let chosen = args.get(ROUTE_ARG).and_then(|id| self.routes.get(id));
        if chosen.is_none() {
            return Ok(self
                .routes
                .iter()
                .map(|r| format!("{}={}", ROUTE_ARG, r.id()))
                .collect());
        }

        Ok(ARGUMENTS
            .iter()
            .filter(|spec| spec.name != ROUTE_ARG && !args.contains_key(spec.name))
            .map(|spec| format!("{}=", spec.name))
            .collect())
    }
}
