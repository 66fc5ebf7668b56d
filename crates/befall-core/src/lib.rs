//! Evil Befall Core
//!
//! Wires the route registry, navigator and session state together and
//! provides the built-in routes used to exercise a remote API.

mod app;
mod complete;
mod config;
mod error;
mod line;
pub mod routes;

pub use app::App;
pub use complete::Completion;
pub use config::Config;
pub use error::CoreError;
pub use line::{parse_args, parse_command, split_line};

pub use befall_api::{CancelToken, TestableRoutes};
pub use befall_router::{NavigationError, Route, RouteRegistry};
pub use befall_state::{FileStore, RawArgs, SessionState, StateStore, UserPrefs};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Logs go to stderr so they never mix with command output. Defaults to
/// `warn`; set `RUST_LOG` for more.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
