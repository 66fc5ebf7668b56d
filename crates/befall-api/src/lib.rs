//! Evil Befall API Surface
//!
//! - Testable routes: API calls that can be populated from decoded
//!   arguments and executed against the live API
//! - Execution context: timeout and cancellation for every call
//! - Dumper: verbose structural rendering of requests and responses

mod catalog;
mod context;
mod dump;
mod error;
mod http;
mod route;

pub use catalog::{default_catalog, EchoRequest, PingRequest};
pub use context::{CancelToken, ExecContext};
pub use dump::{Dumper, RenderFn};
pub use error::ApiError;
pub use http::{ApiClient, Endpoint, Method};
pub use route::{PreparedCall, Response, TestableRoute, TestableRoutes};

pub type Result<T> = std::result::Result<T, ApiError>;
