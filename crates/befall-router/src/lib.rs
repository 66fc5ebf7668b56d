//! Evil Befall Routing
//!
//! A route is a page/operation with `setup`, `render` and `destroy` hooks.
//! The navigator moves the session between routes:
//!
//! ```text
//! persist ─▶ set location ─▶ destroy(previous) ─▶ setup(target) ─▶ render(target) ─▶ persist
//! ```

mod error;
mod navigator;
mod registry;
mod route;

pub use error::{Hook, NavigationError};
pub use navigator::Navigator;
pub use registry::RouteRegistry;
pub use route::{ArgSpec, CompletableRoute, Route};

pub type Result<T> = std::result::Result<T, NavigationError>;
