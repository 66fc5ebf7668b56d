//! Evil Befall Session State
//!
//! - Session Location: the active route id plus the raw args used to reach it
//! - User Preferences: interactive-mode toggles and the persistence path
//! - Session State: both of the above, the unit of disk persistence
//!
//! A persisted snapshot must fully reconstruct location and preferences.

mod error;
mod state;
mod store;

pub use error::StateError;
pub use state::{Location, RawArgs, SessionState, UserPrefs};
pub use store::{FileStore, StateStore};

pub type Result<T> = std::result::Result<T, StateError>;
