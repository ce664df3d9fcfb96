//! The surface an interactive front end talks to: start a build, stop it,
//! receive its events and format them.

pub mod messages;
pub mod proxy;
pub mod state;
pub mod tasks;

pub use messages::{Language, Messages};
pub use proxy::EventProxy;
pub use state::{AppState, StopHandle};
pub use tasks::{start_build, BuildRequest, StartError, ValidationError};
