//! Web layer for the locator.
//!
//! JSON endpoints a browser map and form call into: project a click,
//! translate a form submission, read or clear the highlight.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Locator};
