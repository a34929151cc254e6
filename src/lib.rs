//! Read-or-suspend resources for a budget tracking client.
//!
//! A [`Resource`] wraps one asynchronous fetch and can be read synchronously: it either suspends with a
//! [`Settlement`] to wait on, returns the fetched value, or returns the rejection reason.
//! [`fetch_user_data`] starts the tags, records and budgets fetches side by side and returns one resource for each.

mod config;
mod credential;
mod domain;
mod fetch;
mod model;
mod orchestrator;
mod resource;
mod session;
mod settlement;
mod suspense;
pub mod timer;

pub use config::*;
pub use credential::*;
pub use domain::*;
pub use fetch::*;
pub use model::*;
pub use orchestrator::*;
pub use resource::*;
pub use session::*;
pub use settlement::*;
pub use suspense::*;
