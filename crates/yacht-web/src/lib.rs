//! View-state container, dashboard views and JSON server for the yacht
//! analytics dashboard

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod handlers;
pub mod presentation;
pub mod routes;
pub mod server;
pub mod state;
pub mod view_state;
pub mod views;

pub use server::build_app;
pub use state::{AppState, VoiceFactory, VoiceSetup};
pub use view_state::{ViewError, ViewState, ViewStatus};
