//! Backend RPC boundary for the yacht analytics dashboard
//!
//! Rows enter as [`RawRow`], pass through the declarative normalizer and a
//! per-domain mapper, and leave as canonical `yacht_core` records. Nothing
//! past this crate sees the ambiguous row shapes.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod client;
pub mod mappers;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod queries;

// Re-export commonly used types
pub use client::{Backend, SupabaseClient};
pub use mock::{MockBackend, MockResponse};
pub use models::{RawRow, RowShape};
pub use normalize::{FieldDefault, FieldSpec, extract};
pub use queries::{DashboardQueries, Procedure};
