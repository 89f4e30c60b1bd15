//! Dashboard views
//!
//! Each view pairs a fetch batch with a render function from its
//! [`ViewStatus`](crate::view_state::ViewStatus) to a page payload.

pub mod analytics;
pub mod assistant;
pub mod call_detail;
pub mod conversations;
pub mod dashboard;
