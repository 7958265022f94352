//! Data types shared by every metric domain.
//!
//! `meta` holds the construction-time configuration of each domain,
//! `labels` the per-call label values, and `payload` the outcome data
//! supplied once an operation has finished.

pub mod app_error;
pub mod labels;
pub mod meta;
pub mod payload;

pub use app_error::AppError;
pub use labels::*;
pub use meta::*;
pub use payload::*;
