#![forbid(unsafe_code)]

//! Shared error type and naming constants for cfgsign.

pub mod error;
pub mod names;

pub use error::{Error, Result};
pub use names::{attr, layout, node};
