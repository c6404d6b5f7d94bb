//! Core application types.
//!
//! [`error`] holds the tool-level error enum and the conversion from any
//! `anyhow::Error` into a colored, suggestion-bearing [`ErrorContext`].

pub mod error;

pub use error::{CtmplError, ErrorContext, user_friendly_error};
