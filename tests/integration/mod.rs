//! Integration test suite for ctmpl
//!
//! End-to-end tests that drive the `ctmpl` binary with `assert_cmd`.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **deps**: dependency listing in text and JSON
//! - **render**: rendering against JSON and TOML snapshots
//! - **errors**: exit codes and messages for every failure class
//! - **config**: engine configuration file handling

#[path = "../common/mod.rs"]
mod common;

mod config;
mod deps;
mod errors;
mod render;
