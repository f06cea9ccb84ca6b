//! vendorkit library.
//!
//! This crate fetches the SDL3 and Dear ImGui distributions into vendor
//! directories and compiles the GUI application against them. It is used by
//! the `vendorkit` CLI binary and can be driven programmatically with injected
//! downloaders, extractors, and command executors for testing.
//!
//! # Modules
//!
//! - [`archive`] - Archive download and extraction
//! - [`cli`] - Command-line argument definitions
//! - [`compile`] - Link profile lookup and compiler invocation
//! - [`config`] - Settings file and immutable project configuration
//! - [`dependency`] - Dependency specs, source tables, and layout rules
//! - [`error`] - Semantic error types
//! - [`exec`] - External command execution
//! - [`fetch`] - Vendor directory population
//! - [`layout`] - Archive root flattening
//! - [`output`] - Progress message formatting
//! - [`pipeline`] - The fetch-then-build sequence
//! - [`platform`] - Host OS and architecture detection

pub mod archive;
pub mod cli;
pub mod compile;
pub mod config;
pub mod dependency;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod platform;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
