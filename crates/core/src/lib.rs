//! Core types for setup-sops.
//!
//! This crate holds the pieces shared by the release fetcher and the runner
//! integration:
//!
//! - [`Error`] and [`Result`], the error model for every fallible step
//! - [`tools`] - platform identification and per-tool configuration
//! - [`cache`] - the on-disk tool cache keyed by (tool, version, arch)
//! - [`locate`] - recursive search for an executable inside a cached tree

pub mod cache;
mod error;
pub mod locate;
pub mod tools;

pub use error::{Error, Result};
