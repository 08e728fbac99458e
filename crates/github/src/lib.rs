//! GitHub Actions runner integration for setup-sops.
//!
//! This crate provides:
//! - [`ActionsRunner`] for step outputs (`$GITHUB_OUTPUT`), search path
//!   updates (`$GITHUB_PATH`) and workflow commands on stdout
//! - [`publish`] for exposing an installed executable to later steps

#![warn(missing_docs)]

mod commands;
mod error;
mod publish;
mod runner;

pub use commands::{escape_data, escape_property};
pub use error::RunnerError;
pub use publish::{Published, output_name, publish};
pub use runner::ActionsRunner;
