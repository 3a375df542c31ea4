//! CalVer release automation for single packages and JavaScript monorepos.
//!
//! Commit history is classified into a release decision per package, the
//! next `YY.MM.PATCH` or `YY.MM.MINOR.PATCH` version is computed, and the
//! result is handed to a sequence of lifecycle plugins.

pub mod analyzer;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod path_helpers;
pub mod plugin;
pub mod vcs;
pub mod version;
pub mod workspace;

pub use error::{CalverError, Result};

#[cfg(test)]
pub mod test_helpers;
