//! # file-save
//!
//! Bootstrap and command-line front end around the `fsa-*` crates.
//!
//! - [`bootstrap`] loads settings, initializes tracing and wires the picker
//! - [`cli`] turns command-line flags into a save request

pub mod bootstrap;
pub mod cli;

pub use cli::{run, Cli};
