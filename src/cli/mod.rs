//! Command-line support for the `snmp-sim` binary.
//!
//! This module is only available with the `cli` feature.

pub mod args;

pub use args::Args;
