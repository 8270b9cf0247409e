//! Command-line interface
//!
//! Argument definitions for the `ledger-chain` binary.

pub mod commands;

pub use commands::{normalize_args, Command, Opt};
