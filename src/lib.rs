//! Core library for the `netpulse` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration parsing, the HTTP request executor, the multi-step
//! virtual-user load tester with its metrics aggregation, and report sinks.
//! The primary user-facing interface is the `netpulse` command-line
//! application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod load;
pub mod sinks;
