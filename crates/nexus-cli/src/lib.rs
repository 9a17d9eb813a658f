//! # nexus-cli
//!
//! Command-line interface for the nexus lookup engine.
//!
//! ## Features
//!
//! - **Lookup**: one unified report per IP, domain or URL
//! - **Scan**: TCP connect scan over the common service ports or a custom set
//! - **DNS**: forward, reverse and MX/TXT/NS record queries
//! - **Multiple output formats**: Pretty tables, JSON, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
