//! Core types and errors for the nexus lookup engine.
//!
//! This crate provides the foundational types shared by every nexus crate:
//!
//! - **Types**: the classified [`Target`], the per-probe records and the
//!   aggregate [`LookupResult`]
//! - **Errors**: the request-level taxonomy in [`NexusError`] and its
//!   serialized form [`ErrorBody`]
//!
//! # Example
//!
//! ```rust,ignore
//! use nexus_core::{LookupResult, NexusError, Result};
//!
//! fn summarize(report: &LookupResult) -> Result<()> {
//!     println!("{} -> {}", report.original_input, report.ip);
//!     println!("open: {:?}", report.open_ports);
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/nexus-core/0.3.0")]

mod error;
pub mod types;

pub use error::{ErrorBody, NexusError, Result};
pub use types::*;
