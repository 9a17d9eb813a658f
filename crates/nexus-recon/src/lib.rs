//! Target classification, resolution, port scanning and probe coordination.
//!
//! The entry point is [`LookupEngine::lookup`], which classifies an input,
//! resolves it when needed, fans out every probe concurrently and aggregates
//! the settled values into one [`nexus_core::LookupResult`].

#![doc(html_root_url = "https://docs.rs/nexus-recon/0.3.0")]

mod error;

pub mod classify;
pub mod config;
pub mod coordinator;
pub mod dns;
pub mod probe;
pub mod scanner;

pub use classify::classify;
pub use config::LookupConfig;
pub use coordinator::{LookupEngine, LookupEngineBuilder};
pub use dns::{DnsBackend, DnsResolver};
pub use error::{ReconError, ReconResult};
pub use scanner::{Connector, PortSpec, ScanResult, Scanner, TcpConnector};
