//! Single-input network reconnaissance.
//!
//! Give nexus an IPv4 address, a bare domain or a URL and it classifies the
//! target, resolves it, then runs every probe concurrently: reverse DNS, MX,
//! TXT and NS records, IP geolocation, an HTTP header fingerprint and a TCP
//! connect scan over the common service ports.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use nexus::{LookupConfig, NexusService};
//!
//! #[tokio::main]
//! async fn main() -> nexus::Result<()> {
//!     let service = NexusService::from_config(LookupConfig::default(), Default::default())?;
//!
//!     let result = service.lookup("127.0.0.1", "example.com").await?;
//!     println!("{} -> {}", result.original_input, result.ip);
//!     for port in &result.open_ports {
//!         println!("  {} ({})", port.port, port.service);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/nexus/0.3.0")]

mod service;

// Re-export core types
pub use nexus_core::*;

// Re-export client
pub use nexus_client::{
    Fingerprint, GeoLocate, LookupLimiter, NexusClient, NexusClientBuilder, RateLimitConfig,
};

// Re-export the engine
pub use nexus_recon as recon;
pub use nexus_recon::{LookupConfig, LookupEngine, LookupEngineBuilder, PortSpec};

pub use service::{whoami, NexusService};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
