//! HTTP collaborators for the nexus lookup engine.
//!
//! This crate provides the [`NexusClient`] used by the geolocation and HTTP
//! fingerprint probes, the [`GeoLocate`] and [`Fingerprint`] seams the
//! coordinator depends on, and the [`LookupLimiter`] token buckets applied in
//! front of the lookup entry point.

#![doc(html_root_url = "https://docs.rs/nexus-client/0.3.0")]

mod client;
mod config;
pub mod fingerprint;
pub mod geo;
mod limiter;

pub use client::{NexusClient, NexusClientBuilder};
pub use config::*;
pub use fingerprint::Fingerprint;
pub use geo::GeoLocate;
pub use limiter::LookupLimiter;
pub use nexus_core::{NexusError, Result};
