//! nexus - single-input network reconnaissance
//!
//! Look up an IP, domain or URL and get DNS, geolocation, HTTP and open ports
//! in one report.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    nexus_cli::run().await
}
