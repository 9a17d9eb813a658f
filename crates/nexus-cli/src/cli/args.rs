//! Command-line argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use nexus::PortSpec;

use crate::output::OutputFormat;

/// Single-input network reconnaissance
///
/// Give it an IPv4 address, a domain or a URL and get DNS records,
/// geolocation, HTTP server headers and open TCP ports in one report.
#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full lookup: resolve, then DNS, geolocation, HTTP and ports at once
    Lookup(LookupArgs),

    /// TCP connect scan only
    Scan(ScanArgs),

    /// DNS queries
    Dns(DnsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Lookup command
// ============================================================================

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// IPv4 addresses, domains or URLs
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Ports to scan: "default", a range "1-1024" or a list "22,80,8000-8100"
    #[arg(short, long)]
    pub ports: Option<PortSpec>,

    /// Per-port connect timeout in milliseconds
    #[arg(long)]
    pub port_timeout: Option<u64>,

    /// HTTP fingerprint timeout in milliseconds
    #[arg(long)]
    pub http_timeout: Option<u64>,

    /// Geolocation timeout in milliseconds
    #[arg(long)]
    pub geo_timeout: Option<u64>,
}

// ============================================================================
// Scan command
// ============================================================================

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// IPv4 address or hostname to scan
    pub target: String,

    /// Ports to scan: "default", a range "1-1024" or a list "22,80,8000-8100"
    #[arg(short, long)]
    pub ports: Option<PortSpec>,

    /// Per-port connect timeout in milliseconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Maximum in-flight connects
    #[arg(short, long)]
    pub concurrency: Option<usize>,
}

// ============================================================================
// DNS command
// ============================================================================

#[derive(Args, Debug)]
pub struct DnsArgs {
    #[command(subcommand)]
    pub command: DnsCommands,
}

#[derive(Subcommand, Debug)]
pub enum DnsCommands {
    /// Resolve hostnames to IPv4 addresses
    Resolve {
        /// Hostnames to resolve (comma-separated or multiple args)
        #[arg(required = true)]
        hostnames: Vec<String>,
    },

    /// Reverse DNS lookup
    Reverse {
        /// IPv4 addresses (comma-separated or multiple args)
        #[arg(required = true)]
        ips: Vec<String>,
    },

    /// MX, TXT and NS records for a domain
    Records {
        /// Domain name to query
        domain: String,
    },
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., output_format, port_timeout_ms, ports)
        key: String,

        /// Value to set
        value: String,
    },

    /// Restore the default configuration
    Reset,

    /// Show config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["nexus", "-vv", "lookup", "example.com"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_lookup_port_spec() {
        let cli =
            Cli::try_parse_from(["nexus", "lookup", "a.test", "b.test", "-p", "22,80"]).unwrap();
        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.targets, vec!["a.test", "b.test"]);
        assert_eq!(args.ports, Some(PortSpec::List(vec![22, 80])));
    }

    #[test]
    fn test_bad_port_spec_rejected() {
        assert!(Cli::try_parse_from(["nexus", "scan", "10.0.0.1", "-p", "90-80"]).is_err());
    }
}
