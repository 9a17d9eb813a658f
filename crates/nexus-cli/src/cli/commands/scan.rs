//! `nexus scan` - TCP connect scan of a single host.

use anyhow::Result;
use colored::Colorize;
use nexus::recon::classify::parse_dotted_quad;
use nexus::recon::{dns, DnsResolver, ScanResult, Scanner};
use std::net::Ipv4Addr;
use std::time::Duration;
use tabled::{Table, Tabled};

use super::Context;
use crate::cli::args::ScanArgs;

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Service")]
    service: String,
}

pub async fn execute(ctx: Context, args: ScanArgs) -> Result<()> {
    let mut lookup = ctx.config.lookup_config()?;
    if let Some(ports) = args.ports {
        lookup = lookup.ports(ports);
    }
    if let Some(ms) = args.timeout {
        lookup = lookup.port_timeout(Duration::from_millis(ms));
    }
    if let Some(limit) = args.concurrency {
        lookup = lookup.concurrency(limit);
    }

    let ip = resolve(&args.target).await?;
    let scanner = Scanner::with_config(&lookup);

    let spinner = crate::output::spinner(
        ctx.output_format,
        format!("Scanning {} ports on {ip}...", scanner.candidate_ports().len()),
    );
    let result = scanner.scan(ip).await;
    spinner.finish_and_clear();

    if ctx.output_format.is_pretty() {
        print_scan_pretty(&args.target, &result, &ctx);
    } else {
        ctx.output_format.print(&result)?;
    }

    Ok(())
}

/// The target as an address, resolving hostnames through the system resolver.
async fn resolve(target: &str) -> Result<Ipv4Addr> {
    let target = target.trim();
    if let Some(ip) = parse_dotted_quad(target) {
        return Ok(ip);
    }

    let resolver = DnsResolver::new()?;
    dns::forward_resolve(&resolver, target)
        .await
        .first()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve IP for {target}"))
}

fn print_scan_pretty(target: &str, result: &ScanResult, ctx: &Context) {
    if target == result.target.to_string() {
        println!("{} {}", "Host:".bold(), target.cyan().bold());
    } else {
        println!(
            "{} {} {}",
            "Host:".bold(),
            target.cyan().bold(),
            format!("({})", result.target).dimmed()
        );
    }
    println!();

    if result.open_ports.is_empty() {
        println!("  {}", "No open ports found.".yellow());
    } else {
        let rows: Vec<PortRow> = result
            .open_ports
            .iter()
            .map(|p| PortRow {
                port: p.port,
                state: "open".to_string(),
                service: p.service.clone(),
            })
            .collect();
        println!("{}", ctx.style_table(&mut Table::new(&rows)));
    }

    println!();
    println!(
        "{}",
        format!(
            "{} of {} ports open, scanned in {:.2}s",
            result.open_ports.len(),
            result.scanned_ports.len(),
            result.scan_time.as_secs_f64()
        )
        .dimmed()
    );
}
