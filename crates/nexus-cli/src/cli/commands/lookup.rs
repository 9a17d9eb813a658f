//! `nexus lookup` - Full reconnaissance report for one or more targets.

use anyhow::Result;
use colored::Colorize;
use futures_util::future::join_all;
use nexus::recon::classify;
use nexus::{
    ErrorBody, HttpFingerprint, LookupConfig, LookupEngine, LookupResult, NexusError,
};
use std::time::Duration;
use tabled::{Table, Tabled};

use super::Context;
use crate::cli::args::LookupArgs;

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Service")]
    service: String,
}

pub async fn execute(ctx: Context, args: LookupArgs) -> Result<()> {
    let lookup = lookup_config(&ctx, &args)?;

    // Skip resolver and client setup when no target can be looked up at all
    let engine = if args.targets.iter().any(|t| classify(t).is_ok()) {
        Some(ctx.engine(lookup)?)
    } else {
        None
    };

    let spinner = crate::output::spinner(
        ctx.output_format,
        format!("Probing {} target(s)...", args.targets.len()),
    );
    let outcomes = run_all(engine.as_ref(), &args.targets).await;
    spinner.finish_and_clear();

    let failed = outcomes.iter().filter(|o| o.is_err()).count();

    if ctx.output_format.is_pretty() {
        for (i, (input, outcome)) in args.targets.iter().zip(&outcomes).enumerate() {
            if i > 0 {
                println!();
            }
            match outcome {
                Ok(result) => print_result_pretty(result, &ctx),
                Err(e) => print_error_pretty(input, e),
            }
        }
    } else {
        let mut documents = outcomes
            .iter()
            .map(|outcome| match outcome {
                Ok(result) => serde_json::to_value(result),
                Err(e) => serde_json::to_value(ErrorBody::from(e)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if documents.len() == 1 {
            ctx.output_format.print(&documents.remove(0))?;
        } else {
            ctx.output_format.print(&documents)?;
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} lookups failed", outcomes.len());
    }

    Ok(())
}

/// Configured settings with command-line overrides on top.
fn lookup_config(ctx: &Context, args: &LookupArgs) -> Result<LookupConfig> {
    let mut config = ctx.config.lookup_config()?;

    if let Some(ports) = &args.ports {
        config = config.ports(ports.clone());
    }
    if let Some(ms) = args.port_timeout {
        config = config.port_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = args.http_timeout {
        config = config.http_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = args.geo_timeout {
        config = config.geo_timeout(Duration::from_millis(ms));
    }

    Ok(config)
}

async fn run_all(
    engine: Option<&LookupEngine>,
    targets: &[String],
) -> Vec<nexus::Result<LookupResult>> {
    match engine {
        Some(engine) => join_all(targets.iter().map(|t| engine.lookup(t))).await,
        // Every target failed classification
        None => targets.iter().filter_map(|t| classify(t).err()).map(Err).collect(),
    }
}

fn print_error_pretty(input: &str, err: &NexusError) {
    let body = ErrorBody::from(err);
    let label = if input.trim().is_empty() { "(empty)" } else { input };

    match body.details {
        Some(details) => eprintln!(
            "{} {}: {} ({})",
            "Error:".red().bold(),
            label,
            body.error,
            details.dimmed()
        ),
        None => eprintln!("{} {}: {}", "Error:".red().bold(), label, body.error),
    }
}

fn print_result_pretty(result: &LookupResult, ctx: &Context) {
    // Header
    let mut header = format!("{}", result.input_type);
    if let Some(protocol) = &result.protocol {
        header = format!("{header}, {protocol}");
    }
    println!(
        "{} {} {}",
        "Target:".bold(),
        result.original_input.cyan().bold(),
        format!("({header})").dimmed()
    );
    println!();

    println!("  {} {}", "IP:".bold(), result.ip.to_string().cyan());
    if result.ip_addresses.len() > 1 {
        let others: Vec<String> = result.ip_addresses[1..].iter().map(ToString::to_string).collect();
        println!("  {} {}", "Also:".bold(), others.join(", "));
    }
    if let Some(hostname) = &result.hostname {
        println!("  {} {}", "Hostname:".bold(), hostname);
    }
    if let Some(names) = &result.reverse_hostnames {
        if ctx.verbose > 0 || result.hostname.as_ref() != names.first() {
            println!("  {} {}", "Reverse DNS:".bold(), names.join(", "));
        }
    }

    // Location
    println!();
    println!("{}", "Geolocation:".bold().underline());
    match &result.geo {
        Some(geo) => {
            let location = [geo.city.as_deref(), geo.country.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            if !location.is_empty() {
                let code = geo.country_code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default();
                println!("  {} {location}{code}", "Location:".bold());
            }
            if let Some(isp) = &geo.isp {
                println!("  {} {}", "ISP:".bold(), isp);
            }
            if let Some(org) = &geo.org {
                println!("  {} {}", "Organization:".bold(), org);
            }
            if let Some(asn) = &geo.asn {
                println!("  {} {}", "ASN:".bold(), asn);
            }
            if let Some((lat, lon)) = geo.coordinates() {
                println!("  {} {lat:.4}, {lon:.4}", "Coordinates:".bold());
            }
            if let Some(tz) = &geo.timezone {
                println!("  {} {}", "Timezone:".bold(), tz);
            }
        }
        None => println!("  {}", "unavailable".dimmed()),
    }

    // HTTP fingerprint
    if let Some(http) = &result.http {
        println!();
        println!("{}", "HTTP:".bold().underline());
        match http {
            HttpFingerprint::Reachable(h) => {
                let status = format!("{} {}", h.status, h.status_text);
                let status = if h.status < 400 { status.green() } else { status.yellow() };
                println!("  {} {}", "Status:".bold(), status);
                println!("  {} {}", "Server:".bold(), h.server);
                println!("  {} {}", "Powered-By:".bold(), h.powered_by);
                if let Some(ct) = &h.content_type {
                    println!("  {} {}", "Content-Type:".bold(), ct);
                }
                let hsts = if h.hsts { "yes".green() } else { "no".yellow() };
                println!("  {} {}", "HSTS:".bold(), hsts);
                if let Some(xfo) = &h.x_frame_options {
                    println!("  {} {}", "X-Frame-Options:".bold(), xfo);
                }
            }
            HttpFingerprint::Unreachable { error } => {
                println!("  {}", error.red());
            }
        }
    }

    // DNS records
    if !result.dns.is_empty() {
        println!();
        println!("{}", "DNS Records:".bold().underline());
        for mx in &result.dns.mx {
            println!("  {:4} {:>5} {}", "MX".yellow(), mx.priority, mx.exchange);
        }
        for ns in &result.dns.ns {
            println!("  {:4} {}", "NS".yellow(), ns);
        }
        if ctx.verbose > 0 {
            for record in &result.dns.txt_records {
                println!("  {:4} {}", "TXT".yellow(), record.join(""));
            }
        } else {
            for txt in &result.dns.txt {
                println!("  {:4} {}", "TXT".yellow(), txt);
            }
        }
    }

    // Ports table
    println!();
    if result.open_ports.is_empty() {
        println!(
            "{} {}",
            "Open Ports:".bold(),
            format!("none of {} scanned", result.scanned_ports.len()).dimmed()
        );
    } else {
        println!("{}", "Open Ports:".bold().underline());
        let rows: Vec<PortRow> = result
            .open_ports
            .iter()
            .map(|p| PortRow {
                port: p.port,
                service: p.service.clone(),
            })
            .collect();
        println!("{}", ctx.style_table(&mut Table::new(&rows)));
    }

    println!();
    println!(
        "{}",
        format!("Looked up at {}", result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
    );
}
