//! `nexus dns` - Forward, reverse and record queries.

use anyhow::Result;
use colored::Colorize;
use futures_util::future::join_all;
use nexus::recon::classify::parse_dotted_quad;
use nexus::recon::{dns, DnsBackend, DnsResolver};
use serde::Serialize;
use std::collections::BTreeMap;

use super::Context;
use crate::cli::args::{DnsArgs, DnsCommands};

pub async fn execute(ctx: Context, args: DnsArgs) -> Result<()> {
    let resolver = DnsResolver::new()?;

    match args.command {
        DnsCommands::Resolve { hostnames } => resolve_hostnames(&ctx, &resolver, &hostnames).await,
        DnsCommands::Reverse { ips } => reverse_lookup(&ctx, &resolver, &ips).await,
        DnsCommands::Records { domain } => records(&ctx, &resolver, domain.trim()).await,
    }
}

/// Flatten comma-separated values
fn split_args(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Per-name answer; errors are reported inline rather than aborting the batch.
#[derive(Serialize)]
#[serde(untagged)]
enum Answer<T> {
    Found(T),
    Failed { error: String },
}

async fn resolve_hostnames(ctx: &Context, resolver: &DnsResolver, hostnames: &[String]) -> Result<()> {
    let hosts = split_args(hostnames);
    let answers = join_all(hosts.iter().map(|h| resolver.lookup_ipv4(h))).await;

    let results: BTreeMap<&str, Answer<Vec<String>>> = hosts
        .iter()
        .zip(answers)
        .map(|(&host, answer)| {
            let answer = match answer {
                Ok(ips) => Answer::Found(ips.iter().map(ToString::to_string).collect()),
                Err(e) => Answer::Failed { error: e.to_string() },
            };
            (host, answer)
        })
        .collect();

    if !ctx.output_format.is_pretty() {
        return ctx.output_format.print(&results);
    }

    println!("{}", "Resolved Hostnames:".bold().underline());
    for (host, answer) in &results {
        match answer {
            Answer::Found(ips) => println!("  {} -> {}", host, ips.join(", ").cyan()),
            Answer::Failed { error } => println!("  {} -> {}", host, error.red()),
        }
    }

    Ok(())
}

async fn reverse_lookup(ctx: &Context, resolver: &DnsResolver, ips: &[String]) -> Result<()> {
    let mut addresses = Vec::new();
    for ip in split_args(ips) {
        let addr = parse_dotted_quad(ip).ok_or_else(|| anyhow::anyhow!("Not an IPv4 address: {ip}"))?;
        addresses.push(addr);
    }

    let answers = join_all(addresses.iter().map(|&ip| resolver.reverse(ip))).await;

    let results: BTreeMap<String, Answer<Vec<String>>> = addresses
        .iter()
        .zip(answers)
        .map(|(ip, answer)| {
            let answer = match answer {
                Ok(names) => Answer::Found(names),
                Err(e) => Answer::Failed { error: e.to_string() },
            };
            (ip.to_string(), answer)
        })
        .collect();

    if !ctx.output_format.is_pretty() {
        return ctx.output_format.print(&results);
    }

    println!("{}", "Reverse DNS:".bold().underline());
    for (ip, answer) in &results {
        match answer {
            Answer::Found(names) => println!("  {} -> {}", ip.cyan(), names.join(", ")),
            Answer::Failed { error } => println!("  {} -> {}", ip.cyan(), error.red()),
        }
    }

    Ok(())
}

async fn records(ctx: &Context, resolver: &DnsResolver, domain: &str) -> Result<()> {
    let set = dns::lookup_records(resolver, domain).await;

    if !ctx.output_format.is_pretty() {
        return ctx.output_format.print(&set);
    }

    println!("{} {}", "Domain:".bold(), domain.cyan());
    println!();

    if set.is_empty() {
        println!("  {}", "No MX, TXT or NS records found.".yellow());
        return Ok(());
    }

    for mx in &set.mx {
        println!("  {:4} {:>5} {}", "MX".yellow(), mx.priority, mx.exchange);
    }
    for ns in &set.ns {
        println!("  {:4} {}", "NS".yellow(), ns);
    }
    for txt in &set.txt {
        println!("  {:4} {}", "TXT".yellow(), txt);
    }

    Ok(())
}
