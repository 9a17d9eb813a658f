//! `nexus config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;

pub fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Reset => reset_config(),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    if !ctx.output_format.is_pretty() {
        return ctx.output_format.print(config);
    }

    let unset = || "(default)".dimmed().to_string();
    let show = |value: Option<String>| value.unwrap_or_else(unset);

    println!("{}", "Current Configuration:".bold());
    println!();
    println!(
        "  {} {}",
        "output_format:".bold(),
        show(config.output_format.map(|f| f.to_string()))
    );
    println!(
        "  {} {}",
        "port_timeout_ms:".bold(),
        show(config.port_timeout_ms.map(|ms| ms.to_string()))
    );
    println!(
        "  {} {}",
        "http_timeout_ms:".bold(),
        show(config.http_timeout_ms.map(|ms| ms.to_string()))
    );
    println!(
        "  {} {}",
        "geo_timeout_ms:".bold(),
        show(config.geo_timeout_ms.map(|ms| ms.to_string()))
    );
    println!("  {} {}", "geo_base_url:".bold(), show(config.geo_base_url.clone()));
    println!("  {} {}", "ports:".bold(), show(config.ports.clone()));

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}

fn reset_config() -> Result<()> {
    Config::default().save()?;
    println!("{} Configuration reset to defaults.", "Success:".green().bold());
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
