// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::{fs, path::PathBuf, process::ExitCode};
use subnetcalc::{
    ranges_info,
    reports::{self, ErrorReport},
    CalcError, RangeGroup, RangeTable, CLOUDFLARE_RANGES,
};
use tracing::{error, info, warn};
use tracing_subscriber::{filter::Directive, EnvFilter};

/// IP address validation, range classification and subnet arithmetic.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,

    /// Print single-line JSON instead of pretty-printed.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Logging")]
struct LogArgs {
    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Log filter directive (e.g., "subnetcalc=trace").
    #[arg(long = "log.filter", value_name = "DIRECTIVE", global = true)]
    filter: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate an IPv4/IPv6 address or CIDR network.
    Validate { address: String },
    /// Check an IPv4 address or network against RFC1918 and RFC6598.
    CheckPrivate { address: String },
    /// Check an address or network against Cloudflare's ranges.
    CheckCloudflare {
        address: String,
        /// Ranges file, one CIDR per line; missing families fall back to the built-in list.
        #[arg(long, value_name = "PATH")]
        ranges_file: Option<PathBuf>,
    },
    /// IPv4 subnet information with provider reservations.
    Subnet {
        network: String,
        /// Azure, AWS, OCI or Standard (case-insensitive).
        #[arg(short, long, default_value = "Azure")]
        mode: String,
    },
    /// IPv6 subnet information.
    Subnet6 { network: String },
    /// Show the Cloudflare ranges in use.
    Ranges {
        #[arg(long, value_name = "PATH")]
        ranges_file: Option<PathBuf>,
    },
}

/// Split a comma separated filter into parsed directives and error messages
/// for the ones that do not parse.
fn parse_directives(spec: &str) -> (Vec<Directive>, Vec<String>) {
    let mut valid: Vec<Directive> = Vec::new();
    let mut invalid: Vec<String> = Vec::new();
    for directive in spec.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        match directive.parse::<Directive>() {
            Ok(d) => valid.push(d),
            Err(e) => invalid.push(format!("'{directive}': {e}")),
        }
    }
    (valid, invalid)
}

fn init_logging(args: &LogArgs) {
    let mut rejected: Vec<String> = Vec::new();
    let filter: EnvFilter = if args.quiet {
        EnvFilter::new("error")
    } else {
        let base_level: &str = match args.verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        let mut filter: EnvFilter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));
        if let Some(custom) = &args.filter {
            let (valid, invalid) = parse_directives(custom);
            for d in valid {
                filter = filter.add_directive(d);
            }
            rejected = invalid;
        }
        filter
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    for r in rejected {
        warn!("ignoring invalid log filter directive {r}");
    }
}

/// Cloudflare table from a ranges file, or the built-in one.
fn load_cloudflare(path: Option<&PathBuf>) -> Result<RangeTable, String> {
    match path {
        None => Ok(CLOUDFLARE_RANGES.clone()),
        Some(p) => {
            let text: String =
                fs::read_to_string(p).map_err(|e| format!("reading {}: {e}", p.display()))?;
            info!(path = %p.display(), "loading Cloudflare ranges");
            Ok(RangeTable::from_cidr_list(text, RangeGroup::Cloudflare).or_fallback(&CLOUDFLARE_RANGES))
        }
    }
}

fn emit<T: Serialize>(value: &T, compact: bool) -> ExitCode {
    let out = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match out {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("serializing output: {e}");
            ExitCode::FAILURE
        }
    }
}

fn fail(detail: String, compact: bool) -> ExitCode {
    let report = ErrorReport { detail };
    let json = if compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    };
    eprintln!("{}", json.unwrap_or(report.detail));
    ExitCode::from(2)
}

fn report<T: Serialize>(result: Result<T, CalcError>, compact: bool) -> ExitCode {
    match result {
        Ok(value) => emit(&value, compact),
        Err(e) => fail(e.to_string(), compact),
    }
}

fn main() -> ExitCode {
    let cli: Cli = Cli::parse();
    init_logging(&cli.log);
    let compact: bool = cli.compact;

    match cli.cmd {
        Command::Validate { address } => report(reports::validate(&address), compact),
        Command::CheckPrivate { address } => report(reports::check_private(&address), compact),
        Command::CheckCloudflare {
            address,
            ranges_file,
        } => match load_cloudflare(ranges_file.as_ref()) {
            Ok(table) => report(reports::check_cloudflare_with(&address, &table), compact),
            Err(e) => fail(e, compact),
        },
        Command::Subnet { network, mode } => {
            report(reports::subnet_info(&network, Some(&mode)), compact)
        }
        Command::Subnet6 { network } => report(reports::subnet_info_v6(&network), compact),
        Command::Ranges { ranges_file } => match load_cloudflare(ranges_file.as_ref()) {
            Ok(table) => emit(&ranges_info(&table), compact),
            Err(e) => fail(e, compact),
        },
    }
}

/* -------------------------------------------------------------------------- */
