//! `webapis` entry point
//!
//! One subcommand per job. Logs go to stderr; the job report is printed to
//! stdout as JSON.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "webapis", version)]
#[command(about = "Route53, Google Analytics, Search Console, Tag Manager and Monitis jobs")]
struct Cli {
    /// JSON settings file overriding endpoints and limits
    #[arg(long, global = true, env = "WEBAPIS_SETTINGS")]
    settings: Option<PathBuf>,

    /// Log filter, e.g. `info` or `webapis_core=debug`
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Back up every Route53 hosted zone as a CloudFormation template
    Route53Backup {
        /// AWS credentials file; the AWS_* environment variables are used without one
        #[arg(long)]
        credentials: Option<PathBuf>,
        /// Directory receiving one `<zone>yml` file per zone
        #[arg(long)]
        output: PathBuf,
        /// Keep the zone's SOA and NS record sets
        #[arg(long)]
        with_soa: bool,
        /// Reference the zone by id rather than by name
        #[arg(long)]
        zone_id_reference: bool,
    },

    /// Dump every Google Analytics web property to a CSV file
    AnalyticsDump {
        #[arg(long)]
        credentials: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },

    /// Add the property list's sites to Google Search Console
    SearchConsoleAdd {
        #[arg(long)]
        credentials: PathBuf,
        #[arg(long)]
        input: PathBuf,
    },

    /// Create one Tag Manager container per domain of the property list
    TagManagerAdd {
        #[arg(long)]
        credentials: PathBuf,
        #[arg(long)]
        input: PathBuf,
    },

    /// Dump every Tag Manager container to a CSV file
    TagManagerContainers {
        #[arg(long)]
        credentials: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },

    /// Create one Monitis RUM monitor per domain of the property list
    MonitisAdd {
        #[arg(long)]
        credentials: PathBuf,
        #[arg(long)]
        input: PathBuf,
    },

    /// Dump every Monitis RUM monitor to a CSV file
    MonitisDump {
        #[arg(long)]
        credentials: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(commands::run(cli.settings.as_deref(), cli.command)) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "webapis",
            "route53-backup",
            "--output",
            "backups",
            "--with-soa",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(
            cli.command,
            Command::Route53Backup { credentials: None, with_soa: true, zone_id_reference: false, .. }
        ));
    }

    #[test]
    fn credentials_are_required_for_google_jobs() {
        assert!(Cli::try_parse_from(["webapis", "analytics-dump", "--output", "p.csv"]).is_err());
    }

    #[test]
    fn settings_flag_is_global() {
        let cli = Cli::try_parse_from([
            "webapis",
            "monitis-dump",
            "--credentials",
            "monitis.json",
            "--output",
            "monitors.csv",
            "--settings",
            "settings.json",
        ])
        .unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("settings.json")));
    }
}
