use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use payroll_core::PayrollEngine;
use payroll_data::{BUILTIN_PROFILES, PayrollProfile};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use payroll_cli::app::{self, Employment, ProfileOptions};
use payroll_cli::report::{CombinedReport, PayslipReport, ProfileListing, SearchReport};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Monthly payroll calculator.
///
/// Computes social contributions, progressive income tax and net pay from a
/// gross salary, or searches for the gross that yields a given net.
#[derive(Debug, Parser)]
#[command(name = "payroll", version)]
struct Cli {
    /// Built-in profile to use.
    #[arg(long, global = true, default_value = "raa")]
    profile: String,

    /// Profile TOML file; takes precedence over `--profile`.
    #[arg(long, global = true)]
    profile_file: Option<PathBuf>,

    /// Bracket table CSV (`upper_annual,rate`) replacing the profile's table.
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Monthly tax credit replacing the profile's credit.
    #[arg(long, global = true)]
    tax_credit: Option<Decimal>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute net pay from a gross salary.
    GrossToNet {
        #[arg(allow_negative_numbers = true)]
        gross: Decimal,
    },

    /// Search for the gross salary that yields a net amount.
    NetToGross {
        #[arg(allow_negative_numbers = true)]
        net: Decimal,

        /// Starting estimate; narrows the search interval around it.
        #[arg(long)]
        guess: Option<Decimal>,
    },

    /// Compute several employments and their combined net.
    ///
    /// Each amount may be prefixed with a built-in profile, e.g. `uni:940.98`.
    Combined {
        #[arg(required = true, allow_negative_numbers = true)]
        employments: Vec<Employment>,
    },

    /// List the built-in profiles.
    Profiles,
}

impl Cli {
    fn profile_options(&self) -> ProfileOptions {
        ProfileOptions {
            profile: self.profile.clone(),
            profile_file: self.profile_file.clone(),
            brackets: self.brackets.clone(),
            tax_credit: self.tax_credit,
        }
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info`, or `debug` with `--verbose`.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli.profile_options();

    match &cli.command {
        Command::GrossToNet { gross } => {
            let profile = options.resolve()?;
            debug!(profile = %profile.name, %gross, "gross to net");
            let engine = PayrollEngine::new(&profile.contributions, &profile.tax);
            print!("{}", PayslipReport(&engine.gross_to_net(*gross)));
        }
        Command::NetToGross { net, guess } => {
            let profile = options.resolve()?;
            debug!(profile = %profile.name, %net, ?guess, "net to gross");
            let engine = PayrollEngine::new(&profile.contributions, &profile.tax);
            print!("{}", SearchReport(&engine.net_to_gross(*net, *guess)));
        }
        Command::Combined { employments } => {
            let results = app::run_combined(&options, employments)?;
            debug!(employments = results.len(), "combined run");
            print!("{}", CombinedReport(&results));
        }
        Command::Profiles => {
            let profiles = BUILTIN_PROFILES
                .iter()
                .map(|name| {
                    PayrollProfile::builtin(name)
                        .with_context(|| format!("loading built-in profile '{name}'"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            print!("{}", ProfileListing(&profiles));
        }
    }

    Ok(())
}
