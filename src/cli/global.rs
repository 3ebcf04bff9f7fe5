use std::io::IsTerminal;

use clap::{ArgAction, Args, Parser, ValueEnum};
use strum::Display;
use tracing::Level;

use crate::cli::{output::OutputArgs, probe::ProbeArgs};

#[deny(missing_docs)]
#[derive(Parser, Debug)]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Enumerate the effective IAM permissions of an AWS principal using
/// iam:SimulatePrincipalPolicy
pub struct CommandLineArgs {
    /// Probe target and batching options
    #[command(flatten)]
    pub probe_args: ProbeArgs,

    /// Report output options
    #[command(flatten)]
    pub output_args: OutputArgs,

    /// Global arguments
    #[command(flatten)]
    pub global_args: GlobalArgs,
}

impl CommandLineArgs {
    /// Parse command-line arguments.
    ///
    /// Respects `NO_COLOR` and maps `--quiet` into disabling progress bars.
    pub fn parse_args() -> Self {
        Self::normalize(CommandLineArgs::parse())
    }

    pub fn try_parse_args_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        CommandLineArgs::try_parse_from(itr).map(Self::normalize)
    }

    fn normalize(mut args: Self) -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            args.global_args.color = Mode::Never;
        }

        if args.global_args.quiet {
            args.global_args.progress = Mode::Never;
        }

        args
    }
}

/// Top-level global CLI arguments
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Enable verbose output (up to 3 times for more detail)
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error messages and disable progress bars
    #[arg(long, short)]
    pub quiet: bool,

    /// Use colored output
    #[arg(long, value_name = "MODE", default_value_t = Mode::Auto)]
    pub color: Mode,

    /// Show a progress bar while batches are simulated
    #[arg(long, value_name = "MODE", default_value_t = Mode::Auto)]
    pub progress: Mode,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self { verbose: 0, quiet: false, color: Mode::Auto, progress: Mode::Auto }
    }
}

impl GlobalArgs {
    pub fn use_color<T: IsTerminal>(&self, out: T) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => out.is_terminal(),
        }
    }

    pub fn use_progress(&self) -> bool {
        match self.progress {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => std::io::stderr().is_terminal(),
        }
    }

    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::INFO,
                1 => Level::DEBUG,
                _ => Level::TRACE,
            }
        }
    }
}

/// Generic mode with `auto/never/always`.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Default)]
#[strum(serialize_all = "kebab-case")]
pub enum Mode {
    #[default]
    Auto,
    Never,
    Always,
}
