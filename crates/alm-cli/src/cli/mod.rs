mod commands;

use alm_core::domain::{AlmError, AlmErrorCategory};
use clap::Parser;
use std::any::Any;
use std::path::PathBuf;

pub(crate) const SUCCESS_EXIT_CODE: i32 = AlmErrorCategory::Success.exit_code();

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = std::panic::catch_unwind(|| run(args))
        .unwrap_or_else(|payload| Err(CliError::Compute(panic_error(payload.as_ref()))));

    match outcome {
        Ok(code) => code,
        Err(error) => {
            let compatibility_error = error.as_alm_error();
            eprintln!("{}", compatibility_error.diagnostic_line());
            if let Some(summary_line) = compatibility_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            compatibility_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("alm-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(SUCCESS_EXIT_CODE)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "alm-rs",
    version,
    about = "Spherical-harmonic coefficient tables and angular power spectra"
)]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    /// JSON codec options file (format, precision, header)
    #[arg(long, global = true, value_name = "path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the bounds and per-degree power spectrum of a table
    Info(commands::InfoArgs),
    /// Compute the auto spectrum of a table, or its cross spectrum with another
    Spectrum(commands::SpectrumArgs),
    /// Re-encode a table between text and JSON
    Convert(commands::ConvertArgs),
    /// Smooth a table with a Gaussian beam window
    Filter(commands::FilterArgs),
}

fn dispatch_parsed(cli: Cli) -> Result<i32, CliError> {
    let options = commands::load_options(cli.config.as_deref())?;
    match cli.command {
        CliCommand::Info(args) => commands::run_info_command(args, &options),
        CliCommand::Spectrum(args) => commands::run_spectrum_command(args, &options),
        CliCommand::Convert(args) => commands::run_convert_command(args, &options),
        CliCommand::Filter(args) => commands::run_filter_command(args, &options),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    // A subscriber may already be installed when `run` is called more than
    // once in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Panic payload rendered as an internal error (exit code 5).
fn panic_error(payload: &(dyn Any + Send)) -> AlmError {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    AlmError::internal("INTERNAL.PANIC", format!("unexpected failure: {detail}"))
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(AlmError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    pub(crate) fn compute(error: impl Into<AlmError>) -> Self {
        Self::Compute(error.into())
    }

    fn as_alm_error(&self) -> AlmError {
        match self {
            Self::Usage(message) => AlmError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => AlmError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
