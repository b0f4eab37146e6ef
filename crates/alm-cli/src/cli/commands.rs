use super::{CliError, SUCCESS_EXIT_CODE};
use alm_core::common::config::{CodecOptions, load_codec_options};
use alm_core::common::constants::ARCMIN_PER_RADIAN;
use alm_core::domain::AlmError;
use alm_core::harmonics::{ComplexCoefficientSet, auto_spectrum, reduce};
use alm_core::numerics::gaussian_beam_window;
use alm_core::table::{TableFormat, read_table, render_spectrum_text, write_spectrum, write_table};
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub(super) struct InfoArgs {
    /// Coefficient table to inspect
    #[arg(value_name = "table")]
    table: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct SpectrumArgs {
    /// Coefficient table
    #[arg(value_name = "table")]
    table: PathBuf,

    /// Second table for a cross spectrum
    #[arg(long, value_name = "table")]
    cross: Option<PathBuf>,

    /// Write the spectrum here instead of stdout
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct ConvertArgs {
    /// Table to read
    #[arg(value_name = "input")]
    input: PathBuf,

    /// Table to write
    #[arg(value_name = "output")]
    output: PathBuf,

    /// Input format (default: config, then file extension)
    #[arg(long, value_enum)]
    from: Option<FormatArg>,

    /// Output format (default: config, then file extension)
    #[arg(long, value_enum)]
    to: Option<FormatArg>,
}

#[derive(clap::Args)]
pub(super) struct FilterArgs {
    /// Table to smooth
    #[arg(value_name = "table")]
    table: PathBuf,

    /// Beam full width at half maximum in arcminutes
    #[arg(long, value_name = "arcmin")]
    fwhm_arcmin: f64,

    /// Smoothed table
    #[arg(value_name = "output")]
    output: PathBuf,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub(super) enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for TableFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

pub(super) fn load_options(path: Option<&Path>) -> Result<CodecOptions, CliError> {
    match path {
        Some(path) => {
            let options = load_codec_options(path).map_err(CliError::compute)?;
            tracing::debug!(path = %path.display(), ?options, "loaded codec options");
            Ok(options)
        }
        None => Ok(CodecOptions::default()),
    }
}

fn load_table(path: &Path, options: &CodecOptions) -> Result<ComplexCoefficientSet, CliError> {
    let set = read_table(path, options).map_err(CliError::compute)?;
    tracing::info!(
        path = %path.display(),
        max_degree = set.max_degree(),
        max_order = set.max_order(),
        "loaded coefficient table"
    );
    Ok(set)
}

fn check_finite(spectrum: &[f64]) -> Result<(), CliError> {
    match spectrum.iter().position(|value| !value.is_finite()) {
        Some(degree) => Err(CliError::Compute(AlmError::computation(
            "COMPUTE.SPECTRUM_NONFINITE",
            format!("spectrum value at l={degree} is not finite"),
        ))),
        None => Ok(()),
    }
}

pub(super) fn run_info_command(args: InfoArgs, options: &CodecOptions) -> Result<i32, CliError> {
    let set = load_table(&args.table, options)?;

    println!("Table: {}", args.table.display());
    println!("max_degree: {}", set.max_degree());
    println!("max_order: {}", set.max_order());
    println!("coefficients: {}", set.len());

    if set.bounds().is_full_triangle() {
        let spectrum = auto_spectrum(&set).map_err(CliError::compute)?;
        print!("{}", render_spectrum_text(&spectrum, options.precision));
    } else {
        println!("spectrum: unavailable (max_order < max_degree)");
    }
    Ok(SUCCESS_EXIT_CODE)
}

pub(super) fn run_spectrum_command(
    args: SpectrumArgs,
    options: &CodecOptions,
) -> Result<i32, CliError> {
    let left = load_table(&args.table, options)?;
    let spectrum = match &args.cross {
        Some(cross) => {
            let right = load_table(cross, options)?;
            reduce(&left, &right)
        }
        None => auto_spectrum(&left),
    }
    .map_err(CliError::compute)?;
    check_finite(&spectrum)?;

    match &args.output {
        Some(output) => {
            write_spectrum(output, &spectrum, options.precision)
                .with_context(|| format!("failed to write spectrum '{}'", output.display()))?;
            tracing::info!(path = %output.display(), degrees = spectrum.len(), "wrote spectrum");
            println!(
                "Wrote {} spectrum rows to {}",
                spectrum.len(),
                output.display()
            );
        }
        None => print!("{}", render_spectrum_text(&spectrum, options.precision)),
    }
    Ok(SUCCESS_EXIT_CODE)
}

pub(super) fn run_convert_command(
    args: ConvertArgs,
    options: &CodecOptions,
) -> Result<i32, CliError> {
    let input_options = options.with_format(args.from.map(TableFormat::from));
    let output_options = options.with_format(args.to.map(TableFormat::from));

    let set = load_table(&args.input, &input_options)?;
    write_table(&args.output, &set, &output_options).map_err(CliError::compute)?;

    println!(
        "Converted {} coefficients from {} to {}",
        set.len(),
        input_options.format_for(&args.input).as_str(),
        output_options.format_for(&args.output).as_str()
    );
    Ok(SUCCESS_EXIT_CODE)
}

pub(super) fn run_filter_command(args: FilterArgs, options: &CodecOptions) -> Result<i32, CliError> {
    if !args.fwhm_arcmin.is_finite() || args.fwhm_arcmin < 0.0 {
        return Err(CliError::Compute(AlmError::input_validation(
            "INPUT.FILTER_FWHM",
            format!(
                "beam FWHM must be a finite, non-negative number of arcminutes, got {}",
                args.fwhm_arcmin
            ),
        )));
    }

    let mut set = load_table(&args.table, options)?;
    let window = gaussian_beam_window(set.max_degree(), args.fwhm_arcmin / ARCMIN_PER_RADIAN);
    set.apply_degree_filter(&window)
        .map_err(CliError::compute)?;
    write_table(&args.output, &set, options).map_err(CliError::compute)?;

    tracing::info!(
        fwhm_arcmin = args.fwhm_arcmin,
        path = %args.output.display(),
        "wrote smoothed coefficient table"
    );
    println!(
        "Smoothed {} coefficients with a {} arcmin beam into {}",
        set.len(),
        args.fwhm_arcmin,
        args.output.display()
    );
    Ok(SUCCESS_EXIT_CODE)
}
