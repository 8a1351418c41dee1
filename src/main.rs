//! `nmrx`: align, validate, and standardize NMR exchange submissions

// Standard Library Imports
use std::{fs, path::PathBuf, process::ExitCode};

// External Crate Imports
use aligner::{AlignedShifts, AlignmentSession, CarbonShift, ProtonShift};
use clap::{Args, Parser, Subcommand};
use log::info;
use miette::{Context, IntoDiagnostic, Result, miette};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "nmrx", version, about = "NMR exchange submission tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remap shift assignments from a curation structure's numbering onto a reference structure's
    Align(AlignArgs),
    /// Check a batch of exchange records against the submission rules
    Validate(IoArgs),
    /// Normalize dates, vocabulary, and precision in a batch of exchange records
    Standardize(IoArgs),
}

#[derive(Args)]
struct AlignArgs {
    /// The curation-side connection table (V2000 molfile)
    #[arg(short, long, value_name = "FILE")]
    curation: PathBuf,
    /// The reference-side connection table (V2000 molfile)
    #[arg(short, long, value_name = "FILE")]
    reference: PathBuf,
    /// Shift lists keyed by curation-side indices: {"c_shifts": [...], "h_shifts": [...]}
    #[arg(short, long, value_name = "FILE")]
    shifts: PathBuf,
    /// Where to write the remapped shift lists (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct IoArgs {
    /// A JSON array of exchange records
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
    /// Where to write the result (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Deserialize)]
struct ShiftLists {
    c_shifts: Option<Vec<CarbonShift>>,
    h_shifts: Option<Vec<ProtonShift>>,
}

#[derive(Serialize)]
struct AlignedLists {
    c_shifts: Vec<CarbonShift>,
    h_shifts: Vec<ProtonShift>,
    dropped: aligner::DroppedShifts,
}

fn main() -> ExitCode {
    env_logger::init();

    let result = match Cli::parse().command {
        Command::Align(args) => align(&args),
        Command::Validate(args) => validate(&args),
        Command::Standardize(args) => standardize(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn align(args: &AlignArgs) -> Result<()> {
    let curation = read(&args.curation)?;
    let reference = read(&args.reference)?;
    let shifts: ShiftLists = serde_json::from_str(&read(&args.shifts)?)
        .into_diagnostic()
        .wrap_err("failed to parse the shift lists")?;

    let session = AlignmentSession::new(&curation, &reference)?;
    let AlignedShifts {
        carbon,
        proton,
        dropped,
    } = session.align(shifts.c_shifts.as_deref(), shifts.h_shifts.as_deref());

    info!(
        "aligned {} 13C and {} 1H entries ({} dropped)",
        carbon.len(),
        proton.len(),
        dropped.count()
    );
    let aligned = AlignedLists {
        c_shifts: carbon,
        h_shifts: proton,
        dropped,
    };
    write(args.output.as_deref(), &serde_json::to_string_pretty(&aligned).into_diagnostic()?)
}

fn validate(args: &IoArgs) -> Result<()> {
    let records: Vec<Value> = serde_json::from_str(&read(&args.input)?)
        .into_diagnostic()
        .wrap_err("failed to parse the record batch")?;

    let reports = vetting::validate(&records);
    for report in &reports {
        println!("{report}");
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(miette!("{failed} of {} records failed validation", reports.len()));
    }
    info!("all {} records passed validation", reports.len());
    Ok(())
}

fn standardize(args: &IoArgs) -> Result<()> {
    let mut records: Vec<Value> = serde_json::from_str(&read(&args.input)?)
        .into_diagnostic()
        .wrap_err("failed to parse the record batch")?;

    let issues = vetting::standardize(&mut records);
    for issue in &issues {
        eprintln!(
            "record {}: {} left as-is: {}",
            issue.record, issue.path, issue.message
        );
    }

    write(args.output.as_deref(), &serde_json::to_string_pretty(&records).into_diagnostic()?)
}

fn read(path: &std::path::Path) -> Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))
}

fn write(path: Option<&std::path::Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, contents)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", path.display())),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}
