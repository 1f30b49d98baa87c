//! Converts delimited text into las.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use env_logger::Builder;
use lastxt::{
    Transform, Vector, Version,
    convert::{DirectionAdapter, Report},
    field::Direction,
    pipeline::{DEFAULT_PARSE, Options},
    transform::DEFAULT_SCALE,
};
use log::{LevelFilter, info};
use std::{io::Write, path::PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "txt2las",
    about = "Converts lines of delimited text into a las file",
    version
)]
struct Cli {
    /// The input text file. Standard input if missing.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// The output las file. Derived from the input if missing.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Input and output, if not given with -i and -o.
    #[arg(value_name = "FILE", num_args = 0..=2)]
    files: Vec<PathBuf>,

    /// One character per column, e.g. "txyzirn".
    #[arg(long, default_value = DEFAULT_PARSE)]
    parse: String,

    /// The scale of all three axes.
    #[arg(long, conflicts_with = "xyz_scale")]
    scale: Option<f64>,

    /// The scale of each axis.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    xyz_scale: Option<Vec<f64>>,

    /// The offset of each axis.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    xyz_offset: Option<Vec<f64>>,

    /// The number of lines to skip at the start of the input.
    #[arg(long, default_value_t = 0)]
    skip: u64,

    /// The file creation day of year and year. Today if missing.
    #[arg(long, num_args = 2, value_names = ["DAY", "YEAR"])]
    file_creation: Option<Vec<u16>>,

    /// The system identifier, at most 32 bytes.
    #[arg(long)]
    system_identifier: Option<String>,

    /// The generating software, at most 32 bytes.
    #[arg(long)]
    generating_software: Option<String>,

    /// The las version to write.
    #[arg(long, value_name = "MAJOR.MINOR", default_value = "1.2")]
    set_version: Version,

    /// Write las to standard output.
    #[arg(long)]
    olas: bool,

    /// Log the header and statistics.
    #[arg(short, long)]
    verbose: bool,
}

fn axes(values: Option<Vec<f64>>, default: f64) -> Vector<f64> {
    match values.as_deref() {
        Some(&[x, y, z]) => Vector { x, y, z },
        _ => Vector::splat(default),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(
            None,
            if cli.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        )
        .init();

    let date = match cli.file_creation.as_deref() {
        Some(&[day, year]) => Some(
            NaiveDate::from_yo_opt(i32::from(year), u32::from(day))
                .ok_or_else(|| anyhow!("day {} of year {} is not a date", day, year))?,
        ),
        _ => Some(Utc::now().date_naive()),
    };
    let scales = axes(cli.xyz_scale, cli.scale.unwrap_or(DEFAULT_SCALE));
    let offsets = axes(cli.xyz_offset, 0.);
    let options = Options {
        parse: cli.parse,
        transforms: scales.zip_with(&offsets, |scale, offset| Transform { scale, offset }),
        skip_lines: cli.skip,
        system_identifier: cli.system_identifier,
        generating_software: cli.generating_software,
        date,
        version: cli.set_version,
    };

    let mut files = cli.files.into_iter();
    let input = cli.input.or_else(|| files.next());
    let output = cli.output.or_else(|| files.next());
    let adapter = DirectionAdapter::new(Direction::TextToLas);
    let plan = adapter
        .plan(input, output, cli.olas)
        .context("Could not decide where to read and write")?;
    let report = adapter
        .text_to_las(&plan, options, cli.verbose)
        .with_context(|| format!("Could not convert {:?} into {:?}", plan.input, plan.output))?;
    if let Report::TextToLas(summary) = report
        && summary.lines_rejected > 0
    {
        info!("skipped {} lines that could not be parsed", summary.lines_rejected);
    }
    Ok(())
}
