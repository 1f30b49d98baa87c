//! Converts las into delimited text.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use lastxt::{
    convert::DirectionAdapter,
    field::Direction,
    pipeline::DEFAULT_PARSE,
    text::{CommentSymbol, Options, Separator},
};
use log::LevelFilter;
use std::{io::Write, path::PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "las2txt",
    about = "Converts a las file into lines of delimited text",
    version
)]
struct Cli {
    /// The input las file. Standard input if missing.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// The output text file. Derived from the input if missing.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Input and output, if not given with -i and -o.
    #[arg(value_name = "FILE", num_args = 0..=2)]
    files: Vec<PathBuf>,

    /// One character per column, e.g. "xyzMi".
    #[arg(long, default_value = DEFAULT_PARSE)]
    parse: String,

    /// The field separator: space, tab, comma, colon, semicolon, hyphen or dot.
    #[arg(long, default_value = "space")]
    sep: Separator,

    /// Print the header first, each line starting with this symbol: pound, percent, dollar,
    /// semicolon, comma, star or colon.
    #[arg(long, value_name = "SYMBOL")]
    header: Option<CommentSymbol>,

    /// Write text to standard output.
    #[arg(long)]
    otxt: bool,

    /// Log the header.
    #[arg(short, long)]
    verbose: bool,
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

    let options = Options {
        parse: cli.parse,
        separator: cli.sep,
        header_comment: cli.header,
    };
    let mut files = cli.files.into_iter();
    let input = cli.input.or_else(|| files.next());
    let output = cli.output.or_else(|| files.next());
    let adapter = DirectionAdapter::new(Direction::LasToText);
    let plan = adapter
        .plan(input, output, cli.otxt)
        .context("Could not decide where to read and write")?;
    let _ = adapter
        .las_to_text(&plan, &options, cli.verbose)
        .with_context(|| format!("Could not convert {:?} into {:?}", plan.input, plan.output))?;
    Ok(())
}
