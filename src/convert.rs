//! Picks what runs for each conversion direction, and where it reads and writes.
//!
//! ```
//! use std::path::{Path, PathBuf};
//! use lastxt::{convert::DirectionAdapter, field::Direction};
//!
//! let adapter = DirectionAdapter::new(Direction::TextToLas);
//! assert_eq!(PathBuf::from("lidar.las"), adapter.output_path(Path::new("lidar.txt.gz")));
//! ```

use crate::{
    ConversionPipeline, Error, FileSink, Result, Sink, StreamSink,
    field::Direction,
    pipeline::{self, Summary},
    text,
};
use log::debug;
use std::{
    ffi::OsStr,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

/// One end of a conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// A file.
    Path(PathBuf),
    /// Standard input or standard output.
    Pipe,
}

/// Where a conversion reads from and writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    /// The input.
    pub input: Endpoint,
    /// The output.
    pub output: Endpoint,
}

/// What a conversion did.
#[derive(Clone, Debug, PartialEq)]
pub enum Report {
    /// Text was converted to las.
    TextToLas(Summary),
    /// Las was converted to text, this many points.
    LasToText(u64),
}

/// Runs the pieces of one conversion direction in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionAdapter {
    direction: Direction,
}

impl DirectionAdapter {
    /// Creates an adapter for this direction.
    pub fn new(direction: Direction) -> DirectionAdapter {
        DirectionAdapter { direction }
    }

    /// Returns the direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The extension of the files this direction writes.
    pub fn extension(&self) -> &'static str {
        match self.direction {
            Direction::TextToLas => "las",
            Direction::LasToText => "txt",
        }
    }

    /// Derives an output path from an input path.
    ///
    /// A `.gz` suffix is dropped, then the extension is replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use lastxt::{convert::DirectionAdapter, field::Direction};
    ///
    /// let adapter = DirectionAdapter::new(Direction::LasToText);
    /// assert_eq!(PathBuf::from("a/b.txt"), adapter.output_path(Path::new("a/b.las")));
    /// assert_eq!(PathBuf::from("points.txt"), adapter.output_path(Path::new("points")));
    /// ```
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let mut path = input.to_path_buf();
        if path.extension() == Some(OsStr::new("gz")) {
            let _ = path.set_extension("");
        }
        let _ = path.set_extension(self.extension());
        path
    }

    /// Resolves the input and output of a conversion.
    ///
    /// A missing input is standard input. A missing output is standard output when
    /// `pipe_output` is set, or else derived from the input path. Text to las cannot read and
    /// write pipes at once, because writing to a pipe needs two passes over the input.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{convert::DirectionAdapter, field::Direction};
    ///
    /// let adapter = DirectionAdapter::new(Direction::TextToLas);
    /// assert!(adapter.plan(None, None, true).is_err());
    /// assert!(adapter.plan(Some("in.txt".into()), None, true).is_ok());
    /// ```
    pub fn plan(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        pipe_output: bool,
    ) -> Result<Plan> {
        let output = match (output, &input) {
            (Some(path), _) => Endpoint::Path(path),
            (None, _) if pipe_output => Endpoint::Pipe,
            (None, Some(path)) => Endpoint::Path(self.output_path(path)),
            (None, None) => Endpoint::Pipe,
        };
        let input = input.map(Endpoint::Path).unwrap_or(Endpoint::Pipe);
        if self.direction == Direction::TextToLas
            && input == Endpoint::Pipe
            && output == Endpoint::Pipe
        {
            return Err(Error::BothPipes);
        }
        debug!("{:?} plan: {:?} -> {:?}", self.direction, input, output);
        Ok(Plan { input, output })
    }

    /// Converts text into las.
    ///
    /// A file output is patched in place after a single pass. A piped output gets its header
    /// from a first pass over the input file.
    pub fn text_to_las(
        &self,
        plan: &Plan,
        options: pipeline::Options,
        verbose: bool,
    ) -> Result<Report> {
        let mut pipeline = ConversionPipeline::new(options)?;
        let mut sink: Box<dyn Sink> = match &plan.output {
            Endpoint::Path(path) => Box::new(FileSink::new(path)),
            Endpoint::Pipe => Box::new(StreamSink::new(BufWriter::new(io::stdout().lock()))),
        };
        let mut opened = 0;
        let summary = pipeline.run(
            || {
                opened += 1;
                open_text(&plan.input, opened)
            },
            sink.as_mut(),
        )?;
        if verbose {
            summary.stats.log();
        }
        Ok(Report::TextToLas(summary))
    }

    /// Converts las into text.
    pub fn las_to_text(&self, plan: &Plan, options: &text::Options, verbose: bool) -> Result<Report> {
        let read: Box<dyn Read> = match &plan.input {
            Endpoint::Path(path) => Box::new(BufReader::new(open(path)?)),
            Endpoint::Pipe => Box::new(io::stdin().lock()),
        };
        let write: Box<dyn Write> = match &plan.output {
            Endpoint::Path(path) => Box::new(BufWriter::new(File::create(path).map_err(
                |source| Error::Open {
                    path: path.clone(),
                    source,
                },
            )?)),
            Endpoint::Pipe => Box::new(BufWriter::new(io::stdout().lock())),
        };
        text::convert(read, write, options, verbose).map(Report::LasToText)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn open_text(input: &Endpoint, opened: u32) -> io::Result<Box<dyn BufRead>> {
    match input {
        Endpoint::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        Endpoint::Pipe if opened == 1 => Ok(Box::new(io::stdin().lock())),
        Endpoint::Pipe => Err(io::Error::other("standard input cannot be read twice")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        let adapter = DirectionAdapter::new(Direction::TextToLas);
        assert_eq!(
            PathBuf::from("lidar.las"),
            adapter.output_path(Path::new("lidar.txt"))
        );
        assert_eq!(
            PathBuf::from("lidar.las"),
            adapter.output_path(Path::new("lidar.gz"))
        );
    }

    #[test]
    fn plans() {
        let adapter = DirectionAdapter::new(Direction::TextToLas);
        let plan = adapter.plan(Some("in.txt".into()), None, false).unwrap();
        assert_eq!(Endpoint::Path("in.las".into()), plan.output);
        let plan = adapter.plan(None, Some("out.las".into()), false).unwrap();
        assert_eq!(Endpoint::Pipe, plan.input);
        assert!(matches!(
            adapter.plan(None, None, false),
            Err(Error::BothPipes)
        ));

        let adapter = DirectionAdapter::new(Direction::LasToText);
        let plan = adapter.plan(None, None, false).unwrap();
        assert_eq!(Endpoint::Pipe, plan.input);
        assert_eq!(Endpoint::Pipe, plan.output);
    }

    #[test]
    fn failed_conversion_keeps_the_old_output() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("points.txt");
        let las = dir.path().join("points.las");
        std::fs::write(&txt, "a b c\n1 2\n").unwrap();
        std::fs::write(&las, "previous contents").unwrap();

        let adapter = DirectionAdapter::new(Direction::TextToLas);
        let plan = adapter.plan(Some(txt), None, false).unwrap();
        assert!(matches!(
            adapter.text_to_las(&plan, pipeline::Options::default(), false),
            Err(Error::NoPointsParsed(_))
        ));
        assert_eq!("previous contents", std::fs::read_to_string(&las).unwrap());

        let options = pipeline::Options {
            generating_software: Some("g".repeat(40)),
            ..Default::default()
        };
        assert!(matches!(
            adapter.text_to_las(&plan, options, false),
            Err(Error::TooLong(_, 32))
        ));
        assert_eq!("previous contents", std::fs::read_to_string(&las).unwrap());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("points.txt");
        std::fs::write(&txt, "1 2 3 1\n4 5 6 2\n").unwrap();

        let adapter = DirectionAdapter::new(Direction::TextToLas);
        let plan = adapter.plan(Some(txt.clone()), None, false).unwrap();
        let options = pipeline::Options {
            parse: "xyzr".to_string(),
            ..Default::default()
        };
        match adapter.text_to_las(&plan, options, false).unwrap() {
            Report::TextToLas(summary) => assert_eq!(2, summary.points_written),
            report => panic!("unexpected report: {:?}", report),
        }

        let adapter = DirectionAdapter::new(Direction::LasToText);
        let out = dir.path().join("copy.txt");
        let plan = adapter
            .plan(Some(dir.path().join("points.las")), Some(out.clone()), false)
            .unwrap();
        let options = text::Options {
            parse: "xyzr".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Report::LasToText(2),
            adapter.las_to_text(&plan, &options, false).unwrap()
        );
        assert_eq!("1 2 3 1\n4 5 6 2\n", std::fs::read_to_string(out).unwrap());
    }
}
