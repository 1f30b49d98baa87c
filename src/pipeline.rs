//! Converts delimited text lines into las.
//!
//! The pipeline picks its strategy from the sink. A seekable sink gets every point as soon as
//! its line is parsed, and its header is patched at the end. A stream sink needs its header up
//! front, so the input is read twice: once with a reduced grammar to gather statistics, then
//! again to write the points.
//!
//! ```
//! use std::io::Cursor;
//! use lastxt::{ConversionPipeline, StreamSink, pipeline::Options};
//!
//! let text = "1.0 2.0 3.0\n4.0 5.0 6.0\n";
//! let mut pipeline = ConversionPipeline::new(Options::default()).unwrap();
//! let mut sink = StreamSink::new(Vec::new());
//! let summary = pipeline.run(|| Ok(Cursor::new(text)), &mut sink).unwrap();
//! assert_eq!(2, summary.header.number_of_points);
//! assert_eq!(227 + 2 * 20, sink.into_inner().len());
//! ```

use crate::{
    Error, Header, LineError, Point, Result, Sink, Stats, Transform, Vector, Version,
    field::{Direction, ParseSpec},
    raw,
    tokenizer::parse_line,
};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use std::io::{self, BufRead};

/// The grammar used when none is given.
pub const DEFAULT_PARSE: &str = "xyz";

/// Text to las configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// The field grammar of every line.
    pub parse: String,

    /// The scale and offset of each axis.
    pub transforms: Vector<Transform>,

    /// The number of lines to skip at the start of the input, in every pass.
    pub skip_lines: u64,

    /// Overrides the header's system identifier.
    pub system_identifier: Option<String>,

    /// Overrides the header's generating software.
    pub generating_software: Option<String>,

    /// The file creation date. `None` writes zeros.
    pub date: Option<NaiveDate>,

    /// The las version to write.
    pub version: Version,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            parse: DEFAULT_PARSE.to_string(),
            transforms: Vector::splat(Transform::default()),
            skip_lines: 0,
            system_identifier: None,
            generating_software: None,
            date: Some(Utc::now().date_naive()),
            version: Version::default(),
        }
    }
}

/// Where a pipeline is in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing has been read yet.
    Idle,
    /// Reading lines before any output has been produced.
    FirstPassScanning,
    /// Writing points to a seekable sink as they are parsed.
    DirectOutput,
    /// Re-reading the input to write points behind a final header.
    BufferedRewrite,
    /// The run is over.
    Closed,
}

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// The final header.
    pub header: Header,

    /// Statistics over every accepted line.
    pub stats: Stats,

    /// The number of points written to the sink.
    pub points_written: u64,

    /// The number of lines that were skipped because they could not be parsed.
    pub lines_rejected: u64,
}

/// Parses, quantizes, and writes points.
#[derive(Clone, Debug)]
pub struct ConversionPipeline {
    spec: ParseSpec,
    reduced: ParseSpec,
    options: Options,
    state: State,
}

impl ConversionPipeline {
    /// Creates a new pipeline.
    ///
    /// Fails if the header these options describe cannot be written, e.g. for an unsupported
    /// version or a header string over 32 bytes. Unknown field codes are logged and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{ConversionPipeline, Version, pipeline::Options};
    /// let options = Options { version: Version::new(1, 4), ..Default::default() };
    /// assert!(ConversionPipeline::new(options).is_err());
    /// ```
    pub fn new(options: Options) -> Result<ConversionPipeline> {
        let spec = ParseSpec::compile(&options.parse, Direction::TextToLas);
        let reduced = spec.reduced();
        let pipeline = ConversionPipeline {
            spec,
            reduced,
            options,
            state: State::Idle,
        };
        let _ = pipeline.initial_header().into_raw()?;
        Ok(pipeline)
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the compiled grammar.
    pub fn spec(&self) -> &ParseSpec {
        &self.spec
    }

    /// The header as it is before any point is seen.
    pub fn initial_header(&self) -> Header {
        let mut header = Header::default();
        header.set_version(self.options.version);
        header.set_point_format(self.spec.point_format());
        header.transforms = self.options.transforms;
        header.date = self.options.date;
        if let Some(system_identifier) = &self.options.system_identifier {
            header.system_identifier = system_identifier.clone();
        }
        if let Some(generating_software) = &self.options.generating_software {
            header.generating_software = generating_software.clone();
        }
        header
    }

    /// Runs the conversion.
    ///
    /// `open` is called once for a seekable sink and twice for a stream sink, and must return
    /// the same input from its beginning each time.
    pub fn run<F, R, S>(&mut self, open: F, sink: &mut S) -> Result<Summary>
    where
        F: FnMut() -> io::Result<R>,
        R: BufRead,
        S: Sink + ?Sized,
    {
        if self.state != State::Idle {
            self.transition(State::Idle);
        }
        let result = if sink.requires_final_header() {
            self.run_two_pass(open, sink)
        } else {
            self.run_single_pass(open, sink)
        };
        self.transition(State::Closed);
        result
    }

    fn run_single_pass<F, R, S>(&mut self, mut open: F, sink: &mut S) -> Result<Summary>
    where
        F: FnMut() -> io::Result<R>,
        R: BufRead,
        S: Sink + ?Sized,
    {
        let mut header = self.initial_header();
        let mut stats = Stats::default();
        let mut lines_rejected = 0;
        self.transition(State::FirstPassScanning);
        info!("reading with '{}' and writing directly", self.spec);
        let mut lines = Lines::new(open()?, self.options.skip_lines);
        while let Some((number, line)) = lines.next_line()? {
            match parse_and_quantize(&self.spec, &self.options.transforms, line) {
                Ok((point, raw_point)) => {
                    if self.state == State::FirstPassScanning {
                        sink.begin(&header)?;
                        self.transition(State::DirectOutput);
                    }
                    sink.write_point(&raw_point)?;
                    stats.observe(&point);
                }
                Err(err) => {
                    lines_rejected += 1;
                    warn_rejected(number, line, &err);
                }
            }
        }
        if stats.count == 0 {
            return Err(Error::NoPointsParsed(self.spec.to_string()));
        }
        header.set_statistics(&stats)?;
        sink.finish(&header)?;
        info!("converted {} points", stats.count);
        Ok(Summary {
            header,
            points_written: stats.count,
            stats,
            lines_rejected,
        })
    }

    fn run_two_pass<F, R, S>(&mut self, mut open: F, sink: &mut S) -> Result<Summary>
    where
        F: FnMut() -> io::Result<R>,
        R: BufRead,
        S: Sink + ?Sized,
    {
        let mut header = self.initial_header();
        let mut stats = Stats::default();
        let mut lines_rejected = 0;
        self.transition(State::FirstPassScanning);
        info!("first pass over the input with '{}'", self.reduced);
        let mut lines = Lines::new(open()?, self.options.skip_lines);
        while let Some((number, line)) = lines.next_line()? {
            match parse_and_quantize(&self.reduced, &self.options.transforms, line) {
                Ok((point, _)) => stats.observe(&point),
                Err(err) => {
                    lines_rejected += 1;
                    warn_rejected(number, line, &err);
                }
            }
        }
        if stats.count == 0 {
            return Err(Error::NoPointsParsed(self.reduced.to_string()));
        }
        header.set_statistics(&stats)?;

        self.transition(State::BufferedRewrite);
        info!("second pass over the input with '{}'", self.spec);
        sink.begin(&header)?;
        let mut points_written = 0;
        let mut lines = Lines::new(open()?, self.options.skip_lines);
        while let Some((number, line)) = lines.next_line()? {
            match parse_and_quantize(&self.spec, &self.options.transforms, line) {
                Ok((_, raw_point)) => {
                    sink.write_point(&raw_point)?;
                    points_written += 1;
                }
                Err(err) => warn_rejected(number, line, &err),
            }
        }
        if points_written != stats.count {
            warn!(
                "first pass counted {} points, second pass wrote {}. keeping the first pass header",
                stats.count, points_written
            );
        }
        sink.finish(&header)?;
        info!("converted {} points", points_written);
        Ok(Summary {
            header,
            stats,
            points_written,
            lines_rejected,
        })
    }

    fn transition(&mut self, state: State) {
        debug!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

/// Parses one line and quantizes its coordinates.
pub fn parse_and_quantize(
    spec: &ParseSpec,
    transforms: &Vector<Transform>,
    line: &[u8],
) -> std::result::Result<(Point, raw::Point), LineError> {
    let point = parse_line(spec, line)?;
    let raw_point = point
        .into_raw(transforms)
        .map_err(|err| LineError::Quantization(err.to_string()))?;
    Ok((point, raw_point))
}

fn warn_rejected(number: u64, line: &[u8], err: &LineError) {
    warn!(
        "skipping line {} '{}': {}",
        number,
        String::from_utf8_lossy(line),
        err
    );
}

/// Reads lines into one reused buffer, without their terminators.
struct Lines<R: BufRead> {
    read: R,
    buf: Vec<u8>,
    number: u64,
    skip: u64,
}

impl<R: BufRead> Lines<R> {
    fn new(read: R, skip: u64) -> Lines<R> {
        Lines {
            read,
            buf: Vec::new(),
            number: 0,
            skip,
        }
    }

    fn next_line(&mut self) -> io::Result<Option<(u64, &[u8])>> {
        loop {
            self.buf.clear();
            if self.read.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.number += 1;
            if self.number > self.skip {
                break;
            }
        }
        let mut line = &self.buf[..];
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }
        Ok(Some((self.number, line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SeekableSink, StreamSink};
    use std::io::Cursor;

    fn options(parse: &str) -> Options {
        Options {
            parse: parse.to_string(),
            date: NaiveDate::from_yo_opt(2024, 100),
            ..Default::default()
        }
    }

    fn seekable(options: Options, text: &str) -> (Result<Summary>, Vec<u8>) {
        let mut pipeline = ConversionPipeline::new(options).unwrap();
        let mut sink = SeekableSink::new(Cursor::new(Vec::new()));
        let text = text.to_string();
        let summary = pipeline.run(|| Ok(Cursor::new(text.clone())), &mut sink);
        assert_eq!(State::Closed, pipeline.state());
        (summary, sink.into_inner().into_inner())
    }

    fn stream(options: Options, text: &str) -> (Result<Summary>, Vec<u8>) {
        let mut pipeline = ConversionPipeline::new(options).unwrap();
        let mut sink = StreamSink::new(Vec::new());
        let text = text.to_string();
        let summary = pipeline.run(|| Ok(Cursor::new(text.clone())), &mut sink);
        (summary, sink.into_inner())
    }

    #[test]
    fn xyzr_statistics() {
        let text = "1.0 2.0 3.0 1\n4.0 5.0 6.0 2\n-1.0 0.0 0.0 1\n";
        for (summary, _) in [seekable(options("xyzr"), text), stream(options("xyzr"), text)] {
            let summary = summary.unwrap();
            assert_eq!(3, summary.stats.count);
            assert_eq!(Vector { x: -1., y: 0., z: 0. }, summary.stats.bounds.min);
            assert_eq!(Vector { x: 4., y: 5., z: 6. }, summary.stats.bounds.max);
            assert_eq!([2, 1, 0, 0, 0], summary.header.number_of_points_by_return);
        }
    }

    #[test]
    fn truncated_line_is_skipped() {
        let (summary, bytes) = seekable(options("xyz"), "1.0 2.0 3.0\n1.0 2.0\n4 5 6\n");
        let summary = summary.unwrap();
        assert_eq!(2, summary.stats.count);
        assert_eq!(1, summary.lines_rejected);
        assert_eq!(227 + 2 * 20, bytes.len());
    }

    #[test]
    fn strategies_agree() {
        let text = "100.004 -2.5 0.3 2 10\r\n7 8 9 1 20\n\n-0.3 1e3 2 3 30\n";
        let (single, single_bytes) = seekable(options("xyzri"), text);
        let (double, double_bytes) = stream(options("xyzri"), text);
        assert_eq!(single.unwrap().header, double.unwrap().header);
        assert_eq!(single_bytes, double_bytes);
    }

    #[test]
    fn no_points_parsed_writes_nothing() {
        for (summary, bytes) in [
            seekable(options("xyz"), "a b c\n1 2\n"),
            stream(options("xyz"), "a b c\n1 2\n"),
        ] {
            assert!(matches!(summary, Err(Error::NoPointsParsed(_))));
            assert!(bytes.is_empty());
        }
    }

    #[test]
    fn header_is_checked_before_reading() {
        let options = Options {
            generating_software: Some("g".repeat(40)),
            ..options("xyz")
        };
        assert!(matches!(
            ConversionPipeline::new(options),
            Err(Error::TooLong(_, 32))
        ));
    }

    #[test]
    fn skip_lines() {
        let options = Options {
            skip_lines: 2,
            ..options("xyz")
        };
        let (summary, _) = stream(options, "x y z\n0 0 0\n1 1 1\n");
        assert_eq!(1, summary.unwrap().stats.count);
    }

    #[test]
    fn quantization_overflow_rejects_the_line() {
        let (summary, _) = seekable(options("xyz"), "1e12 0 0\n1 2 3\n");
        let summary = summary.unwrap();
        assert_eq!(1, summary.stats.count);
        assert_eq!(1, summary.lines_rejected);
    }

    #[test]
    fn point_format_follows_grammar() {
        let (summary, bytes) = seekable(options("txyzRGB"), "1.5 1 2 3 4 5 6\n");
        assert_eq!(3, summary.unwrap().header.point_format.to_u8());
        assert_eq!(227 + 34, bytes.len());
        assert_eq!(3, bytes[104]);
    }

    #[test]
    fn header_options() {
        let options = Options {
            system_identifier: Some("Airborne One".to_string()),
            generating_software: Some("TerraScan".to_string()),
            version: Version::new(1, 0),
            ..options("xyz")
        };
        let (summary, bytes) = stream(options, "1 2 3\n");
        let header = summary.unwrap().header;
        assert_eq!("TerraScan", header.generating_software);
        assert_eq!(&b"Airborne One\0"[..], &bytes[26..39]);
        assert_eq!(229 + 20, bytes.len());
    }

    #[test]
    fn reduced_pass_divergence_keeps_the_first_header() {
        let (summary, bytes) = stream(options("xyzi"), "1 2 3 4\n5 6 7 bad\n");
        let summary = summary.unwrap();
        assert_eq!(2, summary.header.number_of_points);
        assert_eq!(1, summary.points_written);
        assert_eq!(227 + 20, bytes.len());
    }
}
