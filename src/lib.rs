//! Convert between delimited text and [ASPRS LAS](https://www.asprs.org/committee-general/laser-las-file-format-exchange-activities.html)
//! point cloud data.
//!
//! # Text to las
//!
//! Every line of text is one point. A parse string names the field in each column, one
//! character per column:
//!
//! | Code | Field | Code | Field |
//! |---|---|---|---|
//! | `x` `y` `z` | coordinates | `u` | user data |
//! | `t` | gps time | `p` | point source id |
//! | `i` | intensity | `e` | edge of flight line |
//! | `a` | scan angle rank | `d` | scan direction |
//! | `r` | return number | `R` `G` `B` | color |
//! | `n` | number of returns | `s` | skip a column (text to las only) |
//! | `c` | classification | `M` | the column index (las to text only) |
//!
//! Run a `ConversionPipeline` into a `Sink`:
//!
//! ```
//! use std::io::Cursor;
//! use lastxt::{ConversionPipeline, SeekableSink, pipeline::Options};
//!
//! let text = "1.0 2.0 3.0 1\n4.0 5.0 6.0 2\n";
//! let options = Options { parse: "xyzr".to_string(), ..Default::default() };
//! let mut pipeline = ConversionPipeline::new(options).unwrap();
//! let mut sink = SeekableSink::new(Cursor::new(Vec::new()));
//! let summary = pipeline.run(|| Ok(Cursor::new(text)), &mut sink).unwrap();
//! assert_eq!(2, summary.header.number_of_points);
//! assert_eq!([1, 1, 0, 0, 0], summary.header.number_of_points_by_return);
//! ```
//!
//! ## Seekable or not
//!
//! A `SeekableSink` gets each point as soon as its line is parsed, and its header is patched
//! once the input is exhausted. A `StreamSink`, like standard output, must receive the final
//! header first, so the pipeline reads the input twice. Lines that cannot be parsed are logged
//! and skipped.
//!
//! # Las to text
//!
//! Read points with a `Reader` and print them with a `TextWriter`:
//!
//! ```
//! use std::io::Cursor;
//! use lastxt::{Reader, Header, Sink, StreamSink, raw, text::{Options, TextWriter}};
//!
//! let mut sink = StreamSink::new(Vec::new());
//! sink.begin(&Header { number_of_points: 1, ..Default::default() }).unwrap();
//! sink.write_point(&raw::Point { x: 150, y: -25, z: 1, ..Default::default() }).unwrap();
//!
//! let mut reader = Reader::new(Cursor::new(sink.into_inner())).unwrap();
//! let mut writer = TextWriter::new(Vec::new(), &Options::default());
//! for point in reader.points() {
//!     writer.write_point(&point.unwrap()).unwrap();
//! }
//! assert_eq!("1.5 -0.25 0.01\n", String::from_utf8(writer.into_inner()).unwrap());
//! ```

#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod canonical;
pub mod convert;
pub mod field;
pub mod header;
pub mod patch;
pub mod pipeline;
pub mod point;
pub mod raw;
pub mod reader;
pub mod sink;
pub mod stats;
pub mod text;
pub mod tokenizer;
pub mod transform;
pub mod utils;
pub mod version;

mod bounds;
mod error;
mod vector;

pub use bounds::Bounds;
pub use error::{Error, LineError};
pub use header::Header;
pub use pipeline::ConversionPipeline;
pub use point::Point;
pub use reader::Reader;
pub use sink::{FileSink, SeekableSink, Sink, StreamSink};
pub use stats::Stats;
pub use transform::Transform;
pub use vector::Vector;
pub use version::Version;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
