use crate::{Transform, Version, field::FieldCode};
use std::{io, path::PathBuf, str};
use thiserror::Error;

/// Crate-specific error enum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Both the input and the output would be pipes.
    #[error("input and output cannot both be pipes")]
    BothPipes,

    /// The patch of an already-written header failed.
    ///
    /// The point records that were written before the patch are left in place.
    #[error("could not patch the header: {0}")]
    HeaderPatch(#[source] io::Error),

    /// The file signature was not "LASF".
    #[error("the file signature is not 'LASF': {0:?}")]
    InvalidFileSignature([u8; 4]),

    /// The header comment symbol name is not recognized.
    #[error("unknown comment symbol: {0}")]
    InvalidCommentSymbol(String),

    /// The point data format is not one of 0, 1, 2 or 3.
    #[error("invalid point format: {0}")]
    InvalidPointFormat(u8),

    /// The point data record length is shorter than the point format demands.
    #[error("point format {format} needs {needed} bytes per record, the header says {actual}")]
    InvalidPointDataRecordLength {
        /// The point format id.
        format: u8,
        /// The minimum length of the format.
        needed: u16,
        /// The length in the header.
        actual: u16,
    },

    /// The field separator name is not recognized.
    #[error("unknown separator: {0}")]
    InvalidSeparator(String),

    /// The version string could not be understood.
    #[error("cannot understand version: {0}")]
    InvalidVersion(String),

    /// The value cannot be quantized into an `i32` with this transform.
    #[error("the transform {1} cannot quantize {0} into an i32")]
    InverseTransform(f64, Transform),

    /// Wrapper around `std::io::Error`.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Wrapper around a per-line parse failure.
    #[error(transparent)]
    Line(#[from] LineError),

    /// Not a single input line could be parsed.
    #[error("could not parse any lines with '{0}'")]
    NoPointsParsed(String),

    /// The input file could not be opened.
    #[error("could not open {path}: {source}")]
    Open {
        /// The path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// This string is too long for its fixed-width header field.
    #[error("'{0}' is longer than {1} bytes")]
    TooLong(String, usize),

    /// There are more points than a version 1.0 to 1.2 header can count.
    #[error("too many points for a las 1.0-1.2 header: {0}")]
    TooManyPoints(u64),

    /// A field code that has no meaning in the requested direction.
    #[error("unknown field code '{0}'")]
    UnknownFieldCode(char),

    /// This version cannot be written.
    #[error("las version {0} is not supported")]
    UnsupportedVersion(Version),

    /// Wrapper around `std::str::Utf8Error`.
    #[error(transparent)]
    Utf8(#[from] str::Utf8Error),
}

/// Errors that reject a single input line.
///
/// These never stop a conversion. The line is skipped and the error is logged.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LineError {
    /// The line ran out of tokens before the grammar did.
    #[error("line ends before field '{0}'")]
    TruncatedLine(FieldCode),

    /// A token could not be scanned as the field's number type.
    #[error("cannot scan '{token}' for field '{field}'")]
    FieldParse {
        /// The field being extracted.
        field: FieldCode,
        /// The offending token.
        token: String,
    },

    /// A coordinate cannot be stored as a quantized i32.
    #[error("{0}")]
    Quantization(String),
}
