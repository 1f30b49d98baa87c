//! Field grammars: which value sits in which column of a text line.
//!
//! A grammar is a string with one character per column, e.g. `"tsxyzRGB"` means gps time, a
//! column to skip, the three coordinates and the three color channels.
//!
//! | Code | Field |
//! | ---- | ----- |
//! | `x` `y` `z` | coordinates |
//! | `t` | gps time |
//! | `i` | intensity |
//! | `a` | scan angle rank |
//! | `r` | return number |
//! | `n` | number of returns |
//! | `c` | classification |
//! | `u` | user data |
//! | `p` | point source id |
//! | `e` | edge of flight line flag |
//! | `d` | scan direction flag |
//! | `R` `G` `B` | color channels |
//! | `s` | skip a column (text to las only) |
//! | `M` | the index of this column (las to text only) |
//!
//! Unknown codes are logged and ignored rather than rejected.

use crate::{Error, point::Format};
use log::warn;
use std::fmt;

/// Which way a conversion runs. Some field codes only make sense one way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Parsing text lines into las points.
    TextToLas,
    /// Formatting las points as text lines.
    LasToText,
}

/// One column of a text line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum FieldCode {
    X,
    Y,
    Z,
    GpsTime,
    Intensity,
    ScanAngle,
    ReturnNumber,
    NumberOfReturns,
    Classification,
    UserData,
    PointSourceId,
    EdgeOfFlightLine,
    ScanDirection,
    Red,
    Green,
    Blue,
    Skip,
    PointIndex,
}

const ALPHABET: [(char, FieldCode); 18] = [
    ('x', FieldCode::X),
    ('y', FieldCode::Y),
    ('z', FieldCode::Z),
    ('t', FieldCode::GpsTime),
    ('i', FieldCode::Intensity),
    ('a', FieldCode::ScanAngle),
    ('r', FieldCode::ReturnNumber),
    ('n', FieldCode::NumberOfReturns),
    ('c', FieldCode::Classification),
    ('u', FieldCode::UserData),
    ('p', FieldCode::PointSourceId),
    ('e', FieldCode::EdgeOfFlightLine),
    ('d', FieldCode::ScanDirection),
    ('R', FieldCode::Red),
    ('G', FieldCode::Green),
    ('B', FieldCode::Blue),
    ('s', FieldCode::Skip),
    ('M', FieldCode::PointIndex),
];

impl FieldCode {
    /// Looks up the field code for a grammar character in a direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::field::{Direction, FieldCode};
    /// assert_eq!(FieldCode::X, FieldCode::new('x', Direction::TextToLas).unwrap());
    /// assert!(FieldCode::new('M', Direction::TextToLas).is_err());
    /// assert!(FieldCode::new('s', Direction::LasToText).is_err());
    /// assert!(FieldCode::new('q', Direction::LasToText).is_err());
    /// ```
    pub fn new(c: char, direction: Direction) -> Result<FieldCode, Error> {
        ALPHABET
            .iter()
            .find(|(code, _)| *code == c)
            .map(|&(_, field)| field)
            .filter(|field| field.is_valid_for(direction))
            .ok_or(Error::UnknownFieldCode(c))
    }

    /// The grammar character for this field.
    pub fn as_char(self) -> char {
        ALPHABET
            .iter()
            .find(|(_, field)| *field == self)
            .map(|&(c, _)| c)
            .unwrap_or('?')
    }

    /// Returns true if this field code means something in this direction.
    pub fn is_valid_for(self, direction: Direction) -> bool {
        match self {
            FieldCode::Skip => direction == Direction::TextToLas,
            FieldCode::PointIndex => direction == Direction::LasToText,
            _ => true,
        }
    }

    /// Is this one of the three coordinates or the gps time, which are scanned as floats?
    pub fn is_float(self) -> bool {
        matches!(
            self,
            FieldCode::X | FieldCode::Y | FieldCode::Z | FieldCode::GpsTime
        )
    }

    /// Is this one of the color channels?
    pub fn is_color(self) -> bool {
        matches!(self, FieldCode::Red | FieldCode::Green | FieldCode::Blue)
    }
}

impl fmt::Display for FieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A compiled grammar.
///
/// Each slot holds either a field or nothing, for characters that were not understood. Empty
/// slots consume no text when parsing, and print nothing (but still get a separator) when
/// formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseSpec {
    source: String,
    slots: Vec<Option<FieldCode>>,
}

impl ParseSpec {
    /// Compiles a grammar string.
    ///
    /// Unknown codes are logged with a warning and compiled as empty slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::field::{Direction, FieldCode, ParseSpec};
    /// let spec = ParseSpec::compile("xyzq", Direction::TextToLas);
    /// assert_eq!(4, spec.slots().len());
    /// assert_eq!(None, spec.slots()[3]);
    /// ```
    pub fn compile(source: &str, direction: Direction) -> ParseSpec {
        let slots = source
            .chars()
            .map(|c| match FieldCode::new(c, direction) {
                Ok(field) => Some(field),
                Err(err) => {
                    warn!("{} in parse string '{}', ignoring it", err, source);
                    None
                }
            })
            .collect();
        ParseSpec {
            source: source.to_string(),
            slots,
        }
    }

    /// The reduced grammar used for the statistics-only pass.
    ///
    /// Everything except x, y, z and the return number becomes a skip, and trailing skips are
    /// dropped. Empty slots stay empty so both passes consume the same columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::field::{Direction, ParseSpec};
    /// let spec = ParseSpec::compile("txyzirRGB", Direction::TextToLas);
    /// assert_eq!("sxyzsr", spec.reduced().to_string());
    /// ```
    pub fn reduced(&self) -> ParseSpec {
        let mut slots: Vec<Option<FieldCode>> = self
            .slots
            .iter()
            .map(|slot| match slot {
                Some(
                    field @ (FieldCode::X | FieldCode::Y | FieldCode::Z | FieldCode::ReturnNumber),
                ) => Some(*field),
                Some(_) => Some(FieldCode::Skip),
                None => None,
            })
            .collect();
        while let Some(Some(FieldCode::Skip)) = slots.last() {
            let _ = slots.pop();
        }
        let source = slots
            .iter()
            .zip(self.source.chars())
            .map(|(slot, c)| slot.map(FieldCode::as_char).unwrap_or(c))
            .collect();
        ParseSpec { source, slots }
    }

    /// The slots, in column order.
    pub fn slots(&self) -> &[Option<FieldCode>] {
        &self.slots
    }

    /// The fields, in column order, without the empty slots.
    pub fn fields(&self) -> impl Iterator<Item = FieldCode> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Returns true if the grammar names this field.
    pub fn contains(&self, field: FieldCode) -> bool {
        self.fields().any(|f| f == field)
    }

    /// The point format that can hold every field of this grammar.
    ///
    /// Gps time selects a format with time, any color channel selects a format with color.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::field::{Direction, ParseSpec};
    /// let spec = ParseSpec::compile("txyzR", Direction::TextToLas);
    /// assert_eq!(3, u8::from(spec.point_format()));
    /// assert_eq!(34, spec.point_format().record_length());
    /// ```
    pub fn point_format(&self) -> Format {
        Format::from_fields(
            self.contains(FieldCode::GpsTime),
            self.fields().any(FieldCode::is_color),
        )
    }
}

impl fmt::Display for ParseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
