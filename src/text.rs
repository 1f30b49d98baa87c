//! Formats las points as delimited text lines.
//!
//! ```
//! use lastxt::{Point, text::{Options, TextWriter}};
//!
//! let options = Options { parse: "xyzi".to_string(), ..Default::default() };
//! let mut writer = TextWriter::new(Vec::new(), &options);
//! writer.write_point(&Point { x: 1.5, y: 2., z: -0.25, intensity: 7, ..Default::default() }).unwrap();
//! assert_eq!("1.5 2 -0.25 7\n", String::from_utf8(writer.into_inner()).unwrap());
//! ```

use crate::{
    Error, Point, Reader, Result,
    canonical::{format_xyz, push_f64},
    field::{Direction, FieldCode, ParseSpec},
    pipeline::DEFAULT_PARSE,
    point::Format,
    raw,
    utils::AsLasStr,
};
use log::{info, warn};
use std::{
    fmt::Write as _,
    io::{Read, Write},
    str::FromStr,
};
use uuid::Uuid;

/// The character between two fields of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Separator {
    #[default]
    Space,
    Tab,
    Comma,
    Colon,
    Semicolon,
    Hyphen,
    Dot,
}

/// The character that starts every line of a header dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CommentSymbol {
    Pound,
    Percent,
    Dollar,
    Semicolon,
    Comma,
    Star,
    Colon,
}

impl Separator {
    /// The separator character.
    pub fn as_char(self) -> char {
        match self {
            Separator::Space => ' ',
            Separator::Tab => '\t',
            Separator::Comma => ',',
            Separator::Colon => ':',
            Separator::Semicolon => ';',
            Separator::Hyphen => '-',
            Separator::Dot => '.',
        }
    }
}

impl FromStr for Separator {
    type Err = Error;

    /// Parses a separator name.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::text::Separator;
    /// assert_eq!(Separator::Comma, "komma".parse().unwrap());
    /// assert_eq!(Separator::Semicolon, "scolon".parse().unwrap());
    /// assert!("pipe".parse::<Separator>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Separator> {
        match s {
            "space" => Ok(Separator::Space),
            "tab" => Ok(Separator::Tab),
            "comma" | "komma" => Ok(Separator::Comma),
            "colon" => Ok(Separator::Colon),
            "semicolon" | "scolon" => Ok(Separator::Semicolon),
            "hyphen" | "minus" => Ok(Separator::Hyphen),
            "dot" | "period" => Ok(Separator::Dot),
            _ => Err(Error::InvalidSeparator(s.to_string())),
        }
    }
}

impl CommentSymbol {
    /// The comment character.
    pub fn as_char(self) -> char {
        match self {
            CommentSymbol::Pound => '#',
            CommentSymbol::Percent => '%',
            CommentSymbol::Dollar => '$',
            CommentSymbol::Semicolon => ';',
            CommentSymbol::Comma => ',',
            CommentSymbol::Star => '*',
            CommentSymbol::Colon => ':',
        }
    }
}

impl FromStr for CommentSymbol {
    type Err = Error;

    /// Parses a comment symbol name.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::text::CommentSymbol;
    /// assert_eq!('#', "hash".parse::<CommentSymbol>().unwrap().as_char());
    /// assert!("tilde".parse::<CommentSymbol>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<CommentSymbol> {
        match s {
            "pound" | "hash" => Ok(CommentSymbol::Pound),
            "percent" => Ok(CommentSymbol::Percent),
            "dollar" => Ok(CommentSymbol::Dollar),
            "semicolon" | "scolon" => Ok(CommentSymbol::Semicolon),
            "comma" | "komma" => Ok(CommentSymbol::Comma),
            "star" => Ok(CommentSymbol::Star),
            "colon" => Ok(CommentSymbol::Colon),
            _ => Err(Error::InvalidCommentSymbol(s.to_string())),
        }
    }
}

/// Las to text configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// The field grammar of every line.
    pub parse: String,

    /// The character between fields.
    pub separator: Separator,

    /// If set, the header is written before the points, one comment line per field.
    pub header_comment: Option<CommentSymbol>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            parse: DEFAULT_PARSE.to_string(),
            separator: Separator::default(),
            header_comment: None,
        }
    }
}

/// Writes points as lines of text.
#[derive(Debug)]
pub struct TextWriter<W: Write> {
    write: W,
    spec: ParseSpec,
    separator: char,
    line: String,
}

impl<W: Write> TextWriter<W> {
    /// Creates a new text writer.
    pub fn new(write: W, options: &Options) -> TextWriter<W> {
        TextWriter {
            write,
            spec: ParseSpec::compile(&options.parse, Direction::LasToText),
            separator: options.separator.as_char(),
            line: String::new(),
        }
    }

    /// Returns the compiled grammar.
    pub fn spec(&self) -> &ParseSpec {
        &self.spec
    }

    /// Writes the header as comment lines.
    pub fn write_header(&mut self, header: &raw::Header, symbol: CommentSymbol) -> Result<()> {
        for line in header_lines(header)? {
            writeln!(self.write, "{} {}", symbol.as_char(), line)?;
        }
        Ok(())
    }

    /// Writes one point as one line.
    ///
    /// Every slot of the grammar is followed by the separator, except the last, which is followed
    /// by a newline. Empty slots print nothing.
    pub fn write_point(&mut self, point: &Point) -> Result<()> {
        self.line.clear();
        let slots = self.spec.slots();
        for (index, slot) in slots.iter().enumerate() {
            if let Some(field) = slot {
                push_field(&mut self.line, point, *field, index);
            }
            if index + 1 < slots.len() {
                self.line.push(self.separator);
            }
        }
        self.line.push('\n');
        self.write.write_all(self.line.as_bytes())?;
        Ok(())
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

fn push_field(line: &mut String, point: &Point, field: FieldCode, index: usize) {
    let integer = match field {
        FieldCode::X => return push_f64(line, point.x),
        FieldCode::Y => return push_f64(line, point.y),
        FieldCode::Z => return push_f64(line, point.z),
        FieldCode::GpsTime => return push_f64(line, point.gps_time.unwrap_or(0.)),
        FieldCode::Skip => return,
        FieldCode::Intensity => i64::from(point.intensity),
        FieldCode::ScanAngle => i64::from(point.scan_angle_rank),
        FieldCode::ReturnNumber => i64::from(point.return_number),
        FieldCode::NumberOfReturns => i64::from(point.number_of_returns),
        FieldCode::Classification => i64::from(point.classification),
        FieldCode::UserData => i64::from(point.user_data),
        FieldCode::PointSourceId => i64::from(point.point_source_id),
        FieldCode::EdgeOfFlightLine => i64::from(point.edge_of_flight_line),
        FieldCode::ScanDirection => i64::from(point.scan_direction),
        FieldCode::Red => i64::from(point.color.red),
        FieldCode::Green => i64::from(point.color.green),
        FieldCode::Blue => i64::from(point.color.blue),
        FieldCode::PointIndex => index as i64,
    };
    let _ = write!(line, "{}", integer);
}

/// Logs a warning for every requested field the point format does not store.
///
/// Those fields are printed as zeros.
pub fn warn_missing_attributes(spec: &ParseSpec, format: Format) {
    for field in spec.fields() {
        if field == FieldCode::GpsTime && !format.has_gps_time {
            warn!("requested '{}' but points do not have gps time", field);
        } else if field.is_color() && !format.has_color {
            warn!("requested '{}' but points do not have rgb", field);
        }
    }
}

/// Describes every field of a header, one line per field.
pub fn header_lines(header: &raw::Header) -> Result<Vec<String>> {
    let [a, b, c, d, e] = header.number_of_points_by_return;
    Ok(vec![
        format!(
            "file signature:            '{}'",
            header.file_signature[..].as_las_str()?
        ),
        format!("file source ID:            {}", header.file_source_id),
        format!("reserved (global encoding):{}", header.global_encoding),
        format!(
            "project ID GUID:           {}",
            Uuid::from_bytes_le(header.guid).hyphenated()
        ),
        format!("version major.minor:       {}", header.version),
        format!(
            "system_identifier:         '{}'",
            header.system_identifier[..].as_las_str()?
        ),
        format!(
            "generating_software:       '{}'",
            header.generating_software[..].as_las_str()?
        ),
        format!(
            "file creation day/year:    {}/{}",
            header.file_creation_day_of_year, header.file_creation_year
        ),
        format!("header size                {}", header.header_size),
        format!("offset to point data       {}", header.offset_to_point_data),
        format!(
            "number var. length records {}",
            header.number_of_variable_length_records
        ),
        format!("point data format          {}", header.point_data_format_id),
        format!("point data record length   {}", header.point_data_record_length),
        format!("number of point records    {}", header.number_of_point_records),
        format!("number of points by return {} {} {} {} {}", a, b, c, d, e),
        format!(
            "scale factor x y z         {}",
            format_xyz(
                [header.x_scale_factor, header.y_scale_factor, header.z_scale_factor],
                false
            )
        ),
        format!(
            "offset x y z               {}",
            format_xyz([header.x_offset, header.y_offset, header.z_offset], false)
        ),
        format!(
            "min x y z                  {}",
            format_xyz([header.min_x, header.min_y, header.min_z], false)
        ),
        format!(
            "max x y z                  {}",
            format_xyz([header.max_x, header.max_y, header.max_z], false)
        ),
    ])
}

/// Converts las into text, returning the number of points written.
///
/// With `verbose`, the header is also logged.
pub fn convert<R: Read, W: Write>(
    read: R,
    write: W,
    options: &Options,
    verbose: bool,
) -> Result<u64> {
    let mut reader = Reader::new(read)?;
    let mut writer = TextWriter::new(write, options);
    warn_missing_attributes(writer.spec(), reader.header().point_format);
    if verbose {
        for line in header_lines(reader.raw_header())? {
            info!("{}", line);
        }
    }
    if let Some(symbol) = options.header_comment {
        writer.write_header(reader.raw_header(), symbol)?;
    }
    let mut count = 0;
    while let Some(point) = reader.read_point()? {
        writer.write_point(&point)?;
        count += 1;
    }
    writer.into_inner().flush()?;
    info!("converted {} points", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Color;

    fn line(parse: &str, separator: Separator, point: &Point) -> String {
        let options = Options {
            parse: parse.to_string(),
            separator,
            header_comment: None,
        };
        let mut writer = TextWriter::new(Vec::new(), &options);
        writer.write_point(point).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn every_field() {
        let point = Point {
            x: 1.,
            y: 2.5,
            z: -3.125,
            intensity: 10,
            return_number: 2,
            number_of_returns: 3,
            scan_direction: true,
            edge_of_flight_line: false,
            classification: 4,
            scan_angle_rank: -12,
            user_data: 5,
            point_source_id: 6,
            gps_time: Some(1234.5),
            color: Color {
                red: 7,
                green: 8,
                blue: 9,
            },
        };
        assert_eq!(
            "1,2.5,-3.125,1234.5,10,-12,2,3,4,5,6,0,1,7,8,9\n",
            line("xyztiarncupedRGB", Separator::Comma, &point)
        );
    }

    #[test]
    fn point_index_is_the_slot_index() {
        assert_eq!("0\t0\t2\n", line("xyM", Separator::Tab, &Point::default()));
    }

    #[test]
    fn unknown_slots_print_nothing() {
        assert_eq!("0;;0\n", line("xsy", Separator::Semicolon, &Point::default()));
    }

    #[test]
    fn header_dump() {
        let lines = header_lines(&raw::Header::default()).unwrap();
        assert_eq!("file signature:            'LASF'", lines[0]);
        assert_eq!("version major.minor:       1.2", lines[4]);
        assert_eq!("scale factor x y z         0.01 0.01 0.01", lines[15]);
        assert_eq!(19, lines.len());
    }

    #[test]
    fn comment_lines() {
        let options = Options::default();
        let mut writer = TextWriter::new(Vec::new(), &options);
        writer
            .write_header(&raw::Header::default(), CommentSymbol::Percent)
            .unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(text.lines().all(|line| line.starts_with("% ")));
        assert_eq!(19, text.lines().count());
    }
}
