//! Splits text lines into tokens and extracts point fields from them.
//!
//! Tokens are separated by any run of spaces, commas, and tabs. Numbers are scanned from the
//! front of a token and anything after the longest numeric prefix is ignored, so `12.5m` scans
//! as `12.5`.
//!
//! ```
//! use lastxt::field::{Direction, ParseSpec};
//! use lastxt::tokenizer::parse_line;
//!
//! let spec = ParseSpec::compile("xyzi", Direction::TextToLas);
//! let point = parse_line(&spec, b"1.5,2.5\t3.5  42").unwrap();
//! assert_eq!(2.5, point.y);
//! assert_eq!(42, point.intensity);
//! ```

use crate::{
    LineError, Point,
    field::{FieldCode, ParseSpec},
};
use log::warn;
use num_traits::cast;
use std::{fmt::Display, str};

/// Extracts one field from a token into a point.
pub type Extractor = fn(&mut Point, &[u8], FieldCode) -> Result<(), LineError>;

/// Iterates over the separator-delimited tokens of a line.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    rest: &'a [u8],
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over one line, without its line terminator.
    pub fn new(line: &'a [u8]) -> Tokenizer<'a> {
        Tokenizer { rest: line }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let start = self.rest.iter().position(|&b| !is_separator(b))?;
        let rest = &self.rest[start..];
        let end = rest.iter().position(|&b| is_separator(b)).unwrap_or(rest.len());
        self.rest = &rest[end..];
        Some(&rest[..end])
    }
}

fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b',' | b'\t')
}

/// Parses one line into a point.
///
/// The whole line is rejected if any field is missing or cannot be scanned. Fields the grammar
/// does not name stay at their defaults.
pub fn parse_line(spec: &ParseSpec, line: &[u8]) -> Result<Point, LineError> {
    let mut tokens = Tokenizer::new(line);
    let mut point = Point::default();
    for field in spec.fields() {
        let token = tokens.next().ok_or(LineError::TruncatedLine(field))?;
        extractor(field)(&mut point, token, field)?;
    }
    Ok(point)
}

/// Returns the function that extracts this field.
pub fn extractor(field: FieldCode) -> Extractor {
    match field {
        FieldCode::X => |point, token, field| {
            point.x = float(token, field)?;
            Ok(())
        },
        FieldCode::Y => |point, token, field| {
            point.y = float(token, field)?;
            Ok(())
        },
        FieldCode::Z => |point, token, field| {
            point.z = float(token, field)?;
            Ok(())
        },
        FieldCode::GpsTime => |point, token, field| {
            point.gps_time = Some(float(token, field)?);
            Ok(())
        },
        FieldCode::Intensity => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_fits::<u16>(n, "intensity", "unsigned short");
            point.intensity = n as u16;
            Ok(())
        },
        FieldCode::ScanAngle => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_fits::<i8>(n, "scan angle", "char");
            point.scan_angle_rank = n as i8;
            Ok(())
        },
        FieldCode::ReturnNumber => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_in(n, 0..=7, "return number", "three bits");
            point.return_number = (n & 7) as u8;
            Ok(())
        },
        FieldCode::NumberOfReturns => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_in(n, 0..=7, "number of returns", "three bits");
            point.number_of_returns = (n & 7) as u8;
            Ok(())
        },
        FieldCode::Classification => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_fits::<u8>(n, "classification", "unsigned char");
            point.classification = n as u8;
            Ok(())
        },
        FieldCode::UserData => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_fits::<u8>(n, "user data", "unsigned char");
            point.user_data = (n & 255) as u8;
            Ok(())
        },
        FieldCode::PointSourceId => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_fits::<u16>(n, "point source id", "unsigned short");
            point.point_source_id = (n & 65535) as u16;
            Ok(())
        },
        FieldCode::EdgeOfFlightLine => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_in(n, 0..=1, "edge of flight line flag", "boolean flag");
            point.edge_of_flight_line = n != 0;
            Ok(())
        },
        FieldCode::ScanDirection => |point, token, field| {
            let n = integer(token, field)?;
            warn_unless_in(n, 0..=1, "direction of scan flag", "boolean flag");
            point.scan_direction = n != 0;
            Ok(())
        },
        FieldCode::Red => |point, token, field| {
            point.color.red = integer(token, field)? as u16;
            Ok(())
        },
        FieldCode::Green => |point, token, field| {
            point.color.green = integer(token, field)? as u16;
            Ok(())
        },
        FieldCode::Blue => |point, token, field| {
            point.color.blue = integer(token, field)? as u16;
            Ok(())
        },
        FieldCode::Skip | FieldCode::PointIndex => |_, _, _| Ok(()),
    }
}

/// Scans the longest prefix of the token that is a float.
///
/// # Examples
///
/// ```
/// use lastxt::tokenizer::scan_f64;
/// assert_eq!(Some(-1.5e3), scan_f64(b"-1.5e3"));
/// assert_eq!(Some(2.), scan_f64(b"2.m"));
/// assert_eq!(Some(4.), scan_f64(b"4e"));
/// assert_eq!(None, scan_f64(b"m2"));
/// ```
pub fn scan_f64(token: &[u8]) -> Option<f64> {
    let end = float_prefix(token);
    if end == 0 {
        return None;
    }
    str::from_utf8(&token[..end]).ok()?.parse().ok()
}

/// The length of the longest prefix with float syntax: an optional sign, then `inf`,
/// `infinity`, `nan`, or digits with an optional fraction and exponent.
fn float_prefix(token: &[u8]) -> usize {
    let sign = usize::from(matches!(token.first(), Some(b'+' | b'-')));
    let rest = &token[sign..];
    for word in [&b"infinity"[..], b"inf", b"nan"] {
        if rest.len() >= word.len() && rest[..word.len()].eq_ignore_ascii_case(word) {
            return sign + word.len();
        }
    }
    let digits = |from: usize| {
        token[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    let integer = digits(sign);
    let mut end = sign + integer;
    let mut fraction = 0;
    if token.get(end) == Some(&b'.') {
        fraction = digits(end + 1);
        end += 1 + fraction;
    }
    if integer + fraction == 0 {
        return 0;
    }
    if matches!(token.get(end), Some(b'e' | b'E')) {
        let exponent_sign = usize::from(matches!(token.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits(end + 1 + exponent_sign);
        if exponent > 0 {
            end += 1 + exponent_sign + exponent;
        }
    }
    end
}

/// Scans an optionally signed run of decimal digits from the front of the token.
///
/// # Examples
///
/// ```
/// use lastxt::tokenizer::scan_i64;
/// assert_eq!(Some(-12), scan_i64(b"-12"));
/// assert_eq!(Some(3), scan_i64(b"3.9"));
/// assert_eq!(Some(7), scan_i64(b"+7"));
/// assert_eq!(None, scan_i64(b"x7"));
/// ```
pub fn scan_i64(token: &[u8]) -> Option<i64> {
    let sign = usize::from(matches!(token.first(), Some(b'+' | b'-')));
    let digits = token[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    str::from_utf8(&token[..sign + digits]).ok()?.parse().ok()
}

fn float(token: &[u8], field: FieldCode) -> Result<f64, LineError> {
    scan_f64(token).ok_or_else(|| field_parse(token, field))
}

fn integer(token: &[u8], field: FieldCode) -> Result<i64, LineError> {
    scan_i64(token).ok_or_else(|| field_parse(token, field))
}

fn field_parse(token: &[u8], field: FieldCode) -> LineError {
    LineError::FieldParse {
        field,
        token: String::from_utf8_lossy(token).into_owned(),
    }
}

fn warn_unless_fits<T: num_traits::NumCast>(n: i64, name: &str, range: &str) {
    if cast::<i64, T>(n).is_none() {
        warn_out_of_range(n, name, range);
    }
}

fn warn_unless_in(n: i64, valid: std::ops::RangeInclusive<i64>, name: &str, range: &str) {
    if !valid.contains(&n) {
        warn_out_of_range(n, name, range);
    }
}

fn warn_out_of_range(n: impl Display, name: &str, range: &str) {
    warn!("{} {} is out of range of {}", name, n, range);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Direction;

    fn spec(s: &str) -> ParseSpec {
        ParseSpec::compile(s, Direction::TextToLas)
    }

    #[test]
    fn tokens() {
        let tokens: Vec<_> = Tokenizer::new(b" ,a,,b\t c ").collect();
        assert_eq!(vec![&b"a"[..], &b"b"[..], &b"c"[..]], tokens);
        assert_eq!(0, Tokenizer::new(b" \t,").count());
    }

    #[test]
    fn truncated_line() {
        assert_eq!(
            Err(LineError::TruncatedLine(FieldCode::Z)),
            parse_line(&spec("xyz"), b"1.0 2.0")
        );
    }

    #[test]
    fn unparsable_field() {
        assert_eq!(
            Err(LineError::FieldParse {
                field: FieldCode::Y,
                token: "abc".to_string()
            }),
            parse_line(&spec("xyz"), b"1.0 abc 3.0")
        );
    }

    #[test]
    fn skip_consumes_any_token() {
        let point = parse_line(&spec("sxsyz"), b"abc 1 def 2 3").unwrap();
        assert_eq!((1., 2., 3.), (point.x, point.y, point.z));
    }

    #[test]
    fn unknown_code_consumes_nothing() {
        let point = parse_line(&spec("xqyz"), b"1 2 3").unwrap();
        assert_eq!((1., 2., 3.), (point.x, point.y, point.z));
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let point = parse_line(&spec("xyz"), b"1 2 3 4 5").unwrap();
        assert_eq!(3., point.z);
    }

    #[test]
    fn out_of_range_values_are_narrowed() {
        let point = parse_line(
            &spec("xyzirnaucpedRGB"),
            b"0 0 0 70000 9 -1 200 300 256 65537 2 5 65536 -1 7",
        )
        .unwrap();
        assert_eq!(70000i64 as u16, point.intensity);
        assert_eq!(1, point.return_number);
        assert_eq!(7, point.number_of_returns);
        assert_eq!(200i64 as i8, point.scan_angle_rank);
        assert_eq!(300 & 255, i64::from(point.user_data));
        assert_eq!(0, point.classification);
        assert_eq!(1, point.point_source_id);
        assert!(point.edge_of_flight_line);
        assert!(point.scan_direction);
        assert_eq!(0, point.color.red);
        assert_eq!(u16::MAX, point.color.green);
        assert_eq!(7, point.color.blue);
    }

    #[test]
    fn gps_time_and_color() {
        let point = parse_line(&spec("txyzRGB"), b"12.5 1 2 3 10 20 30").unwrap();
        assert_eq!(Some(12.5), point.gps_time);
        assert_eq!(20, point.color.green);
    }

    #[test]
    fn scan_prefixes() {
        assert_eq!(Some(1.), scan_f64(b"1."));
        assert_eq!(Some(0.5), scan_f64(b".5"));
        assert_eq!(Some(1.), scan_f64(b"1e"));
        assert_eq!(None, scan_f64(b"-"));
        assert_eq!(None, scan_i64(b"-"));
        assert_eq!(None, scan_i64(b""));
    }

    #[test]
    fn scan_float_syntax() {
        assert_eq!(Some(-2.5e-3), scan_f64(b"-2.5e-3m"));
        assert_eq!(Some(3.), scan_f64(b"3e+"));
        assert_eq!(Some(f64::INFINITY), scan_f64(b"Infinity"));
        assert_eq!(Some(f64::NEG_INFINITY), scan_f64(b"-inf,"));
        assert!(scan_f64(b"nan").unwrap().is_nan());
        assert_eq!(None, scan_f64(b"."));
        assert_eq!(None, scan_f64(b"e5"));
    }

    #[test]
    fn scan_long_token() {
        let mut token = vec![b'7'; 200_000];
        token.extend(b"garbage");
        let value = scan_f64(&token).unwrap();
        assert!(value.is_infinite());
        token.truncate(3);
        assert_eq!(Some(777.), scan_f64(&token));
    }
}
