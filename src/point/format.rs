use crate::{Error, Result};
use std::fmt;

const BASE_RECORD_LENGTH: u16 = 20;
const GPS_TIME_LENGTH: u16 = 8;
const COLOR_LENGTH: u16 = 6;

/// Point record format, one of 0 through 3.
///
/// The format is fully described by two flags:
///
/// | Format | Gps time | Color | Record length |
/// | ------ | -------- | ----- | ------------- |
/// | 0 | | | 20 |
/// | 1 | x | | 28 |
/// | 2 | | x | 26 |
/// | 3 | x | x | 34 |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Format {
    /// Does this point format include gps time?
    pub has_gps_time: bool,
    /// Does this point format include red, green, and blue colors?
    pub has_color: bool,
}

impl Format {
    /// Creates a new point format from a format number.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::point::Format;
    /// let format = Format::new(1).unwrap();
    /// assert!(format.has_gps_time);
    /// assert!(!format.has_color);
    /// assert!(Format::new(4).is_err());
    /// ```
    pub fn new(n: u8) -> Result<Format> {
        match n {
            0 => Ok(Format::from_fields(false, false)),
            1 => Ok(Format::from_fields(true, false)),
            2 => Ok(Format::from_fields(false, true)),
            3 => Ok(Format::from_fields(true, true)),
            _ => Err(Error::InvalidPointFormat(n)),
        }
    }

    /// Creates the smallest format with these attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::point::Format;
    /// assert_eq!(Format::new(3).unwrap(), Format::from_fields(true, true));
    /// ```
    pub fn from_fields(has_gps_time: bool, has_color: bool) -> Format {
        Format {
            has_gps_time,
            has_color,
        }
    }

    /// Returns this point format's number.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::point::Format;
    /// assert_eq!(2, Format::new(2).unwrap().to_u8());
    /// ```
    pub fn to_u8(&self) -> u8 {
        match (self.has_gps_time, self.has_color) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    /// The length in bytes of a point record in this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::point::Format;
    /// assert_eq!(20, Format::new(0).unwrap().record_length());
    /// ```
    pub fn record_length(&self) -> u16 {
        let mut length = BASE_RECORD_LENGTH;
        if self.has_gps_time {
            length += GPS_TIME_LENGTH;
        }
        if self.has_color {
            length += COLOR_LENGTH;
        }
        length
    }
}

impl From<Format> for u8 {
    fn from(format: Format) -> u8 {
        format.to_u8()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point format {}", self.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lengths() {
        assert_eq!(20, Format::new(0).unwrap().record_length());
        assert_eq!(28, Format::new(1).unwrap().record_length());
        assert_eq!(26, Format::new(2).unwrap().record_length());
        assert_eq!(34, Format::new(3).unwrap().record_length());
    }

    #[test]
    fn numbers() {
        for n in 0..4 {
            assert_eq!(n, Format::new(n).unwrap().to_u8());
        }
        assert!(Format::new(6).is_err());
    }
}
