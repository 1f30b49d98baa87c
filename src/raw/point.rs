//! Raw point data records for point formats 0 through 3.

use crate::{Result, point::{Color, Format}};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

const RETURN_NUMBER_MASK: u8 = 0b0000_0111;
const NUMBER_OF_RETURNS_MASK: u8 = 0b0011_1000;
const SCAN_DIRECTION_MASK: u8 = 0b0100_0000;
const EDGE_OF_FLIGHT_LINE_MASK: u8 = 0b1000_0000;

/// A raw point.
///
/// The coordinates are quantized integers; apply the header's transforms to get real values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// The X, Y, and Z values are stored as long integers.
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub z: i32,

    /// The integer representation of the pulse return magnitude.
    pub intensity: u16,

    /// Return number (bits 0-2), number of returns (bits 3-5), scan direction flag (bit 6) and
    /// edge of flight line (bit 7).
    pub flags: u8,

    /// The ASPRS classification.
    pub classification: u8,

    /// The angle, rounded to the nearest integer, of the output of the laser pulse.
    ///
    /// Zero degrees is nadir, -90 is to the left side of the aircraft.
    pub scan_angle_rank: i8,

    /// Used at the user's discretion.
    pub user_data: u8,

    /// The file from which this point originated.
    pub point_source_id: u16,

    /// The time tag value at which the point was acquired, only stored in formats 1 and 3.
    pub gps_time: Option<f64>,

    /// The red, green and blue values, only stored in formats 2 and 3.
    pub color: Option<Color>,
}

/// Packs the four bit fields into a flag byte.
///
/// The return counts are masked to their three bits.
///
/// # Examples
///
/// ```
/// use lastxt::raw::point::flags;
/// assert_eq!(0b1101_0010, flags(2, 2, true, true));
/// assert_eq!(0b0000_0001, flags(9, 0, false, false));
/// ```
pub fn flags(
    return_number: u8,
    number_of_returns: u8,
    scan_direction: bool,
    edge_of_flight_line: bool,
) -> u8 {
    let mut flags = (return_number & RETURN_NUMBER_MASK) | ((number_of_returns & 7) << 3);
    if scan_direction {
        flags |= SCAN_DIRECTION_MASK;
    }
    if edge_of_flight_line {
        flags |= EDGE_OF_FLIGHT_LINE_MASK;
    }
    flags
}

impl Point {
    /// Reads a raw point.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lastxt::raw::Point;
    /// use lastxt::point::Format;
    /// let point = Point::read_from(Cursor::new(vec![0; 20]), Format::new(0).unwrap()).unwrap();
    /// assert_eq!(Point::default(), point);
    /// ```
    pub fn read_from<R: Read>(mut read: R, format: Format) -> Result<Point> {
        let x = read.read_i32::<LittleEndian>()?;
        let y = read.read_i32::<LittleEndian>()?;
        let z = read.read_i32::<LittleEndian>()?;
        let intensity = read.read_u16::<LittleEndian>()?;
        let flags = read.read_u8()?;
        let classification = read.read_u8()?;
        let scan_angle_rank = read.read_i8()?;
        let user_data = read.read_u8()?;
        let point_source_id = read.read_u16::<LittleEndian>()?;
        let gps_time = if format.has_gps_time {
            Some(read.read_f64::<LittleEndian>()?)
        } else {
            None
        };
        let color = if format.has_color {
            let red = read.read_u16::<LittleEndian>()?;
            let green = read.read_u16::<LittleEndian>()?;
            let blue = read.read_u16::<LittleEndian>()?;
            Some(Color { red, green, blue })
        } else {
            None
        };
        Ok(Point {
            x,
            y,
            z,
            intensity,
            flags,
            classification,
            scan_angle_rank,
            user_data,
            point_source_id,
            gps_time,
            color,
        })
    }

    /// Writes a raw point.
    ///
    /// Missing gps time and color are written as zeros if the format stores them.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lastxt::raw::Point;
    /// use lastxt::point::Format;
    /// let mut cursor = Cursor::new(Vec::new());
    /// Point::default().write_to(&mut cursor, Format::new(3).unwrap()).unwrap();
    /// assert_eq!(34, cursor.into_inner().len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W, format: Format) -> Result<()> {
        write.write_i32::<LittleEndian>(self.x)?;
        write.write_i32::<LittleEndian>(self.y)?;
        write.write_i32::<LittleEndian>(self.z)?;
        write.write_u16::<LittleEndian>(self.intensity)?;
        write.write_u8(self.flags)?;
        write.write_u8(self.classification)?;
        write.write_i8(self.scan_angle_rank)?;
        write.write_u8(self.user_data)?;
        write.write_u16::<LittleEndian>(self.point_source_id)?;
        if format.has_gps_time {
            write.write_f64::<LittleEndian>(self.gps_time.unwrap_or(0.0))?;
        }
        if format.has_color {
            let color = self.color.unwrap_or_default();
            write.write_u16::<LittleEndian>(color.red)?;
            write.write_u16::<LittleEndian>(color.green)?;
            write.write_u16::<LittleEndian>(color.blue)?;
        }
        Ok(())
    }

    /// The return number, bits 0-2 of the flag byte.
    pub fn return_number(&self) -> u8 {
        self.flags & RETURN_NUMBER_MASK
    }

    /// The number of returns, bits 3-5 of the flag byte.
    pub fn number_of_returns(&self) -> u8 {
        (self.flags & NUMBER_OF_RETURNS_MASK) >> 3
    }

    /// The scan direction flag, bit 6 of the flag byte.
    pub fn scan_direction(&self) -> bool {
        self.flags & SCAN_DIRECTION_MASK == SCAN_DIRECTION_MASK
    }

    /// The edge of flight line flag, bit 7 of the flag byte.
    pub fn is_edge_of_flight_line(&self) -> bool {
        self.flags & EDGE_OF_FLIGHT_LINE_MASK == EDGE_OF_FLIGHT_LINE_MASK
    }
}
