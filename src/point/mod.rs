//! Points parsed from text or read from las, before quantization.

mod format;

pub use self::format::Format;

use crate::{Result, Transform, Vector, raw};

/// A point with real-valued coordinates and its attributes.
///
/// Attributes are already narrowed to their record widths. Fields that the source did not
/// provide stay at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// The x coordinate, as a float.
    pub x: f64,
    /// The y coordinate, as a float.
    pub y: f64,
    /// The z coordinate, as a float.
    pub z: f64,
    /// The integer representation of the pulse return magnitude.
    pub intensity: u16,
    /// The pulse return number for a given output pulse, in 0 through 7.
    pub return_number: u8,
    /// The total number of returns for a given pulse, in 0 through 7.
    pub number_of_returns: u8,
    /// The scan direction flag.
    pub scan_direction: bool,
    /// True if the point is at the end of a scan.
    pub edge_of_flight_line: bool,
    /// The ASPRS classification for this point.
    pub classification: u8,
    /// The angle, rounded to the nearest integer, of the output of the laser pulse.
    pub scan_angle_rank: i8,
    /// Used at the user's discretion.
    pub user_data: u8,
    /// The file from which this point originated.
    pub point_source_id: u16,
    /// The time at which the point was acquired.
    pub gps_time: Option<f64>,
    /// This point's color, black if none was given.
    pub color: Color,
}

/// A RGB color value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub red: u16,
    /// Green channel.
    pub green: u16,
    /// Blue channel.
    pub blue: u16,
}

impl Point {
    /// Creates a point from a raw point.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{Point, Transform, Vector, raw};
    /// let raw_point = raw::Point { x: 150, ..Default::default() };
    /// let point = Point::new(raw_point, &Vector::splat(Transform::default()));
    /// assert_eq!(1.5, point.x);
    /// ```
    pub fn new(raw_point: raw::Point, transforms: &Vector<Transform>) -> Point {
        Point {
            x: transforms.x.direct(raw_point.x),
            y: transforms.y.direct(raw_point.y),
            z: transforms.z.direct(raw_point.z),
            intensity: raw_point.intensity,
            return_number: raw_point.return_number(),
            number_of_returns: raw_point.number_of_returns(),
            scan_direction: raw_point.scan_direction(),
            edge_of_flight_line: raw_point.is_edge_of_flight_line(),
            classification: raw_point.classification,
            scan_angle_rank: raw_point.scan_angle_rank,
            user_data: raw_point.user_data,
            point_source_id: raw_point.point_source_id,
            gps_time: raw_point.gps_time,
            color: raw_point.color.unwrap_or_default(),
        }
    }

    /// Quantizes this point into a raw point.
    ///
    /// Returns an error if a coordinate cannot be stored as an `i32` with these transforms.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{Point, Transform, Vector};
    /// let point = Point { x: 1.004, ..Default::default() };
    /// let raw_point = point.into_raw(&Vector::splat(Transform::default())).unwrap();
    /// assert_eq!(100, raw_point.x);
    /// ```
    pub fn into_raw(self, transforms: &Vector<Transform>) -> Result<raw::Point> {
        Ok(raw::Point {
            x: transforms.x.inverse(self.x)?,
            y: transforms.y.inverse(self.y)?,
            z: transforms.z.inverse(self.z)?,
            intensity: self.intensity,
            flags: raw::point::flags(
                self.return_number,
                self.number_of_returns,
                self.scan_direction,
                self.edge_of_flight_line,
            ),
            classification: self.classification,
            scan_angle_rank: self.scan_angle_rank,
            user_data: self.user_data,
            point_source_id: self.point_source_id,
            gps_time: self.gps_time,
            color: Some(self.color),
        })
    }

    /// Returns this point's coordinates.
    pub fn xyz(&self) -> Vector<f64> {
        Vector {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}
