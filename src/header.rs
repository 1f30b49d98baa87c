//! The part of the las header this crate populates, patches, and prints.
//!
//! A [Header] is created before any point is written. For a seekable output it starts with
//! placeholder statistics that are patched once every point has been seen, for a stream it is
//! built from the statistics of a first pass:
//!
//! ```
//! use lastxt::{Header, Stats, Point};
//!
//! let mut stats = Stats::default();
//! stats.observe(&Point { x: 1., y: 2., z: 3., return_number: 1, ..Default::default() });
//! let mut header = Header::default();
//! header.set_statistics(&stats).unwrap();
//! assert_eq!(1, header.number_of_points);
//! assert_eq!([1, 0, 0, 0, 0], header.number_of_points_by_return);
//! ```

use crate::{
    Bounds, Error, Result, Stats, Transform, Vector, Version,
    point::Format,
    raw,
    utils::{AsLasStr, FromLasStr},
    version::HEADER_SIZE,
};
use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

/// Metadata describing the layout, source, and extents of the points.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// The las version of the file.
    pub version: Version,

    /// The point record format.
    pub point_format: Format,

    /// Zero means that an id has not been assigned.
    pub file_source_id: u16,

    /// The project id.
    pub guid: Uuid,

    /// The system that generated the points, at most 32 bytes.
    pub system_identifier: String,

    /// The software that generated the file, at most 32 bytes.
    pub generating_software: String,

    /// The day the file was created.
    pub date: Option<NaiveDate>,

    /// The scale and offset of each axis.
    pub transforms: Vector<Transform>,

    /// The dequantized extents of the points.
    pub bounds: Bounds,

    /// The number of points.
    pub number_of_points: u64,

    /// The number of points with return numbers one through five.
    pub number_of_points_by_return: [u64; 5],

    /// The number of variable length records between the header and the points.
    pub number_of_variable_length_records: u32,

    /// The byte offset of the first point record.
    pub offset_to_point_data: u32,

    /// The length of one point record, which may exceed the length of the point format.
    pub point_data_record_length: u16,
}

impl Header {
    /// Creates a header from a raw header.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{Header, raw};
    /// let header = Header::from_raw(raw::Header::default()).unwrap();
    /// assert_eq!(20, header.point_data_record_length);
    /// ```
    pub fn from_raw(raw_header: raw::Header) -> Result<Header> {
        let point_format = Format::new(raw_header.point_data_format_id)?;
        if raw_header.point_data_record_length < point_format.record_length() {
            return Err(Error::InvalidPointDataRecordLength {
                format: raw_header.point_data_format_id,
                needed: point_format.record_length(),
                actual: raw_header.point_data_record_length,
            });
        }
        let mut number_of_points_by_return = [0; 5];
        for (target, &n) in number_of_points_by_return
            .iter_mut()
            .zip(&raw_header.number_of_points_by_return)
        {
            *target = u64::from(n);
        }
        Ok(Header {
            version: raw_header.version,
            point_format,
            file_source_id: raw_header.file_source_id,
            guid: Uuid::from_bytes_le(raw_header.guid),
            system_identifier: raw_header
                .system_identifier
                .as_ref()
                .as_las_str()?
                .to_string(),
            generating_software: raw_header
                .generating_software
                .as_ref()
                .as_las_str()?
                .to_string(),
            date: NaiveDate::from_yo_opt(
                i32::from(raw_header.file_creation_year),
                u32::from(raw_header.file_creation_day_of_year),
            ),
            transforms: Vector {
                x: Transform {
                    scale: raw_header.x_scale_factor,
                    offset: raw_header.x_offset,
                },
                y: Transform {
                    scale: raw_header.y_scale_factor,
                    offset: raw_header.y_offset,
                },
                z: Transform {
                    scale: raw_header.z_scale_factor,
                    offset: raw_header.z_offset,
                },
            },
            bounds: Bounds {
                min: Vector {
                    x: raw_header.min_x,
                    y: raw_header.min_y,
                    z: raw_header.min_z,
                },
                max: Vector {
                    x: raw_header.max_x,
                    y: raw_header.max_y,
                    z: raw_header.max_z,
                },
            },
            number_of_points: u64::from(raw_header.number_of_point_records),
            number_of_points_by_return,
            number_of_variable_length_records: raw_header.number_of_variable_length_records,
            offset_to_point_data: raw_header.offset_to_point_data,
            point_data_record_length: raw_header.point_data_record_length,
        })
    }

    /// Converts this header into a raw header.
    ///
    /// Empty bounds are written as zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::Header;
    /// let raw_header = Header::default().into_raw().unwrap();
    /// assert_eq!(*b"LASF", raw_header.file_signature);
    /// ```
    pub fn into_raw(&self) -> Result<raw::Header> {
        self.version.verify_supported()?;
        let mut system_identifier = [0; 32];
        system_identifier.from_las_str(&self.system_identifier)?;
        let mut generating_software = [0; 32];
        generating_software.from_las_str(&self.generating_software)?;
        let mut number_of_points_by_return = [0; 5];
        for (target, &n) in number_of_points_by_return
            .iter_mut()
            .zip(&self.number_of_points_by_return)
        {
            *target = count_to_u32(n)?;
        }
        let bounds = if self.bounds.is_empty() {
            Bounds {
                min: Vector::splat(0.),
                max: Vector::splat(0.),
            }
        } else {
            self.bounds
        };
        Ok(raw::Header {
            file_signature: raw::LASF,
            file_source_id: self.file_source_id,
            global_encoding: 0,
            guid: self.guid.to_bytes_le(),
            version: self.version,
            system_identifier,
            generating_software,
            file_creation_day_of_year: self.date.map_or(0, |date| date.ordinal() as u16),
            file_creation_year: self.date.map_or(0, |date| date.year() as u16),
            header_size: HEADER_SIZE,
            offset_to_point_data: self.offset_to_point_data,
            number_of_variable_length_records: self.number_of_variable_length_records,
            point_data_format_id: self.point_format.to_u8(),
            point_data_record_length: self.point_data_record_length,
            number_of_point_records: count_to_u32(self.number_of_points)?,
            number_of_points_by_return,
            x_scale_factor: self.transforms.x.scale,
            y_scale_factor: self.transforms.y.scale,
            z_scale_factor: self.transforms.z.scale,
            x_offset: self.transforms.x.offset,
            y_offset: self.transforms.y.offset,
            z_offset: self.transforms.z.offset,
            max_x: bounds.max.x,
            min_x: bounds.min.x,
            max_y: bounds.max.y,
            min_y: bounds.min.y,
            max_z: bounds.max.z,
            min_z: bounds.min.z,
        })
    }

    /// Sets the point count, return counts, and quantized bounds from the statistics.
    ///
    /// Logs a warning for every bound whose sign flips during quantization.
    pub fn set_statistics(&mut self, stats: &Stats) -> Result<()> {
        self.number_of_points = stats.count;
        self.number_of_points_by_return = stats.by_return();
        self.bounds = if stats.bounds.is_empty() {
            Bounds::default()
        } else {
            stats.bounds.quantize(&self.transforms)?
        };
        Ok(())
    }

    /// Sets the version, and the point data offset that goes with it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{Header, Version};
    /// let mut header = Header::default();
    /// header.set_version(Version::new(1, 0));
    /// assert_eq!(229, header.offset_to_point_data);
    /// ```
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
        self.offset_to_point_data = u32::from(HEADER_SIZE);
        if version.requires_point_data_start_signature() {
            self.offset_to_point_data += raw::POINT_DATA_START_SIGNATURE.len() as u32;
        }
    }

    /// Sets the point format, and the record length that goes with it.
    pub fn set_point_format(&mut self, point_format: Format) {
        self.point_format = point_format;
        self.point_data_record_length = point_format.record_length();
    }
}

fn count_to_u32(n: u64) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::TooManyPoints(n))
}

impl Default for Header {
    fn default() -> Header {
        let mut header = Header {
            version: Version::default(),
            point_format: Format::default(),
            file_source_id: 0,
            guid: Uuid::nil(),
            system_identifier: String::new(),
            generating_software: format!("lastxt {}", env!("CARGO_PKG_VERSION")),
            date: Some(Utc::now().date_naive()),
            transforms: Vector::splat(Transform::default()),
            bounds: Bounds::default(),
            number_of_points: 0,
            number_of_points_by_return: [0; 5],
            number_of_variable_length_records: 0,
            offset_to_point_data: 0,
            point_data_record_length: 0,
        };
        header.set_version(Version::default());
        header.set_point_format(Format::default());
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn roundtrip_through_raw() {
        let mut header = Header {
            system_identifier: "Airborne One".to_string(),
            date: NaiveDate::from_yo_opt(2003, 67),
            ..Default::default()
        };
        header.set_point_format(Format::new(3).unwrap());
        let raw_header = header.into_raw().unwrap();
        assert_eq!(67, raw_header.file_creation_day_of_year);
        assert_eq!(2003, raw_header.file_creation_year);
        assert_eq!(34, raw_header.point_data_record_length);
        let mut back = Header::from_raw(raw_header).unwrap();
        back.bounds = header.bounds;
        assert_eq!(header, back);
    }

    #[test]
    fn too_long_string() {
        let header = Header {
            generating_software: "x".repeat(33),
            ..Default::default()
        };
        assert!(header.into_raw().is_err());
    }

    #[test]
    fn too_many_points() {
        let header = Header {
            number_of_points: u64::from(u32::MAX) + 1,
            ..Default::default()
        };
        assert!(header.into_raw().is_err());
    }

    #[test]
    fn unsupported_version() {
        let mut header = Header::default();
        header.set_version(Version::new(1, 4));
        assert!(header.into_raw().is_err());
    }

    #[test]
    fn statistics() {
        let mut stats = Stats::default();
        for (x, r) in [(1.004, 1), (-2.006, 2), (0.5, 1)] {
            stats.observe(&Point {
                x,
                return_number: r,
                ..Default::default()
            });
        }
        let mut header = Header::default();
        header.set_statistics(&stats).unwrap();
        assert_eq!(3, header.number_of_points);
        assert_eq!([2, 1, 0, 0, 0], header.number_of_points_by_return);
        assert!((header.bounds.max.x - 1.0).abs() < 1e-9);
        assert!((header.bounds.min.x + 2.01).abs() < 1e-9);
    }

    #[test]
    fn short_record_length() {
        let raw_header = raw::Header {
            point_data_format_id: 1,
            point_data_record_length: 20,
            ..Default::default()
        };
        assert!(Header::from_raw(raw_header).is_err());
    }
}
