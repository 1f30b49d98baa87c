//! Raw public header blocks for las 1.0 through 1.2.

use crate::{Error, Result, Version, raw::LASF, version::HEADER_SIZE};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// A las header, exactly as it is laid out in the file.
///
/// The header is 227 bytes. Every multi-byte value is little endian.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Header {
    /// The file signature must contain the four characters "LASF".
    pub file_signature: [u8; 4],

    /// Zero means that an id has not been assigned.
    pub file_source_id: u16,

    /// Reserved before las 1.2. In las 1.2, the low bit selects standard gps time over gps week
    /// time.
    pub global_encoding: u16,

    /// Project id, as the sixteen bytes of a GUID.
    pub guid: [u8; 16],

    /// The format version of this file.
    pub version: Version,

    /// The system that generated this file, nul filled.
    pub system_identifier: [u8; 32],

    /// The software that generated this file, nul filled.
    pub generating_software: [u8; 32],

    /// Day, expressed as an unsigned short, on which this file was created.
    ///
    /// Day is computed as the Greenwich Mean Time (GMT) day. January 1 is considered day 1.
    pub file_creation_day_of_year: u16,

    /// The year, expressed as a four digit number, in which the file was created.
    pub file_creation_year: u16,

    /// The size, in bytes, of the public header block itself.
    pub header_size: u16,

    /// The number of bytes from the beginning of the file to the first point record.
    pub offset_to_point_data: u32,

    /// The number of variable length records that follow the header.
    pub number_of_variable_length_records: u32,

    /// The point data format id.
    pub point_data_format_id: u8,

    /// The size, in bytes, of one point data record.
    pub point_data_record_length: u16,

    /// The total number of point records within the file.
    pub number_of_point_records: u32,

    /// The number of point records for returns one through five.
    pub number_of_points_by_return: [u32; 5],

    /// The scale factor fields contain a double floating point value that is used to scale the
    /// corresponding X, Y, and Z long values within the point records.
    pub x_scale_factor: f64,
    #[allow(missing_docs)]
    pub y_scale_factor: f64,
    #[allow(missing_docs)]
    pub z_scale_factor: f64,

    /// The offset fields are added to the scaled X, Y, and Z long values.
    ///
    /// Xcoordinate = (Xrecord * Xscale) + Xoffset
    pub x_offset: f64,
    #[allow(missing_docs)]
    pub y_offset: f64,
    #[allow(missing_docs)]
    pub z_offset: f64,

    /// The actual unscaled extents of the point data.
    pub max_x: f64,
    #[allow(missing_docs)]
    pub min_x: f64,
    #[allow(missing_docs)]
    pub max_y: f64,
    #[allow(missing_docs)]
    pub min_y: f64,
    #[allow(missing_docs)]
    pub max_z: f64,
    #[allow(missing_docs)]
    pub min_z: f64,
}

impl Header {
    /// Reads a raw header from a `Read`.
    ///
    /// Only the 227 bytes of the las 1.0 to 1.2 header are consumed, even if `header_size` says
    /// the header is longer.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lastxt::raw::Header;
    /// let mut cursor = Cursor::new(Vec::new());
    /// Header::default().write_to(&mut cursor).unwrap();
    /// cursor.set_position(0);
    /// let header = Header::read_from(cursor).unwrap();
    /// ```
    pub fn read_from<R: Read>(mut read: R) -> Result<Header> {
        let mut file_signature = [0; 4];
        read.read_exact(&mut file_signature)?;
        if file_signature != LASF {
            return Err(Error::InvalidFileSignature(file_signature));
        }
        let file_source_id = read.read_u16::<LittleEndian>()?;
        let global_encoding = read.read_u16::<LittleEndian>()?;
        let mut guid = [0; 16];
        read.read_exact(&mut guid)?;
        let version_major = read.read_u8()?;
        let version_minor = read.read_u8()?;
        let mut system_identifier = [0; 32];
        read.read_exact(&mut system_identifier)?;
        let mut generating_software = [0; 32];
        read.read_exact(&mut generating_software)?;
        let file_creation_day_of_year = read.read_u16::<LittleEndian>()?;
        let file_creation_year = read.read_u16::<LittleEndian>()?;
        let header_size = read.read_u16::<LittleEndian>()?;
        let offset_to_point_data = read.read_u32::<LittleEndian>()?;
        let number_of_variable_length_records = read.read_u32::<LittleEndian>()?;
        let point_data_format_id = read.read_u8()?;
        let point_data_record_length = read.read_u16::<LittleEndian>()?;
        let number_of_point_records = read.read_u32::<LittleEndian>()?;
        let mut number_of_points_by_return = [0; 5];
        for n in &mut number_of_points_by_return {
            *n = read.read_u32::<LittleEndian>()?;
        }
        Ok(Header {
            file_signature,
            file_source_id,
            global_encoding,
            guid,
            version: Version::new(version_major, version_minor),
            system_identifier,
            generating_software,
            file_creation_day_of_year,
            file_creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_data_format_id,
            point_data_record_length,
            number_of_point_records,
            number_of_points_by_return,
            x_scale_factor: read.read_f64::<LittleEndian>()?,
            y_scale_factor: read.read_f64::<LittleEndian>()?,
            z_scale_factor: read.read_f64::<LittleEndian>()?,
            x_offset: read.read_f64::<LittleEndian>()?,
            y_offset: read.read_f64::<LittleEndian>()?,
            z_offset: read.read_f64::<LittleEndian>()?,
            max_x: read.read_f64::<LittleEndian>()?,
            min_x: read.read_f64::<LittleEndian>()?,
            max_y: read.read_f64::<LittleEndian>()?,
            min_y: read.read_f64::<LittleEndian>()?,
            max_z: read.read_f64::<LittleEndian>()?,
            min_z: read.read_f64::<LittleEndian>()?,
        })
    }

    /// Writes a raw header to a `Write`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lastxt::raw::Header;
    /// let mut cursor = Cursor::new(Vec::new());
    /// Header::default().write_to(&mut cursor).unwrap();
    /// assert_eq!(227, cursor.into_inner().len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_all(&self.file_signature)?;
        write.write_u16::<LittleEndian>(self.file_source_id)?;
        write.write_u16::<LittleEndian>(self.global_encoding)?;
        write.write_all(&self.guid)?;
        write.write_u8(self.version.major)?;
        write.write_u8(self.version.minor)?;
        write.write_all(&self.system_identifier)?;
        write.write_all(&self.generating_software)?;
        write.write_u16::<LittleEndian>(self.file_creation_day_of_year)?;
        write.write_u16::<LittleEndian>(self.file_creation_year)?;
        write.write_u16::<LittleEndian>(self.header_size)?;
        write.write_u32::<LittleEndian>(self.offset_to_point_data)?;
        write.write_u32::<LittleEndian>(self.number_of_variable_length_records)?;
        write.write_u8(self.point_data_format_id)?;
        write.write_u16::<LittleEndian>(self.point_data_record_length)?;
        write.write_u32::<LittleEndian>(self.number_of_point_records)?;
        for n in &self.number_of_points_by_return {
            write.write_u32::<LittleEndian>(*n)?;
        }
        write.write_f64::<LittleEndian>(self.x_scale_factor)?;
        write.write_f64::<LittleEndian>(self.y_scale_factor)?;
        write.write_f64::<LittleEndian>(self.z_scale_factor)?;
        write.write_f64::<LittleEndian>(self.x_offset)?;
        write.write_f64::<LittleEndian>(self.y_offset)?;
        write.write_f64::<LittleEndian>(self.z_offset)?;
        write.write_f64::<LittleEndian>(self.max_x)?;
        write.write_f64::<LittleEndian>(self.min_x)?;
        write.write_f64::<LittleEndian>(self.max_y)?;
        write.write_f64::<LittleEndian>(self.min_y)?;
        write.write_f64::<LittleEndian>(self.max_z)?;
        write.write_f64::<LittleEndian>(self.min_z)?;
        Ok(())
    }
}

impl Default for Header {
    fn default() -> Header {
        let version = Version::default();
        Header {
            file_signature: LASF,
            file_source_id: 0,
            global_encoding: 0,
            guid: [0; 16],
            version,
            system_identifier: [0; 32],
            generating_software: [0; 32],
            file_creation_day_of_year: 0,
            file_creation_year: 0,
            header_size: HEADER_SIZE,
            offset_to_point_data: u32::from(HEADER_SIZE),
            number_of_variable_length_records: 0,
            point_data_format_id: 0,
            point_data_record_length: 20,
            number_of_point_records: 0,
            number_of_points_by_return: [0; 5],
            x_scale_factor: 0.01,
            y_scale_factor: 0.01,
            z_scale_factor: 0.01,
            x_offset: 0.,
            y_offset: 0.,
            z_offset: 0.,
            max_x: 0.,
            min_x: 0.,
            max_y: 0.,
            min_y: 0.,
            max_z: 0.,
            min_z: 0.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip() {
        let header = Header {
            number_of_point_records: 42,
            number_of_points_by_return: [1, 2, 3, 4, 5],
            min_x: -1.5,
            max_z: 100.25,
            ..Default::default()
        };
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        cursor.set_position(0);
        assert_eq!(header, Header::read_from(cursor).unwrap());
    }

    #[test]
    fn field_offsets() {
        let header = Header {
            number_of_point_records: 0x0A0B0C0D,
            max_x: 1.,
            min_z: 2.,
            ..Default::default()
        };
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(&[0x0D, 0x0C, 0x0B, 0x0A], &bytes[107..111]);
        assert_eq!(1.0f64.to_le_bytes(), bytes[179..187]);
        assert_eq!(2.0f64.to_le_bytes(), bytes[219..227]);
    }

    #[test]
    fn bad_signature() {
        let mut bytes = vec![0; 227];
        bytes[0..4].copy_from_slice(b"LASX");
        assert!(Header::read_from(Cursor::new(bytes)).is_err());
    }
}
