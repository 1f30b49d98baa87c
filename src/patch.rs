//! Rewrites the header fields that are only known once every point has been written.
//!
//! Which bytes get rewritten is a table per version, so a new header layout is a new table:
//!
//! ```
//! use std::io::Cursor;
//! use lastxt::{Version, patch::HeaderPatcher, raw};
//!
//! let mut cursor = Cursor::new(vec![0; 227]);
//! let header = raw::Header { number_of_point_records: 3, ..Default::default() };
//! HeaderPatcher::new(Version::new(1, 2)).unwrap().patch(&mut cursor, 0, &header).unwrap();
//! assert_eq!(&[3, 0, 0, 0], &cursor.get_ref()[107..111]);
//! ```

use crate::{Result, Version, raw};
use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use std::io::{self, Seek, SeekFrom, Write};

/// A header field that is patched after the points are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchField {
    /// The total number of point records.
    NumberOfPointRecords,
    /// The number of points for returns one through five.
    NumberOfPointsByReturn,
    /// Max and min for x, y, and z, interleaved per axis.
    Bounds,
}

/// How the values of a patched field are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Little endian `u32`.
    U32,
    /// Little endian `f64`.
    F64,
}

impl Encoding {
    /// The size of one value in bytes.
    pub fn size(self) -> u64 {
        match self {
            Encoding::U32 => 4,
            Encoding::F64 => 8,
        }
    }
}

/// Where one patched field lives in the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchEntry {
    /// The field.
    pub field: PatchField,
    /// The byte offset from the start of the header.
    pub offset: u64,
    /// The number of values.
    pub width: u64,
    /// The encoding of each value.
    pub encoding: Encoding,
}

const LAS_1_0_TO_1_2: [PatchEntry; 3] = [
    PatchEntry {
        field: PatchField::NumberOfPointRecords,
        offset: 107,
        width: 1,
        encoding: Encoding::U32,
    },
    PatchEntry {
        field: PatchField::NumberOfPointsByReturn,
        offset: 111,
        width: 5,
        encoding: Encoding::U32,
    },
    PatchEntry {
        field: PatchField::Bounds,
        offset: 179,
        width: 6,
        encoding: Encoding::F64,
    },
];

/// Returns the patch table for a version.
pub fn schema(version: Version) -> Result<&'static [PatchEntry]> {
    version.verify_supported()?;
    Ok(&LAS_1_0_TO_1_2)
}

/// Overwrites the deferred fields of a written header.
#[derive(Clone, Copy, Debug)]
pub struct HeaderPatcher {
    schema: &'static [PatchEntry],
}

impl HeaderPatcher {
    /// Creates a patcher for this version.
    pub fn new(version: Version) -> Result<HeaderPatcher> {
        Ok(HeaderPatcher {
            schema: schema(version)?,
        })
    }

    /// Writes the deferred fields of `header` into a header that starts at byte `start`.
    ///
    /// The position of `write` is left just past the last patched field.
    pub fn patch<W: Write + Seek>(
        &self,
        mut write: W,
        start: u64,
        header: &raw::Header,
    ) -> io::Result<()> {
        for entry in self.schema {
            let _ = write.seek(SeekFrom::Start(start + entry.offset))?;
            let values = values(entry.field, header);
            debug_assert_eq!(entry.width as usize, values.len());
            for value in values {
                match (entry.encoding, value) {
                    (Encoding::U32, Value::U32(n)) => write.write_u32::<LittleEndian>(n)?,
                    (Encoding::F64, Value::F64(n)) => write.write_f64::<LittleEndian>(n)?,
                    (encoding, value) => {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("cannot encode {:?} as {:?}", value, encoding),
                        ));
                    }
                }
            }
            debug!(
                "patched {:?} at bytes {}..{}",
                entry.field,
                entry.offset,
                entry.offset + entry.width * entry.encoding.size()
            );
        }
        write.flush()
    }
}

#[derive(Clone, Copy, Debug)]
enum Value {
    U32(u32),
    F64(f64),
}

fn values(field: PatchField, header: &raw::Header) -> Vec<Value> {
    match field {
        PatchField::NumberOfPointRecords => vec![Value::U32(header.number_of_point_records)],
        PatchField::NumberOfPointsByReturn => header
            .number_of_points_by_return
            .iter()
            .map(|&n| Value::U32(n))
            .collect(),
        PatchField::Bounds => [
            header.max_x,
            header.min_x,
            header.max_y,
            header.min_y,
            header.max_z,
            header.min_z,
        ]
        .into_iter()
        .map(Value::F64)
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn written(header: &raw::Header) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        header.write_to(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn patch_matches_full_write() {
        let placeholder = raw::Header::default();
        let last = raw::Header {
            number_of_point_records: 7,
            number_of_points_by_return: [3, 2, 1, 1, 0],
            max_x: 4.,
            min_x: -1.,
            max_y: 5.,
            min_y: 0.,
            max_z: 6.,
            min_z: 0.5,
            ..Default::default()
        };
        let mut cursor = Cursor::new(written(&placeholder));
        HeaderPatcher::new(Version::new(1, 2))
            .unwrap()
            .patch(&mut cursor, 0, &last)
            .unwrap();
        assert_eq!(written(&last), cursor.into_inner());
    }

    #[test]
    fn patch_at_start_offset() {
        let mut bytes = vec![0xAA; 10];
        bytes.extend(written(&raw::Header::default()));
        let mut cursor = Cursor::new(bytes);
        let header = raw::Header {
            number_of_points_by_return: [1, 2, 3, 4, 5],
            ..Default::default()
        };
        HeaderPatcher::new(Version::new(1, 0))
            .unwrap()
            .patch(&mut cursor, 10, &header)
            .unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(&[0xAA; 10], &bytes[..10]);
        assert_eq!(&[1, 0, 0, 0, 2, 0, 0, 0], &bytes[121..129]);
    }

    #[test]
    fn schema_covers_the_deferred_bytes() {
        let schema = schema(Version::new(1, 1)).unwrap();
        let ranges: Vec<_> = schema
            .iter()
            .map(|e| (e.offset, e.offset + e.width * e.encoding.size()))
            .collect();
        assert_eq!(vec![(107, 111), (111, 131), (179, 227)], ranges);
        assert!(super::schema(Version::new(1, 3)).is_err());
    }
}
