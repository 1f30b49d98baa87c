//! Read las points.
//!
//! The reader never seeks, so it works on pipes. Anything between the header and the first point
//! (variable length records, a longer header, the las 1.0 start signature) is skipped:
//!
//! ```
//! use std::io::Cursor;
//! use lastxt::{Header, Reader, Sink, StreamSink, raw};
//!
//! let mut header = Header::default();
//! header.number_of_points = 1;
//! let mut sink = StreamSink::new(Vec::new());
//! sink.begin(&header).unwrap();
//! sink.write_point(&raw::Point { x: 150, ..Default::default() }).unwrap();
//!
//! let mut reader = Reader::new(Cursor::new(sink.into_inner())).unwrap();
//! let point = reader.read_point().unwrap().unwrap();
//! assert_eq!(1.5, point.x);
//! assert!(reader.read_point().unwrap().is_none());
//! ```

use crate::{Error, Header, Point, Result, raw, version::HEADER_SIZE};
use log::debug;
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

/// Reads las data.
#[derive(Debug)]
pub struct Reader<R: Read> {
    read: R,
    header: Header,
    raw_header: raw::Header,
    record_padding: u64,
    points_read: u64,
}

impl<R: Read> Reader<R> {
    /// Creates a new reader and reads up to the first point.
    pub fn new(mut read: R) -> Result<Reader<R>> {
        let raw_header = raw::Header::read_from(&mut read)?;
        let header = Header::from_raw(raw_header)?;
        let skip = u64::from(raw_header.offset_to_point_data).saturating_sub(u64::from(HEADER_SIZE));
        if skip > 0 {
            debug!("skipping {} bytes before the point data", skip);
            skip_bytes(&mut read, skip)?;
        }
        let record_padding = u64::from(
            header.point_data_record_length - header.point_format.record_length(),
        );
        Ok(Reader {
            read,
            header,
            raw_header,
            record_padding,
            points_read: 0,
        })
    }

    /// Returns the header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the header exactly as it was read.
    pub fn raw_header(&self) -> &raw::Header {
        &self.raw_header
    }

    /// Reads the next point, or `None` once the header's point count has been read.
    pub fn read_point(&mut self) -> Result<Option<Point>> {
        if self.points_read >= self.header.number_of_points {
            return Ok(None);
        }
        let raw_point = raw::Point::read_from(&mut self.read, self.header.point_format)?;
        if self.record_padding > 0 {
            skip_bytes(&mut self.read, self.record_padding)?;
        }
        self.points_read += 1;
        Ok(Some(Point::new(raw_point, &self.header.transforms)))
    }

    /// Returns an iterator over the remaining points.
    pub fn points(&mut self) -> PointIterator<'_, R> {
        PointIterator { reader: self }
    }
}

impl Reader<BufReader<File>> {
    /// Creates a new reader for a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<BufReader<File>>> {
        File::open(path.as_ref())
            .map_err(|source| Error::Open {
                path: path.as_ref().to_path_buf(),
                source,
            })
            .and_then(|file| Reader::new(BufReader::new(file)))
    }
}

/// An iterator over the points of a [Reader].
#[derive(Debug)]
pub struct PointIterator<'a, R: Read> {
    reader: &'a mut Reader<R>,
}

impl<R: Read> Iterator for PointIterator<'_, R> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Result<Point>> {
        self.reader.read_point().transpose()
    }
}

fn skip_bytes<R: Read>(read: R, n: u64) -> io::Result<()> {
    let skipped = io::copy(&mut read.take(n), &mut io::sink())?;
    if skipped < n {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected to skip {} bytes, only {} were left", n, skipped),
        ))
    } else {
        Ok(())
    }
}
