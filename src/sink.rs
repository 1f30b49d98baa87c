//! Destinations for las data.
//!
//! A [SeekableSink] can go back and fix its header after the points are written, so it can take
//! points as soon as they are parsed. A [FileSink] is a seekable sink that only creates its file
//! once the header is written. A [StreamSink] cannot seek, so it needs the final header before the
//! first point:
//!
//! ```
//! use std::io::Cursor;
//! use lastxt::{Sink, SeekableSink, StreamSink};
//!
//! assert!(!SeekableSink::new(Cursor::new(Vec::new())).requires_final_header());
//! assert!(StreamSink::new(Vec::new()).requires_final_header());
//! ```

use crate::{Error, Header, Result, patch::HeaderPatcher, point::Format, raw};
use log::{debug, error};
use std::{
    fs::File,
    io::{self, BufWriter, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// Somewhere to write a header and raw points.
pub trait Sink {
    /// Returns true if the header passed to [Sink::begin] must already hold the final point
    /// count and bounds.
    fn requires_final_header(&self) -> bool;

    /// Writes the header, and the point data start signature if the version needs one.
    fn begin(&mut self, header: &Header) -> Result<()>;

    /// Writes one point record.
    fn write_point(&mut self, point: &raw::Point) -> Result<()>;

    /// Finishes the output with the final header.
    fn finish(&mut self, header: &Header) -> Result<()>;
}

/// A sink that patches its header when it is finished.
#[derive(Debug)]
pub struct SeekableSink<W: Write + Seek> {
    write: W,
    start: u64,
    point_format: Format,
}

/// A seekable sink over a file that is created when the header is written.
///
/// An existing file at the path is left untouched until then, so a conversion that fails before
/// its first point does not clobber it.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    sink: Option<SeekableSink<BufWriter<File>>>,
}

/// A sink that writes strictly front to back.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    write: W,
    point_format: Format,
}

impl<W: Write + Seek> SeekableSink<W> {
    /// Creates a new seekable sink.
    pub fn new(write: W) -> SeekableSink<W> {
        SeekableSink {
            write,
            start: 0,
            point_format: Format::default(),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

impl<W: Write + Seek> Sink for SeekableSink<W> {
    fn requires_final_header(&self) -> bool {
        false
    }

    fn begin(&mut self, header: &Header) -> Result<()> {
        self.start = self.write.stream_position()?;
        self.point_format = header.point_format;
        write_header(&mut self.write, header)
    }

    fn write_point(&mut self, point: &raw::Point) -> Result<()> {
        point.write_to(&mut self.write, self.point_format)
    }

    fn finish(&mut self, header: &Header) -> Result<()> {
        let raw_header = header.into_raw()?;
        let end = self.write.stream_position()?;
        HeaderPatcher::new(header.version)?
            .patch(&mut self.write, self.start, &raw_header)
            .and_then(|()| self.write.seek(SeekFrom::Start(end)))
            .map_err(|err| {
                error!("could not patch the header at byte {}: {}", self.start, err);
                Error::HeaderPatch(err)
            })?;
        debug!("patched the header at byte {}", self.start);
        self.write.flush()?;
        Ok(())
    }
}

impl FileSink {
    /// Creates a sink for the file at this path.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::sink::FileSink;
    /// let dir = tempfile::tempdir().unwrap();
    /// let sink = FileSink::new(dir.path().join("out.las"));
    /// assert!(!dir.path().join("out.las").exists());
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> FileSink {
        FileSink {
            path: path.as_ref().to_path_buf(),
            sink: None,
        }
    }

    /// Returns the path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sink(&mut self) -> Result<&mut SeekableSink<BufWriter<File>>> {
        self.sink.as_mut().ok_or_else(|| {
            Error::Io(io::Error::other(format!(
                "{} has not been created yet",
                self.path.display()
            )))
        })
    }
}

impl Sink for FileSink {
    fn requires_final_header(&self) -> bool {
        false
    }

    fn begin(&mut self, header: &Header) -> Result<()> {
        let file = File::create(&self.path).map_err(|source| Error::Open {
            path: self.path.clone(),
            source,
        })?;
        debug!("created {}", self.path.display());
        self.sink
            .insert(SeekableSink::new(BufWriter::new(file)))
            .begin(header)
    }

    fn write_point(&mut self, point: &raw::Point) -> Result<()> {
        self.sink()?.write_point(point)
    }

    fn finish(&mut self, header: &Header) -> Result<()> {
        self.sink()?.finish(header)
    }
}

impl<W: Write> StreamSink<W> {
    /// Creates a new stream sink.
    pub fn new(write: W) -> StreamSink<W> {
        StreamSink {
            write,
            point_format: Format::default(),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn requires_final_header(&self) -> bool {
        true
    }

    fn begin(&mut self, header: &Header) -> Result<()> {
        self.point_format = header.point_format;
        write_header(&mut self.write, header)
    }

    fn write_point(&mut self, point: &raw::Point) -> Result<()> {
        point.write_to(&mut self.write, self.point_format)
    }

    fn finish(&mut self, _: &Header) -> Result<()> {
        self.write.flush()?;
        Ok(())
    }
}

fn write_header<W: Write>(mut write: W, header: &Header) -> Result<()> {
    header.into_raw()?.write_to(&mut write)?;
    if header.version.requires_point_data_start_signature() {
        write.write_all(&raw::POINT_DATA_START_SIGNATURE)?;
    }
    Ok(())
}
