//! Helpers for the fixed-width, nul-filled strings in las headers.

use crate::{Error, Result};
use std::{iter, str};

/// Converts nul-filled bytes into a string.
pub trait AsLasStr {
    /// Interprets the bytes up to the first nul as a `&str`.
    ///
    /// Trailing garbage after the first nul is ignored, since not every writer fills with nuls.
    ///
    /// # Examples
    ///
    /// `[u8]` implements `AsLasStr`.
    ///
    /// ```
    /// use lastxt::utils::AsLasStr;
    /// assert_eq!("LiDAR", [76, 105, 68, 65, 82, 0, 33].as_ref().as_las_str().unwrap());
    /// ```
    fn as_las_str(&self) -> Result<&str>;
}

impl AsLasStr for [u8] {
    fn as_las_str(&self) -> Result<&str> {
        let end = self.iter().position(|&n| n == 0).unwrap_or(self.len());
        str::from_utf8(&self[..end]).map_err(Error::from)
    }
}

/// Converts a string into nul-filled bytes.
pub trait FromLasStr {
    /// Copies `s` into `self` and fills the rest with nuls.
    ///
    /// # Examples
    ///
    /// `[u8; N]` implements `FromLasStr`:
    ///
    /// ```
    /// use lastxt::utils::FromLasStr;
    /// let mut bytes = [1; 5];
    /// bytes.from_las_str("Beer").unwrap();
    /// assert_eq!([66, 101, 101, 114, 0], bytes);
    /// ```
    fn from_las_str(&mut self, s: &str) -> Result<()>;
}

impl<T: AsMut<[u8]>> FromLasStr for T {
    fn from_las_str(&mut self, s: &str) -> Result<()> {
        let bytes = self.as_mut();
        if s.len() > bytes.len() {
            return Err(Error::TooLong(s.to_string(), bytes.len()));
        }
        for (a, b) in bytes.iter_mut().zip(s.bytes().chain(iter::repeat(0))) {
            *a = b;
        }
        Ok(())
    }
}
