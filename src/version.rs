//! Las versions.

use crate::{Error, Result};
use std::{fmt, str::FromStr};

/// The size of the public header block for las 1.0 through 1.2.
pub const HEADER_SIZE: u16 = 227;

/// LAS version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// The major version.
    ///
    /// For now, always 1.
    pub major: u8,
    /// The minor version.
    pub minor: u8,
}

impl Version {
    /// Creates a new version.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lastxt::Version;
    /// let version = Version::new(1, 2);
    /// ```
    pub fn new(major: u8, minor: u8) -> Version {
        Version { major, minor }
    }

    /// Returns true if this crate can write files of this version.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lastxt::Version;
    /// assert!(Version::new(1, 0).is_supported());
    /// assert!(Version::new(1, 2).is_supported());
    /// assert!(!Version::new(1, 4).is_supported());
    /// ```
    pub fn is_supported(&self) -> bool {
        self.major == 1 && self.minor <= 2
    }

    /// Las 1.0 puts two signature bytes between the header and the points.
    pub fn requires_point_data_start_signature(&self) -> bool {
        self.major == 1 && self.minor == 0
    }

    /// Returns an error if this version cannot be written.
    pub fn verify_supported(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion(*self))
        }
    }
}

impl Default for Version {
    fn default() -> Version {
        Version::new(1, 2)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Version> {
        let invalid = || Error::InvalidVersion(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Version {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
