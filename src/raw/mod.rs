//! Raw structures that map directly onto the las 1.0 through 1.2 file layout.
//!
//! These structures do the least amount of validity checking:
//!
//! ```
//! let raw_header = lastxt::raw::Header::default();
//! assert_eq!(0, raw_header.number_of_point_records);
//! ```
//!
//! Prefer [crate::Header] and [crate::Point] unless you need exact control over the bytes.

mod header;
pub mod point;

pub use self::header::Header;
pub use self::point::Point;

/// The file magic number used for all las files.
pub const LASF: [u8; 4] = *b"LASF";

/// The point data start signature required by las 1.0.
pub const POINT_DATA_START_SIGNATURE: [u8; 2] = [0xDD, 0xCC];
