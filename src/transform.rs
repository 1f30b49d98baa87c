//! Quantization of floating point coordinates into las integers.
//!
//! Quantization rounds half a step away from the offset: values above the offset get `+0.5`
//! before truncation, values at or below it get `-0.5`. This is not the same as
//! [f64::round] for every input, and files written by the tools this crate interoperates with
//! depend on it.

use crate::{Error, Result};
use std::fmt;

/// The default scale for all three axes.
pub const DEFAULT_SCALE: f64 = 0.01;

/// A scale and an offset that transforms xyz coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// The scale.
    pub scale: f64,
    /// The offset.
    pub offset: f64,
}

impl Transform {
    /// Applies this transform to an i32, returning a float.
    ///
    /// This is the exact inverse of the integer mapping, `offset + n * scale`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lastxt::Transform;
    /// let transform = Transform { scale: 2., offset: 1. };
    /// assert_eq!(3., transform.direct(1));
    /// ```
    pub fn direct(&self, n: i32) -> f64 {
        self.offset + f64::from(n) * self.scale
    }

    /// Applies the inverse transform, and rounds the result.
    ///
    /// Returns an error if the resultant value can't be represented as an i32.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lastxt::Transform;
    /// let transform = Transform { scale: 1., offset: 0. };
    /// assert_eq!(3, transform.inverse(2.5).unwrap());
    /// assert_eq!(-3, transform.inverse(-2.5).unwrap());
    /// assert_eq!(0, transform.inverse(-0.3).unwrap());
    /// ```
    pub fn inverse(&self, n: f64) -> Result<i32> {
        let quantized = self.inverse_unchecked(n);
        if quantized.is_nan() || quantized < f64::from(i32::MIN) || quantized > f64::from(i32::MAX) {
            Err(Error::InverseTransform(n, *self))
        } else {
            Ok(quantized as i32)
        }
    }

    fn inverse_unchecked(&self, n: f64) -> f64 {
        let scaled = (n - self.offset) / self.scale;
        if n > self.offset {
            (scaled + 0.5).trunc()
        } else {
            (scaled - 0.5).trunc()
        }
    }

    /// Quantizes and then dequantizes a value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lastxt::Transform;
    /// let transform = Transform { scale: 0.1, offset: 0. };
    /// assert!((transform.round_trip(1.04).unwrap() - 1.0).abs() < 1e-9);
    /// ```
    pub fn round_trip(&self, n: f64) -> Result<f64> {
        self.inverse(n).map(|n| self.direct(n))
    }
}

/// Returns true if quantization moved a value across zero.
///
/// Zero counts as non-negative, so `-0.3` quantized to `0.0` is a flip.
///
/// # Examples
///
/// ```
/// # use lastxt::transform::is_sign_flip;
/// assert!(is_sign_flip(-0.3, 0.0));
/// assert!(!is_sign_flip(0.3, 0.0));
/// assert!(!is_sign_flip(-1.2, -1.0));
/// ```
pub fn is_sign_flip(original: f64, dequantized: f64) -> bool {
    (original < 0.) != (dequantized < 0.)
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            scale: DEFAULT_SCALE,
            offset: 0.,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{} * x + {}`", self.scale, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(scale: f64, offset: f64) -> Transform {
        Transform { scale, offset }
    }

    #[test]
    fn rounds_away_from_offset() {
        let t = transform(1., 0.);
        assert_eq!(1, t.inverse(0.5).unwrap());
        assert_eq!(-1, t.inverse(-0.5).unwrap());
        assert_eq!(0, t.inverse(0.49).unwrap());
        assert_eq!(0, t.inverse(-0.49).unwrap());
        assert_eq!(0, t.inverse(0.).unwrap());
    }

    #[test]
    fn rounds_relative_to_offset() {
        let t = transform(1., 10.);
        assert_eq!(0, t.inverse(10.).unwrap());
        assert_eq!(-1, t.inverse(9.5).unwrap());
        assert_eq!(1, t.inverse(10.5).unwrap());
        assert_eq!(-10, t.inverse(0.).unwrap());
    }

    #[test]
    fn overflow() {
        let t = transform(0.001, 0.);
        assert!(t.inverse(1e10).is_err());
        assert!(t.inverse(-1e10).is_err());
        assert!(t.inverse(f64::NAN).is_err());
    }

    #[test]
    fn error_bound() {
        let values = [-1234.567, -0.3, -0.005, 0., 0.004, 0.005, 2.675, 98765.4321];
        for t in [transform(0.01, 0.), transform(0.02, 500.), transform(0.5, -3.)] {
            for &value in &values {
                let dequantized = t.round_trip(value).unwrap();
                assert!(
                    (dequantized - value).abs() <= t.scale / 2. + 1e-9,
                    "{} -> {} with {}",
                    value,
                    dequantized,
                    t
                );
            }
        }
    }

    #[test]
    fn fixed_point() {
        for t in [transform(0.01, 0.), transform(0.02, 500.), transform(0.001, -3.)] {
            for q in [-100_000, -3, -1, 0, 1, 2, 42, 1_000_000] {
                assert_eq!(q, t.inverse(t.direct(q)).unwrap());
            }
        }
    }

    #[test]
    fn sign_flip() {
        let t = transform(1., 0.);
        let dequantized = t.round_trip(-0.3).unwrap();
        assert_eq!(0., dequantized);
        assert!(is_sign_flip(-0.3, dequantized));
        assert!(!is_sign_flip(-0.7, t.round_trip(-0.7).unwrap()));
    }
}
