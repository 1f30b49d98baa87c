use crate::{Result, Transform, Vector, transform::is_sign_flip};
use log::warn;

/// Minimum and maximum bounds in three dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// The minimum values.
    pub min: Vector<f64>,

    /// The maximum values.
    pub max: Vector<f64>,
}

impl Bounds {
    /// Grows the bounds to encompass this point in xyz space.
    ///
    /// Each axis is compared on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lastxt::{Bounds, Vector};
    /// let mut bounds = Bounds::default();
    /// bounds.grow(&Vector { x: 1., y: 2., z: 3. });
    /// assert_eq!(1., bounds.min.x);
    /// assert_eq!(1., bounds.max.x);
    /// ```
    pub fn grow(&mut self, xyz: &Vector<f64>) {
        if xyz.x < self.min.x {
            self.min.x = xyz.x;
        }
        if xyz.y < self.min.y {
            self.min.y = xyz.y;
        }
        if xyz.z < self.min.z {
            self.min.z = xyz.z;
        }
        if xyz.x > self.max.x {
            self.max.x = xyz.x;
        }
        if xyz.y > self.max.y {
            self.max.y = xyz.y;
        }
        if xyz.z > self.max.z {
            self.max.z = xyz.z;
        }
    }

    /// Returns true if nothing has been grown into these bounds.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Quantizes and dequantizes both corners, so the bounds hold the values the points will
    /// actually have once they are read back.
    ///
    /// Logs a warning for every corner value whose sign flips during quantization.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{Bounds, Transform, Vector};
    ///
    /// let mut bounds = Bounds::default();
    /// bounds.grow(&Vector { x: 1.004, y: -2.006, z: 0. });
    /// let quantized = bounds.quantize(&Vector::splat(Transform::default())).unwrap();
    /// assert!((quantized.max.x - 1.0).abs() < 1e-9);
    /// assert!((quantized.min.y + 2.01).abs() < 1e-9);
    /// ```
    pub fn quantize(&self, transforms: &Vector<Transform>) -> Result<Bounds> {
        let quantized = Bounds {
            min: Vector {
                x: transforms.x.round_trip(self.min.x)?,
                y: transforms.y.round_trip(self.min.y)?,
                z: transforms.z.round_trip(self.min.z)?,
            },
            max: Vector {
                x: transforms.x.round_trip(self.max.x)?,
                y: transforms.y.round_trip(self.max.y)?,
                z: transforms.z.round_trip(self.max.z)?,
            },
        };
        for (axis, (original, dequantized)) in ["x", "y", "z"].into_iter().zip(
            self.min
                .to_array()
                .into_iter()
                .zip(quantized.min.to_array()),
        ) {
            warn_on_sign_flip(axis, "min", original, dequantized);
        }
        for (axis, (original, dequantized)) in ["x", "y", "z"].into_iter().zip(
            self.max
                .to_array()
                .into_iter()
                .zip(quantized.max.to_array()),
        ) {
            warn_on_sign_flip(axis, "max", original, dequantized);
        }
        Ok(quantized)
    }
}

fn warn_on_sign_flip(axis: &str, corner: &str, original: f64, dequantized: f64) {
    if is_sign_flip(original, dequantized) {
        warn!(
            "quantization sign flip for {} {} coord {} -> {}. use offset or scale up",
            axis, corner, original, dequantized
        );
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds {
            min: Vector::splat(f64::INFINITY),
            max: Vector::splat(f64::NEG_INFINITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow() {
        let mut bounds = Bounds::default();
        assert!(bounds.is_empty());
        bounds.grow(&Vector { x: 1., y: 2., z: 3. });
        assert!(!bounds.is_empty());
        assert_eq!(Vector { x: 1., y: 2., z: 3. }, bounds.min);
        assert_eq!(Vector { x: 1., y: 2., z: 3. }, bounds.max);
        bounds.grow(&Vector { x: 0., y: 3., z: 2. });
        assert_eq!(Vector { x: 0., y: 2., z: 2. }, bounds.min);
        assert_eq!(Vector { x: 1., y: 3., z: 3. }, bounds.max);
        bounds.grow(&Vector { x: 2., y: 2.5, z: 4. });
        assert_eq!(Vector { x: 0., y: 2., z: 2. }, bounds.min);
        assert_eq!(Vector { x: 2., y: 3., z: 4. }, bounds.max);
    }

    #[test]
    fn quantize_sign_flip_still_succeeds() {
        let mut bounds = Bounds::default();
        bounds.grow(&Vector { x: -0.3, y: 0., z: 0. });
        let transforms = Vector::splat(Transform { scale: 1., offset: 0. });
        let quantized = bounds.quantize(&transforms).unwrap();
        assert_eq!(0., quantized.min.x);
    }

    #[test]
    fn quantize_overflow() {
        let mut bounds = Bounds::default();
        bounds.grow(&Vector { x: 1e12, y: 0., z: 0. });
        assert!(bounds.quantize(&Vector::splat(Transform::default())).is_err());
    }
}
