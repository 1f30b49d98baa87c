/// An xyz collection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector<T> {
    /// X
    pub x: T,
    /// Y
    pub y: T,
    /// Z
    pub z: T,
}

impl<T: Copy> Vector<T> {
    /// Creates a vector with the same value on every axis.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lastxt::Vector;
    /// let vector = Vector::splat(0.01);
    /// assert_eq!(0.01, vector.z);
    /// ```
    pub fn splat(value: T) -> Vector<T> {
        Vector {
            x: value,
            y: value,
            z: value,
        }
    }

    /// Applies `f` to each axis, pairing the values of `self` and `other`.
    pub fn zip_with<U: Copy, V>(&self, other: &Vector<U>, mut f: impl FnMut(T, U) -> V) -> Vector<V> {
        Vector {
            x: f(self.x, other.x),
            y: f(self.y, other.y),
            z: f(self.z, other.z),
        }
    }

    /// The values in x, y, z order.
    pub fn to_array(&self) -> [T; 3] {
        [self.x, self.y, self.z]
    }
}
