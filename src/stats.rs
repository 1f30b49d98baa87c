//! Running statistics over converted points.

use crate::{Bounds, Point};
use log::info;

/// Running statistics over the points of one conversion.
///
/// The bounds are over the unquantized coordinates. The return histogram has one bucket for each
/// three-bit return number, though only returns one through five end up in a las header.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    /// The number of observed points.
    pub count: u64,

    /// The extents of the observed points.
    pub bounds: Bounds,

    /// Point counts indexed by return number.
    pub returns: [u64; 8],
}

impl Stats {
    /// Adds a point to these statistics.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{Point, Stats};
    /// let mut stats = Stats::default();
    /// stats.observe(&Point { return_number: 9, ..Default::default() });
    /// assert_eq!(1, stats.count);
    /// assert_eq!(1, stats.returns[1]);
    /// ```
    pub fn observe(&mut self, point: &Point) {
        self.count += 1;
        self.bounds.grow(&point.xyz());
        self.returns[usize::from(point.return_number & 7)] += 1;
    }

    /// The point counts for returns one through five, as stored in a las header.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastxt::{Point, Stats};
    /// let mut stats = Stats::default();
    /// stats.observe(&Point { return_number: 5, ..Default::default() });
    /// stats.observe(&Point { return_number: 6, ..Default::default() });
    /// assert_eq!([0, 0, 0, 0, 1], stats.by_return());
    /// ```
    pub fn by_return(&self) -> [u64; 5] {
        let mut by_return = [0; 5];
        by_return.copy_from_slice(&self.returns[1..6]);
        by_return
    }

    /// Logs the count, raw extents, and the full return histogram.
    pub fn log(&self) {
        info!("npoints {}", self.count);
        if !self.bounds.is_empty() {
            info!(
                "min x y z {} {} {}",
                self.bounds.min.x, self.bounds.min.y, self.bounds.min.z
            );
            info!(
                "max x y z {} {} {}",
                self.bounds.max.x, self.bounds.max.y, self.bounds.max.z
            );
        }
        for (return_number, count) in self.returns.iter().enumerate() {
            if *count > 0 {
                info!("return {}: {}", return_number, count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    fn point(x: f64, y: f64, z: f64, return_number: u8) -> Point {
        Point {
            x,
            y,
            z,
            return_number,
            ..Default::default()
        }
    }

    #[test]
    fn xyzr() {
        let mut stats = Stats::default();
        stats.observe(&point(1., 2., 3., 1));
        stats.observe(&point(4., 5., 6., 2));
        stats.observe(&point(-1., 0., 0., 1));
        assert_eq!(3, stats.count);
        assert_eq!(Vector { x: -1., y: 0., z: 0. }, stats.bounds.min);
        assert_eq!(Vector { x: 4., y: 5., z: 6. }, stats.bounds.max);
        assert_eq!(2, stats.returns[1]);
        assert_eq!(1, stats.returns[2]);
        assert_eq!([2, 1, 0, 0, 0], stats.by_return());
    }

    #[test]
    fn histogram_sums_to_count() {
        let mut stats = Stats::default();
        for r in 0..20 {
            stats.observe(&point(0., 0., 0., r));
        }
        assert_eq!(stats.count, stats.returns.iter().sum::<u64>());
    }
}
