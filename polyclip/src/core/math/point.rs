use std::ops;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D point in the fixed-precision integer coordinate space.
///
/// All primitive comparisons are bit-exact, no floating point tolerance is ever involved when
/// testing points for equality.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point64 {
    pub x: i64,
    pub y: i64,
}

impl Point64 {
    /// Create a new point with x and y coordinates.
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Point64 { x, y }
    }
}

#[inline(always)]
pub fn point64(x: i64, y: i64) -> Point64 {
    Point64::new(x, y)
}

impl ops::Add for Point64 {
    type Output = Point64;
    #[inline]
    fn add(self, rhs: Point64) -> Point64 {
        point64(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub for Point64 {
    type Output = Point64;
    #[inline]
    fn sub(self, rhs: Point64) -> Point64 {
        point64(self.x - rhs.x, self.y - rhs.y)
    }
}

impl ops::Neg for Point64 {
    type Output = Point64;
    #[inline]
    fn neg(self) -> Point64 {
        point64(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops() {
        let p1 = point64(4, 5);
        let p2 = point64(1, 2);
        assert_eq!(p1 + p2, point64(5, 7));
        assert_eq!(p1 - p2, point64(3, 3));
        assert_eq!(-p1, point64(-4, -5));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut pts = vec![point64(2, 1), point64(1, 5), point64(1, 2)];
        pts.sort();
        assert_eq!(pts, vec![point64(1, 2), point64(1, 5), point64(2, 1)]);
    }
}
