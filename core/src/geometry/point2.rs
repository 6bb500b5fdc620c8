//! 2-D Points

use crate::pbrt::*;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

/// 2-D point containing `Int` values.
pub type Point2i = Point2<Int>;

impl<T: Num> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D zero point.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool
    where
        T: num_traits::Float,
    {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Returns a new point containing absolute values of the components.
    pub fn abs(&self) -> Self
    where
        T: Neg<Output = T> + PartialOrd + Copy,
    {
        Self::new(abs(self.x), abs(self.y))
    }

    /// Returns a new point containing floor of values of the components.
    pub fn floor(&self) -> Self
    where
        T: num_traits::Float,
    {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Returns the component-wise product with another point.
    ///
    /// * `other` - The other point.
    pub fn scale(&self, other: &Self) -> Self
    where
        T: Copy,
    {
        Self::new(self.x * other.x, self.y * other.y)
    }
}

impl<T: Num> Add for Point2<T> {
    type Output = Self;

    /// Adds the given point and returns the result.
    ///
    /// * `other` -  The point to add.
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num> Sub for Point2<T> {
    type Output = Self;

    /// Subtracts the given point and returns the result.
    ///
    /// * `other` -  The point to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self.x - other.x, self.y - other.y)
    }
}

impl<T: Num + Copy> Mul<T> for Point2<T> {
    type Output = Self;

    /// Scale the point.
    ///
    /// * `f` -  The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y)
    }
}

impl Mul<Point2<Float>> for Float {
    type Output = Point2<Float>;

    /// Scale the point.
    ///
    /// * `p` -  The point.
    fn mul(self, p: Point2<Float>) -> Point2<Float> {
        Point2::new(self * p.x, self * p.y)
    }
}

impl<T: Num + Copy> Div<T> for Point2<T> {
    type Output = Self;

    /// Scale the point by 1/f.
    ///
    /// * `f` -  The scaling factor.
    fn div(self, f: T) -> Self::Output {
        debug_assert!(!f.is_zero());

        let inv = T::one() / f;
        Self::Output::new(inv * self.x, inv * self.y)
    }
}

impl<T> Index<usize> for Point2<T> {
    type Output = T;

    /// Index the point by an axis to get the immutable coordinate axis value.
    ///
    /// * `axis` - A 2-D coordinate axis in [0, 1].
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Invalid axis for std::Index on Point2<T>"),
        }
    }
}

impl<T> IndexMut<usize> for Point2<T> {
    /// Index the point by an axis to get a mutable coordinate axis value.
    ///
    /// * `axis` - A 2-D coordinate axis in [0, 1].
    fn index_mut(&mut self, axis: usize) -> &mut Self::Output {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Invalid axis for std::IndexMut on Point2<T>"),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Point2<T> {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl From<[Float; 2]> for Point2f {
    /// Convert a 2-element array to a 2-D point.
    ///
    /// * `a` - The array.
    fn from(a: [Float; 2]) -> Self {
        Self::new(a[0], a[1])
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_point() {
        assert!(Point2::new(0, 0) == Point2::zero());
        assert!(Point2::new(0.0, 0.0) == Point2f::zero());
    }

    #[test]
    fn has_nans() {
        assert!(!Point2::new(0.0, 0.0).has_nans());
        assert!(Point2::new(0.0, f32::NAN).has_nans());
    }

    #[test]
    #[should_panic]
    #[allow(unused)]
    fn invalid_index() {
        let z = Point2i::zero()[2];
    }

    #[test]
    fn floor_and_scale() {
        let p = Point2f::new(1.5, -0.5);
        assert_eq!(p.floor(), Point2f::new(1.0, -1.0));
        assert_eq!(p.scale(&Point2f::new(2.0, 4.0)), Point2f::new(3.0, -2.0));
        assert_eq!(Point2f::from([1.5, -0.5]), p);
    }

    // Define some properties for tests.
    prop_range!(range_f32, f32, -100.0..100.0f32);
    prop_non_zero_range!(non_zero_f32, f32, -100.0..100.0f32);
    prop_point2!(point2_f32, f32, -100.0..100.0f32, -100.0..100.0f32);

    proptest! {
        #[test]
        fn add_sub_f32(p1 in point2_f32(), p2 in point2_f32()) {
            prop_assert_eq!(p1 + p2, Point2::new(p1.x + p2.x, p1.y + p2.y));
            prop_assert_eq!(p1 - p2, Point2::new(p1.x - p2.x, p1.y - p2.y));
        }

        #[test]
        fn mul_f32(p in point2_f32(), f in range_f32()) {
            let expected = Point2::new(p.x * f, p.y * f);
            prop_assert_eq!(p * f, expected);
            prop_assert_eq!(f * p, expected);
        }

        #[test]
        fn div_f32(p in point2_f32(), f in non_zero_f32()) {
            let s = 1.0 / f;
            prop_assert_eq!(p / f, Point2::new(p.x * s, p.y * s));
        }

        #[test]
        fn abs_f32(p in point2_f32()) {
            prop_assert_eq!(p.abs(), Point2::new(abs(p.x), abs(p.y)));
        }
    }
}
