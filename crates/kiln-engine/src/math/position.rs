use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use glam::Vec3;

/// A point (or displacement) in world space.
///
/// Equality is exact, component-wise.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Position(Vec3);

impl Position {
    pub const ORIGIN: Position = Position(Vec3::ZERO);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn z(self) -> f32 {
        self.0.z
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        self.0
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_from(self, other: Position) -> f32 {
        self.0.distance(other.0)
    }

    #[inline]
    pub fn dot(self, other: Position) -> f32 {
        self.0.dot(other.0)
    }

    #[inline]
    pub fn cross(self, other: Position) -> Position {
        Position(self.0.cross(other.0))
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.0.length()
    }

    /// Unit-length copy, or `None` for a zero or non-finite vector.
    #[inline]
    pub fn normalized(self) -> Option<Position> {
        self.0.try_normalize().map(Position)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == Vec3::ZERO
    }
}

impl From<Vec3> for Position {
    #[inline]
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl From<Position> for Vec3 {
    #[inline]
    fn from(p: Position) -> Self {
        p.0
    }
}

impl From<[f32; 3]> for Position {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Position {
    type Output = Position;
    #[inline]
    fn add(self, rhs: Position) -> Position {
        Position(self.0 + rhs.0)
    }
}

impl Sub for Position {
    type Output = Position;
    #[inline]
    fn sub(self, rhs: Position) -> Position {
        Position(self.0 - rhs.0)
    }
}

impl Mul<f32> for Position {
    type Output = Position;
    #[inline]
    fn mul(self, rhs: f32) -> Position {
        Position(self.0 * rhs)
    }
}

impl Neg for Position {
    type Output = Position;
    #[inline]
    fn neg(self) -> Position {
        Position(-self.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn arithmetic() {
        let a = Position::new(1.0, 2.0, 3.0);
        let b = Position::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Position::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Position::new(0.5, 3.0, 1.0));
        assert_eq!(a * 2.0, Position::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Position::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn copies_are_independent() {
        let a = Position::new(1.0, 1.0, 1.0);
        let mut b = a;
        b = b + Position::new(1.0, 0.0, 0.0);
        assert_eq!(a, Position::new(1.0, 1.0, 1.0));
        assert_eq!(b, Position::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn distance() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert_relative_eq!(a.distance_from(b), 5.0);
        assert_relative_eq!(b.distance_from(a), 5.0);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Position::new(1.0, 0.0, 0.0);
        let y = Position::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Position::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn normalized_zero_is_none() {
        assert!(Position::ORIGIN.normalized().is_none());
        let n = Position::new(0.0, 0.0, 5.0).normalized().unwrap();
        assert_eq!(n, Position::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn display_format() {
        assert_eq!(
            Position::new(1.0, -2.5, 0.0).to_string(),
            "(1.000000, -2.500000, 0.000000)"
        );
    }
}
