//! Small fixed-size vectors for the plane and for spin.
//!
//! Positions and velocities live in the surface plane (`Vec2`); angular
//! velocity, torque and contact offsets need the normal axis too (`Vec3`).
//! Both serialize as plain arrays so scenario files can write
//! `velocity = [2.0, 1.5]`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Unit vector, or `None` when the length is at or below `eps`.
    pub fn normalized(self, eps: f64) -> Option<Vec2> {
        let n = self.norm();
        (n > eps).then(|| self / n)
    }

    /// Component along one axis (0 = x, 1 = y).
    pub fn get(self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            _ => self.y,
        }
    }

    pub fn set(&mut self, axis: usize, value: f64) {
        match axis {
            0 => self.x = value,
            _ => self.y = value,
        }
    }

    /// Lift into 3D with a zero normal component.
    pub fn extend(self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Drop the normal component.
    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f64> for $ty {
            type Output = $ty;
            fn mul(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f64 {
            type Output = $ty;
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl Div<f64> for $ty {
            type Output = $ty;
            fn div(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field / rhs),+ }
            }
        }

        impl Neg for $ty {
            type Output = $ty;
            fn neg(self) -> $ty {
                $ty { $($field: -self.$field),+ }
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: $ty) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: $ty) {
                $(self.$field -= rhs.$field;)+
            }
        }
    };
}

impl_vector_ops!(Vec2 { x, y });
impl_vector_ops!(Vec3 { x, y, z });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product_right_handed() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_normalized_rejects_zero() {
        assert!(Vec2::ZERO.normalized(1e-10).is_none());
        let n = Vec2::new(3.0, 4.0).normalized(1e-10).unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_serializes_as_array() {
        let v = Vec2::new(2.0, 1.5);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[2.0,1.5]");
        let back: Vec3 = serde_json::from_str("[1.0,2.0,3.0]").unwrap();
        assert_eq!(back, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_axis_access() {
        let mut v = Vec2::new(1.0, 2.0);
        assert_eq!(v.get(0), 1.0);
        assert_eq!(v.get(1), 2.0);
        v.set(1, -5.0);
        assert_eq!(v, Vec2::new(1.0, -5.0));
    }
}
