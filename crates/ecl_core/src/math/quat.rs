//! Object orientation

use super::Vec3;
use std::ops::Mul;

/// Unit quaternion, `w` is the scalar part
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// No rotation
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    fn from_parts(v: Vec3, w: f32) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
            w,
        }
    }

    fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Turn of `radians` around `axis`; a zero axis gives [`Quat::IDENTITY`]
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let length = axis.length();
        if length <= f32::EPSILON {
            return Self::IDENTITY;
        }
        let (sin, cos) = (radians / 2.0).sin_cos();
        Self::from_parts(axis * (sin / length), cos)
    }

    /// Rescale to unit length
    ///
    /// Accumulated rounding drifts the length away from one after many
    /// products. A zero quaternion becomes [`Quat::IDENTITY`].
    pub fn normalize(&self) -> Self {
        let length = (self.vector().dot(self.vector()) + self.w * self.w).sqrt();
        if length <= f32::EPSILON {
            return Self::IDENTITY;
        }
        Self::from_parts(self.vector() * (1.0 / length), self.w / length)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `a * b` applies `b` first, then `a`
impl Mul for Quat {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Quat {
        let (a, b) = (self.vector(), rhs.vector());
        Self::from_parts(
            b * self.w + a * rhs.w + a.cross(b),
            self.w * rhs.w - a.dot(b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: Quat, b: Quat) -> bool {
        [a.x - b.x, a.y - b.y, a.z - b.z, a.w - b.w]
            .iter()
            .all(|d| d.abs() < 1e-5)
    }

    #[test]
    fn test_axis_length_is_ignored() {
        let unit = Quat::from_axis_angle(Vec3::UP, FRAC_PI_2);
        let long = Quat::from_axis_angle(Vec3::UP * 5.0, FRAC_PI_2);

        assert!(close(unit, long));
        assert!((unit.y - (PI / 4.0).sin()).abs() < 1e-5);
        assert!((unit.w - (PI / 4.0).cos()).abs() < 1e-5);
        assert_eq!(Quat::from_axis_angle(Vec3::ZERO, 1.0), Quat::IDENTITY);
    }

    #[test]
    fn test_turns_compose() {
        let quarter = Quat::from_axis_angle(Vec3::UP, FRAC_PI_2);

        assert!(close(quarter * quarter, Quat::from_axis_angle(Vec3::UP, PI)));
        assert!(close(quarter * Quat::IDENTITY, quarter));
        assert!(close(Quat::IDENTITY * quarter, quarter));
    }

    #[test]
    fn test_normalize() {
        let scaled = Quat {
            x: 0.0,
            y: 2.0,
            z: 0.0,
            w: 2.0,
        };

        let unit = scaled.normalize();

        assert!(close(unit, Quat::from_axis_angle(Vec3::UP, FRAC_PI_2)));
        assert_eq!(Quat { w: 0.0, ..Quat::IDENTITY }.normalize(), Quat::IDENTITY);
        assert_eq!(Quat::default(), Quat::IDENTITY);
    }
}
