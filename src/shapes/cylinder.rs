use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

use super::Shape;

/// Filled or hollow cylindrical tube: body tubes and some internal components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    radius: f64,
    length: f64,
    /// `None` for a solid (filled) cylinder; `Some(wall thickness)` for a tube.
    thickness: Option<f64>,
}

impl Cylinder {
    pub fn filled(radius: f64, length: f64) -> Self {
        Cylinder {
            radius: radius.max(0.0),
            length: length.max(0.0),
            thickness: None,
        }
    }

    pub fn hollow(radius: f64, length: f64, thickness: f64) -> Self {
        Cylinder {
            radius: radius.max(0.0),
            length: length.max(0.0),
            thickness: Some(thickness.max(0.0).min(radius.max(0.0))),
        }
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length.max(0.0);
    }

    fn inner_radius(&self) -> f64 {
        match self.thickness {
            Some(t) => (self.radius - t).max(0.0),
            None => 0.0,
        }
    }
}

impl Shape for Cylinder {
    fn volume(&self) -> f64 {
        let r = self.radius;
        match self.thickness {
            None => PI * r * r * self.length,
            Some(t) => PI * self.length * (2.0 * r * t - t * t).max(0.0),
        }
    }

    fn inertia_about_com(&self) -> Matrix3<f64> {
        let v = self.volume();
        let r = self.radius;
        let l = self.length;
        let (i_xx, i_yz) = match self.thickness {
            None => (v * r * r / 2.0, v * (l * l + 3.0 * r * r) / 12.0),
            Some(_) => {
                let ri = self.inner_radius();
                let rr = r * r + ri * ri;
                (v * rr / 2.0, v * (l * l + 3.0 * rr) / 12.0)
            }
        };
        Matrix3::from_diagonal(&Vector3::new(i_xx, i_yz, i_yz))
    }

    fn center_of_mass(&self) -> Vector3<f64> {
        Vector3::new(self.length / 2.0, 0.0, 0.0)
    }

    fn wetted_area(&self) -> f64 {
        2.0 * PI * self.radius * self.length
    }

    fn planform_area(&self) -> f64 {
        2.0 * self.radius * self.length
    }

    fn planform_center(&self) -> Vector3<f64> {
        Vector3::new(self.length / 2.0, 0.0, 0.0)
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn reference_area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn reference_length(&self) -> f64 {
        2.0 * self.radius
    }

    fn radius_at(&self, _x: f64) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn filled_volume_matches_formula() {
        let c = Cylinder::filled(0.0316, 0.66);
        assert_relative_eq!(c.volume(), PI * 0.0316 * 0.0316 * 0.66, epsilon = 1e-9);
    }

    #[test]
    fn inertia_is_symmetric_nonnegative() {
        let c = Cylinder::hollow(0.0316, 0.66, 0.0016);
        let i = c.inertia_about_com();
        assert_relative_eq!(i[(0, 1)], 0.0);
        assert!(i[(0, 0)] >= 0.0 && i[(1, 1)] >= 0.0 && i[(2, 2)] >= 0.0);
    }
}
