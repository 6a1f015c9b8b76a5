//! Closed-form and numerically-integrated geometric primitives.
//!
//! Every shape exposes the same summary integral properties (volume,
//! inertia about its own center of mass, center of mass, wetted/planform
//! area) so the component tree can treat them uniformly regardless of
//! whether the underlying shape was solved in closed form (`Cylinder`,
//! `TrapezoidalPrism`) or by numerical quadrature (`Nosecone`).

mod cylinder;
mod nosecone;
mod trapezoidal_prism;

pub use cylinder::Cylinder;
pub use nosecone::Nosecone;
pub use trapezoidal_prism::TrapezoidalPrism;

use nalgebra::{Matrix3, Vector3};

/// Common surface exposed by every geometric primitive in the tree.
pub trait Shape {
    /// Total material volume, m^3.
    fn volume(&self) -> f64;
    /// Inertia tensor about the shape's own center of mass, in its local frame.
    fn inertia_about_com(&self) -> Matrix3<f64>;
    /// Center of mass in the shape's local frame (axial coordinate first).
    fn center_of_mass(&self) -> Vector3<f64>;
    /// Wetted (external surface) area, m^2.
    fn wetted_area(&self) -> f64;
    /// Planform (silhouette) area, m^2.
    fn planform_area(&self) -> f64;
    /// Axial location of the planform centroid.
    fn planform_center(&self) -> Vector3<f64>;
    /// Axial length of the shape.
    fn length(&self) -> f64;
    /// Reference area used to non-dimensionalize aero coefficients for a
    /// component built from this shape (cross-sectional area at the base).
    fn reference_area(&self) -> f64;
    /// Reference length (typically the diameter at the base).
    fn reference_length(&self) -> f64;
    /// Cross-sectional radius at axial position `x` (0 at the tip/root).
    fn radius_at(&self, x: f64) -> f64;
}

/// I' = I + m(|d|^2 * 1 - d d^T), the parallel-axis shift.
///
/// `inverse = true` subtracts the same displacement term instead of adding
/// it, which is how the tree un-shifts a child's inertia that was already
/// expressed about some other point back toward its own center of mass.
pub fn parallel_axis_transform(
    i: Matrix3<f64>,
    d: Vector3<f64>,
    m: f64,
    inverse: bool,
) -> Matrix3<f64> {
    let shift = Matrix3::identity() * d.norm_squared() - d * d.transpose();
    if inverse {
        i - m * shift
    } else {
        i + m * shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parallel_axis_round_trips() {
        let i = Matrix3::from_diagonal(&Vector3::new(1.0, 2.0, 2.0));
        let d = Vector3::new(0.3, 0.0, 0.0);
        let shifted = parallel_axis_transform(i, d, 5.0, false);
        let back = parallel_axis_transform(shifted, d, 5.0, true);
        for r in 0..3 {
            for c in 0..3 {
                assert_relative_eq!(back[(r, c)], i[(r, c)], epsilon = 1e-9);
            }
        }
    }
}
