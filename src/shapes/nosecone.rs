use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

use super::Shape;

const DIVISIONS: usize = 100;

/// Haack-series nose cone, solved numerically on a uniform axial grid.
///
/// `kappa` selects the member of the Haack family: 0 is the LV-Haack (von
/// Karman-adjacent) profile, 1/3 is the LD-Haack ("tangent ogive-like")
/// profile. All summary properties are computed once at construction and
/// cached; any setter recomputes the whole table, matching the "drop and
/// recompute" policy used for every numerically-tabulated shape here.
#[derive(Debug, Clone)]
pub struct Nosecone {
    length: f64,
    base_radius: f64,
    thickness: f64,
    kappa: f64,
    table: ProfileTable,
}

#[derive(Debug, Clone)]
struct ProfileTable {
    wetted_area: f64,
    planform_area: f64,
    planform_center_x: f64,
    filled_volume: f64,
    unfilled_volume: f64,
    unfilled_cm_x: f64,
    i_xx: f64,
    i_yy: f64,
}

impl Nosecone {
    pub fn new(length: f64, base_radius: f64, thickness: f64, kappa: f64) -> Self {
        let length = length.max(0.0);
        let base_radius = base_radius.max(0.0);
        let thickness = thickness.max(0.0).min(base_radius);
        let kappa = kappa.clamp(0.0, 1.0 / 3.0);
        let table = Self::build_table(length, base_radius, thickness, kappa);
        Nosecone {
            length,
            base_radius,
            thickness,
            kappa,
            table,
        }
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length.max(0.0);
        self.rebuild();
    }

    pub fn set_base_radius(&mut self, radius: f64) {
        self.base_radius = radius.max(0.0);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.table = Self::build_table(self.length, self.base_radius, self.thickness, self.kappa);
    }

    /// Haack radius profile, y(x), for x in [0, length].
    pub fn radius_profile(&self, x: f64) -> f64 {
        if self.length <= 0.0 {
            return self.base_radius;
        }
        let xc = x.clamp(0.0, self.length);
        let theta = (1.0 - 2.0 * xc / self.length).clamp(-1.0, 1.0).acos();
        let term = theta - (2.0 * theta).sin() / 2.0 + self.kappa * theta.sin().powi(3);
        self.base_radius / PI.sqrt() * term.max(0.0).sqrt()
    }

    fn build_table(length: f64, base_radius: f64, thickness: f64, kappa: f64) -> ProfileTable {
        if length <= 0.0 || base_radius <= 0.0 {
            return ProfileTable {
                wetted_area: 0.0,
                planform_area: 0.0,
                planform_center_x: 0.0,
                filled_volume: 0.0,
                unfilled_volume: 0.0,
                unfilled_cm_x: 0.0,
                i_xx: 0.0,
                i_yy: 0.0,
            };
        }

        let radius_at = |x: f64| -> f64 {
            let xc = x.clamp(0.0, length);
            let theta = (1.0 - 2.0 * xc / length).clamp(-1.0, 1.0).acos();
            let term = theta - (2.0 * theta).sin() / 2.0 + kappa * theta.sin().powi(3);
            base_radius / PI.sqrt() * term.max(0.0).sqrt()
        };

        let dx = length / DIVISIONS as f64;
        let mut wetted_area = 0.0;
        let mut planform_area = 0.0;
        let mut planform_moment = 0.0;
        let mut filled_volume = 0.0;
        let mut unfilled_volume = 0.0;
        let mut unfilled_moment = 0.0;
        let mut i_xx = 0.0; // rotational (about axial axis)
        let mut i_yy = 0.0; // longitudinal (about transverse axis through nose CoM-ish origin)

        for i in 0..DIVISIONS {
            let x0 = i as f64 * dx;
            let x1 = x0 + dx;
            let xbar = (x0 + x1) / 2.0;
            let r0 = radius_at(x0);
            let r1 = radius_at(x1);

            let hyp = (dx * dx + (r1 - r0) * (r1 - r0)).sqrt();
            wetted_area += hyp * (r0 + r1) * PI;
            planform_area += (r0 + r1) / 2.0 * dx * 2.0;
            planform_moment += (r0 + r1) * dx * xbar;

            let d_filled_v = PI * ((r0 + r1) / 2.0).powi(2) * dx;
            filled_volume += d_filled_v;

            let (inner0, inner1) = ((r0 - thickness).max(0.0), (r1 - thickness).max(0.0));
            let d_unfilled_v = if r0 < thickness || r1 < thickness {
                d_filled_v
            } else {
                let outer_frustum = PI / 3.0 * dx * (r0 * r0 + r0 * r1 + r1 * r1);
                let inner_frustum = PI / 3.0 * dx * (inner0 * inner0 + inner0 * inner1 + inner1 * inner1);
                (outer_frustum - inner_frustum).max(0.0)
            };
            unfilled_volume += d_unfilled_v;
            unfilled_moment += xbar * d_unfilled_v;

            let outer_sq = r0 * r0 + r1 * r1;
            let inner_sq = inner0 * inner0 + inner1 * inner1;
            i_xx += d_filled_v * (outer_sq + inner_sq) / 2.0;
            i_yy += d_filled_v * ((3.0 * (outer_sq + inner_sq) + dx * dx) / 12.0 + xbar * xbar);
        }

        let planform_center_x = if planform_area > 0.0 {
            planform_moment / planform_area
        } else {
            0.0
        };
        let unfilled_cm_x = if unfilled_volume > 0.0 {
            unfilled_moment / unfilled_volume
        } else {
            0.0
        };

        ProfileTable {
            wetted_area,
            planform_area,
            planform_center_x,
            filled_volume,
            unfilled_volume,
            unfilled_cm_x,
            i_xx,
            i_yy,
        }
    }

    pub fn filled_volume(&self) -> f64 {
        self.table.filled_volume
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    pub fn area_at(&self, x: f64) -> f64 {
        PI * self.radius_profile(x).powi(2)
    }
}

impl Shape for Nosecone {
    fn volume(&self) -> f64 {
        if self.thickness >= self.base_radius {
            self.table.filled_volume
        } else {
            self.table.unfilled_volume
        }
    }

    fn inertia_about_com(&self) -> Matrix3<f64> {
        Matrix3::from_diagonal(&Vector3::new(self.table.i_xx, self.table.i_yy, self.table.i_yy))
    }

    fn center_of_mass(&self) -> Vector3<f64> {
        let x = if self.thickness >= self.base_radius {
            // Filled cone CoM falls out of the same trapezoidal sums; the
            // unfilled first moment degenerates to it when thickness covers
            // the whole radius, so reuse unfilled_cm_x in that limit too.
            self.table.unfilled_cm_x
        } else {
            self.table.unfilled_cm_x
        };
        Vector3::new(x, 0.0, 0.0)
    }

    fn wetted_area(&self) -> f64 {
        self.table.wetted_area
    }

    fn planform_area(&self) -> f64 {
        self.table.planform_area
    }

    fn planform_center(&self) -> Vector3<f64> {
        Vector3::new(self.table.planform_center_x, 0.0, 0.0)
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn reference_area(&self) -> f64 {
        PI * self.base_radius * self.base_radius
    }

    fn reference_length(&self) -> f64 {
        2.0 * self.base_radius
    }

    fn radius_at(&self, x: f64) -> f64 {
        self.radius_profile(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn radius_profile_is_zero_at_tip_and_base_radius_at_base() {
        let n = Nosecone::new(0.13, 0.0316, 0.003, 0.0);
        assert_relative_eq!(n.radius_profile(0.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(n.radius_profile(0.13), 0.0316, epsilon = 1e-6);
    }

    #[test]
    fn volume_is_nonnegative() {
        let n = Nosecone::new(0.13, 0.0316, 0.003, 0.0);
        assert!(n.volume() >= 0.0);
        assert!(n.filled_volume() >= n.volume());
    }

    #[test]
    fn inertia_symmetric_nonnegative() {
        let n = Nosecone::new(0.13, 0.0316, 0.003, 1.0 / 3.0);
        let i = n.inertia_about_com();
        assert!(i[(0, 0)] >= 0.0 && i[(1, 1)] >= 0.0);
        assert_relative_eq!(i[(1, 1)], i[(2, 2)]);
    }
}
