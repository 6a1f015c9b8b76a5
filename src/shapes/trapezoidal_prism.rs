use nalgebra::{Matrix3, Vector3};

use super::Shape;

/// Flat trapezoidal planform extruded to a uniform thickness: a single fin.
///
/// Local axes: x along the chord (root leading edge at the origin), y along
/// the span, z along the thickness. Root chord `c_r` sits at y=0, tip chord
/// `c_t` at y=h, offset by the leading-edge sweep `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapezoidalPrism {
    root_chord: f64,
    tip_chord: f64,
    height: f64,
    sweep: f64,
    thickness: f64,
}

impl TrapezoidalPrism {
    pub fn new(root_chord: f64, tip_chord: f64, height: f64, sweep: f64, thickness: f64) -> Self {
        TrapezoidalPrism {
            root_chord: root_chord.max(0.0),
            tip_chord: tip_chord.max(0.0),
            height: height.max(0.0),
            sweep,
            thickness: thickness.max(0.0),
        }
    }

    fn vertices(&self) -> [(f64, f64); 4] {
        [
            (0.0, 0.0),
            (self.root_chord, 0.0),
            (self.sweep + self.tip_chord, self.height),
            (self.sweep, self.height),
        ]
    }

    /// Mean aerodynamic chord.
    pub fn mean_aerodynamic_chord(&self) -> f64 {
        let (cr, ct) = (self.root_chord, self.tip_chord);
        if cr + ct <= 0.0 {
            return 0.0;
        }
        (2.0 / 3.0) * (cr * cr + cr * ct + ct * ct) / (cr + ct)
    }

    /// Spanwise location of the MAC.
    pub fn y_mac(&self) -> f64 {
        let (cr, ct) = (self.root_chord, self.tip_chord);
        if cr + ct <= 0.0 {
            return 0.0;
        }
        (self.height / 3.0) * (cr + 2.0 * ct) / (cr + ct)
    }

    /// Axial offset of the MAC's leading edge from the root leading edge.
    pub fn x_mac_leading_edge(&self) -> f64 {
        if self.height <= 0.0 {
            return 0.0;
        }
        self.sweep * self.y_mac() / self.height
    }

    /// Sweep angle of the mid-chord line, radians.
    pub fn mid_chord_sweep(&self) -> f64 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let dx = self.sweep + (self.tip_chord - self.root_chord) / 2.0;
        (dx / self.height).atan()
    }

    /// Aspect ratio, 2h^2/A_plan.
    pub fn aspect_ratio(&self) -> f64 {
        let a = self.planform_area();
        if a <= 0.0 {
            return 0.0;
        }
        2.0 * self.height * self.height / a
    }

    pub fn span(&self) -> f64 {
        self.height
    }

    pub fn root_chord_len(&self) -> f64 {
        self.root_chord
    }

    pub fn tip_chord_len(&self) -> f64 {
        self.tip_chord
    }
}

impl Shape for TrapezoidalPrism {
    fn volume(&self) -> f64 {
        self.planform_area() * self.thickness
    }

    fn inertia_about_com(&self) -> Matrix3<f64> {
        let verts = self.vertices();
        let a = self.planform_area();
        if a <= 0.0 {
            return Matrix3::zeros();
        }
        let centroid = {
            let c = self.planform_center();
            (c.x, c.y)
        };

        // Second moments of the planform about the origin via the shoelace
        // polygon-moment formula, then shifted to the centroid.
        let mut ix0 = 0.0;
        let mut iy0 = 0.0;
        for i in 0..verts.len() {
            let (x0, y0) = verts[i];
            let (x1, y1) = verts[(i + 1) % verts.len()];
            let cross = x0 * y1 - x1 * y0;
            ix0 += cross * (y0 * y0 + y0 * y1 + y1 * y1);
            iy0 += cross * (x0 * x0 + x0 * x1 + x1 * x1);
        }
        let ix0 = ix0 / 12.0;
        let iy0 = iy0 / 12.0;

        let ix_centroid = ix0 - a * centroid.1 * centroid.1;
        let iy_centroid = iy0 - a * centroid.0 * centroid.0;

        let t = self.thickness;
        let v = self.volume();
        let i_xx = ix_centroid.abs() * t + v * t * t / 12.0; // bending about chord axis
        let i_yy = iy_centroid.abs() * t + v * t * t / 12.0; // bending about span axis
        let i_zz = ix_centroid.abs() * t + iy_centroid.abs() * t; // perpendicular-axis theorem

        Matrix3::from_diagonal(&Vector3::new(i_xx, i_yy, i_zz))
    }

    fn center_of_mass(&self) -> Vector3<f64> {
        self.planform_center()
    }

    fn wetted_area(&self) -> f64 {
        2.0 * self.planform_area()
    }

    fn planform_area(&self) -> f64 {
        (self.root_chord + self.tip_chord) * self.height / 2.0
    }

    fn planform_center(&self) -> Vector3<f64> {
        let verts = self.vertices();
        let mut a2 = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..verts.len() {
            let (x0, y0) = verts[i];
            let (x1, y1) = verts[(i + 1) % verts.len()];
            let cross = x0 * y1 - x1 * y0;
            a2 += cross;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }
        let area = a2 / 2.0;
        if area.abs() < 1e-15 {
            return Vector3::zeros();
        }
        Vector3::new(cx / (3.0 * a2), cy / (3.0 * a2), 0.0)
    }

    fn length(&self) -> f64 {
        self.root_chord.max(self.sweep + self.tip_chord)
    }

    fn reference_area(&self) -> f64 {
        self.planform_area()
    }

    fn reference_length(&self) -> f64 {
        self.mean_aerodynamic_chord()
    }

    fn radius_at(&self, _x: f64) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn volume_matches_formula() {
        let p = TrapezoidalPrism::new(0.10, 0.03, 0.06, 0.06, 0.003);
        let area = (0.10 + 0.03) / 2.0 * 0.06;
        assert_relative_eq!(p.volume(), area * 0.003, epsilon = 1e-12);
    }

    #[test]
    fn inertia_is_nonnegative_diagonal() {
        let p = TrapezoidalPrism::new(0.10, 0.03, 0.06, 0.06, 0.003);
        let i = p.inertia_about_com();
        assert!(i[(0, 0)] >= 0.0 && i[(1, 1)] >= 0.0 && i[(2, 2)] >= 0.0);
        assert_relative_eq!(i[(0, 1)], 0.0);
    }

    #[test]
    fn mac_formulas_match_rectangle_case() {
        // A rectangle (c_r == c_t, no sweep) has MAC == chord and y_mac == h/2.
        let p = TrapezoidalPrism::new(0.05, 0.05, 0.10, 0.0, 0.003);
        assert_relative_eq!(p.mean_aerodynamic_chord(), 0.05, epsilon = 1e-9);
        assert_relative_eq!(p.y_mac(), 0.05, epsilon = 1e-9);
    }
}
