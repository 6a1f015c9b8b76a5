//! The twelve-component flight state: three position/velocity pairs in the
//! launch (world) frame, plus three Euler angle/rate pairs describing the
//! body's attitude via an extrinsic X-Y-Z rotation from the world frame.

use nalgebra::{Rotation3, Vector3};

/// `(Xp, Xv, Yp, Yv, Zp, Zv, phi, dphi, theta, dtheta, psi, dpsi)`.
///
/// Positions and linear velocities are in the world/launch frame (Zp is
/// altitude above the pad, positive up). `phi`, `theta`, `psi` are the
/// extrinsic X-Y-Z Euler angles carrying the body frame to the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub t: f64,
    pub xp: f64,
    pub xv: f64,
    pub yp: f64,
    pub yv: f64,
    pub zp: f64,
    pub zv: f64,
    pub phi: f64,
    pub dphi: f64,
    pub theta: f64,
    pub dtheta: f64,
    pub psi: f64,
    pub dpsi: f64,
}

impl FlightState {
    pub fn zero() -> Self {
        FlightState {
            t: 0.0,
            xp: 0.0,
            xv: 0.0,
            yp: 0.0,
            yv: 0.0,
            zp: 0.0,
            zv: 0.0,
            phi: 0.0,
            dphi: 0.0,
            theta: 0.0,
            dtheta: 0.0,
            psi: 0.0,
            dpsi: 0.0,
        }
    }

    /// A state initialized for launch up a rod tilted by `theta0` from
    /// vertical (rotation about the world Y axis) and rotated `psi0` in
    /// azimuth (about the world Z axis).
    pub fn on_pad(theta0: f64, psi0: f64) -> Self {
        let mut s = FlightState::zero();
        s.theta = theta0;
        s.psi = psi0;
        s
    }

    pub fn as_vector(&self) -> [f64; 12] {
        [
            self.xp, self.xv, self.yp, self.yv, self.zp, self.zv, self.phi, self.dphi, self.theta,
            self.dtheta, self.psi, self.dpsi,
        ]
    }

    pub fn from_vector(t: f64, v: [f64; 12]) -> Self {
        FlightState {
            t,
            xp: v[0],
            xv: v[1],
            yp: v[2],
            yv: v[3],
            zp: v[4],
            zv: v[5],
            phi: v[6],
            dphi: v[7],
            theta: v[8],
            dtheta: v[9],
            psi: v[10],
            dpsi: v[11],
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.xp, self.yp, self.zp)
    }

    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.xv, self.yv, self.zv)
    }

    /// Rotation carrying body-frame vectors into the world frame: the
    /// extrinsic composition `Rz(psi) * Ry(theta) * Rx(phi)`.
    pub fn body_to_world(&self) -> Rotation3<f64> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.phi);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.theta);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.psi);
        rz * ry * rx
    }

    pub fn is_finite(&self) -> bool {
        self.as_vector().iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trips_through_vector_form() {
        let s = FlightState {
            t: 1.5,
            xp: 1.0,
            xv: 2.0,
            yp: 3.0,
            yv: 4.0,
            zp: 5.0,
            zv: 6.0,
            phi: 0.1,
            dphi: 0.2,
            theta: 0.3,
            dtheta: 0.4,
            psi: 0.5,
            dpsi: 0.6,
        };
        let back = FlightState::from_vector(s.t, s.as_vector());
        assert_eq!(s, back);
    }

    #[test]
    fn identity_attitude_is_identity_rotation() {
        let s = FlightState::zero();
        let r = s.body_to_world();
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!((r * v - v).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn on_pad_sets_only_attitude() {
        let s = FlightState::on_pad(0.15, 0.3);
        assert_eq!(s.theta, 0.15);
        assert_eq!(s.psi, 0.3);
        assert_eq!(s.xp, 0.0);
        assert!(s.is_finite());
    }
}
