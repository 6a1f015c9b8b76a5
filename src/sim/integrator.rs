//! RKF45 (Runge-Kutta-Fehlberg) adaptive integrator driving the flight
//! state forward, plus the right-hand-side (force/moment) evaluation that
//! queries the atmosphere model and the component tree at each stage.

use nalgebra::Vector3;

use crate::atmosphere;
use crate::component::AeroNode;
use crate::config::SimConfig;
use crate::error::SimError;

use super::state::FlightState;

const N: usize = 12;

// Fehlberg's original 6-stage, 4th/5th order coefficients. `B[4][3]` is the
// textbook `-845/4104` value (this crate does not reproduce a transcription
// variant occasionally seen as `-845/4014`).
const A: [f64; 6] = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];

const B: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
    [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
    [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
    [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];

// 5th order solution weights.
const CH: [f64; 6] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];

// Error-estimate weights (difference between 5th and 4th order solutions).
const CT: [f64; 6] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];

fn add(a: [f64; N], b: [f64; N], scale: f64) -> [f64; N] {
    let mut out = [0.0; N];
    for i in 0..N {
        out[i] = a[i] + b[i] * scale;
    }
    out
}

/// Net body-frame force and moment about the root component's center of
/// mass at time `t`, given the current flight state.
pub fn forces_and_moments(rocket: &AeroNode, t: f64, s: &FlightState) -> (Vector3<f64>, Vector3<f64>, f64) {
    let mass = rocket.mass(t).max(1e-9);
    let com = rocket.center_of_mass(t);

    let altitude = s.zp.max(0.0);
    let r = s.body_to_world();
    let v_world = s.velocity();
    let v_body = r.inverse() * v_world;

    let a = atmosphere::sound_speed(altitude);
    let rho = atmosphere::density(altitude);
    let mu = atmosphere::dynamic_viscosity(altitude);

    // Forward flight direction is -X_body (noses are built at local x=0,
    // tails at x=length, so a nose-first rocket advances in -X_body).
    let forward_speed = -v_body.x;
    let lateral_speed = (v_body.y * v_body.y + v_body.z * v_body.z).sqrt();
    let airspeed = v_body.norm();
    let mach = if a > 0.0 { airspeed / a } else { 0.0 };
    let alpha = lateral_speed.atan2(forward_speed.max(1e-9));
    let gamma = atmosphere::GAMMA;

    let a_ref = rocket.reference_area().max(1e-9);
    let l_ref = rocket.reference_length().max(1e-9);
    let q = 0.5 * rho * airspeed * airspeed;

    let c_n_alpha = rocket.c_n_alpha(mach, alpha, gamma);
    let cp_x = rocket.cp(mach, alpha, gamma);
    let re_l = if mu > 0.0 { rho * airspeed * l_ref / mu } else { 0.0 };
    let cdf = rocket.cdf_axial(re_l, mach);
    let cdp = rocket.cdp_axial(mach);
    let cdb = rocket.cdb_axial(mach, t);

    let normal_mag = q * a_ref * c_n_alpha * alpha;
    let lateral_dir = if lateral_speed > 1e-9 {
        Vector3::new(0.0, -v_body.y / lateral_speed, -v_body.z / lateral_speed)
    } else {
        Vector3::zeros()
    };
    let normal_force = lateral_dir * normal_mag;

    // Axial drag opposes forward motion, i.e. points toward +X_body.
    let axial_drag_mag = q * a_ref * (cdf + cdp + cdb);
    let axial_drag = Vector3::new(axial_drag_mag, 0.0, 0.0);

    let thrust = rocket.thrust(t);
    let aero_force_body = normal_force + axial_drag;
    let total_force_body = thrust + aero_force_body;

    let moment_arm = Vector3::new(cp_x - com.x, 0.0, 0.0);
    let aero_moment = moment_arm.cross(&normal_force);

    let omega = Vector3::new(s.dphi, s.dtheta, s.dpsi);
    let c_m_damp = rocket.c_m_damp(com.x, omega.norm(), airspeed);
    let damp_moment = -q * a_ref * l_ref * c_m_damp * omega;

    let total_moment_body = aero_moment + damp_moment;

    (total_force_body, total_moment_body, mass)
}

/// Full 12-component state derivative at `(t, s)`.
///
/// Angular acceleration is obtained by dividing the body-axis moment by
/// the corresponding diagonal entry of the inertia tensor, a decoupled
/// approximation of the full Euler equations that drops gyroscopic
/// cross-coupling terms; reasonable for axisymmetric airframes flown close
/// to zero roll rate, which is the only vehicle class this crate models.
pub fn derivative(rocket: &AeroNode, t: f64, s: &FlightState, config: &SimConfig) -> [f64; N] {
    let _ = config;
    let mass = rocket.mass(t).max(1e-9);
    let com = rocket.center_of_mass(t);
    let inertia = rocket.inertia_about_com(t);

    let (force_body, moment_body, _) = forces_and_moments(rocket, t, s);
    let r = s.body_to_world();
    let force_world = r * force_body;

    let g = atmosphere::gravity(s.zp.max(0.0));
    let gravity_world = Vector3::new(0.0, 0.0, -mass * g);

    let accel_world = (force_world + gravity_world) / mass;

    let ang_accel = Vector3::new(
        if inertia[(0, 0)] > 1e-12 { moment_body.x / inertia[(0, 0)] } else { 0.0 },
        if inertia[(1, 1)] > 1e-12 { moment_body.y / inertia[(1, 1)] } else { 0.0 },
        if inertia[(2, 2)] > 1e-12 { moment_body.z / inertia[(2, 2)] } else { 0.0 },
    );
    let _ = com;

    [
        s.xv,
        accel_world.x,
        s.yv,
        accel_world.y,
        s.zv,
        accel_world.z,
        s.dphi,
        ang_accel.x,
        s.dtheta,
        ang_accel.y,
        s.dpsi,
        ang_accel.z,
    ]
}

/// Result of one adaptive RKF45 step.
pub struct StepResult {
    pub state: FlightState,
    pub dt_used: f64,
    pub dt_next: f64,
}

/// Advances `s` by one adaptive RKF45 step starting from a trial step size
/// `dt`, halving/growing the step until the local error estimate meets
/// `config.rtol`/`config.atol`, bounded by `config.min_step`/`max_step`.
pub fn step(
    rocket: &AeroNode,
    s: &FlightState,
    dt: f64,
    config: &SimConfig,
) -> Result<StepResult, SimError> {
    let mut h = dt.clamp(config.min_step, config.max_step);
    let y0 = s.as_vector();
    let t0 = s.t;

    for _ in 0..64 {
        let mut k: [[f64; N]; 6] = [[0.0; N]; 6];
        for stage in 0..6 {
            let mut yi = y0;
            for j in 0..stage {
                yi = add(yi, k[j], B[stage][j]);
            }
            let ti = t0 + A[stage] * h;
            let si = FlightState::from_vector(ti, yi);
            let dydt = derivative(rocket, ti, &si, config);
            for i in 0..N {
                k[stage][i] = h * dydt[i];
            }
        }

        let mut y5 = y0;
        let mut err = 0.0_f64;
        for i in 0..N {
            let mut sum5 = 0.0;
            let mut sum_err = 0.0;
            for stage in 0..6 {
                sum5 += CH[stage] * k[stage][i];
                sum_err += CT[stage] * k[stage][i];
            }
            y5[i] = y0[i] + sum5;
            let scale = config.atol + config.rtol * y5[i].abs();
            err = err.max((sum_err / scale.max(1e-12)).abs());
        }

        if err <= 1.0 || h <= config.min_step + 1e-15 {
            let next_state = FlightState::from_vector(t0 + h, y5);
            if !next_state.is_finite() {
                return Err(SimError::NumericalDivergence { steps: 0 });
            }
            let growth = if err > 1e-12 { 0.9 * err.powf(-0.2) } else { 4.0 };
            let dt_next = (h * growth.clamp(0.1, 4.0)).clamp(config.min_step, config.max_step);
            return Ok(StepResult {
                state: next_state,
                dt_used: h,
                dt_next,
            });
        }

        let shrink = 0.9 * err.powf(-0.25);
        h = (h * shrink.clamp(0.1, 0.9)).max(config.min_step);
    }

    Err(SimError::NumericalDivergence { steps: 64 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::motor::Motor;
    use crate::material::{Finish, Material};
    use crate::shapes::{Cylinder, Nosecone, TrapezoidalPrism};
    use nalgebra::Vector3 as V3;

    const SAMPLE_MOTOR: &str = "\
F27R 29 124 0 0.0602 0.1193 AeroTech
0.0 0.0
0.1 38.0
0.2 42.0
0.5 30.0
0.8 20.0
1.0 0.0
";

    fn tiny_rocket() -> AeroNode {
        let mut rocket = AeroNode::rocket("test");
        let mut stage = AeroNode::stage("stage", V3::zeros());
        let nose = AeroNode::nosecone(
            "nose",
            V3::zeros(),
            Nosecone::new(0.13, 0.0316, 0.003, 0.0),
            Material::pla(),
            Finish::smooth(),
        );
        let mut body = AeroNode::body_tube(
            "body",
            V3::new(0.13, 0.0, 0.0),
            Cylinder::hollow(0.0316, 0.66, 0.0016),
            Material::cardboard(),
            Finish::smooth(),
        );
        let fin = crate::component::Fin {
            shape: TrapezoidalPrism::new(0.10, 0.03, 0.06, 0.06, 0.003),
            material: Material::plywood(),
        };
        body.add_child(AeroNode::fin_set("fins", V3::new(0.55, 0.0, 0.0), fin, 4)).unwrap();
        body.add_child(AeroNode::motor(
            "motor",
            V3::new(0.5, 0.0, 0.0),
            Motor::from_str(SAMPLE_MOTOR).unwrap(),
        ))
        .unwrap();
        stage.add_child(nose).unwrap();
        stage.add_child(body).unwrap();
        rocket.add_child(stage).unwrap();
        rocket
    }

    #[test]
    fn derivative_is_finite_on_pad() {
        let rocket = tiny_rocket();
        let s = FlightState::zero();
        let d = derivative(&rocket, 0.0, &s, &SimConfig::default());
        assert!(d.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn on_thrust_vertical_acceleration_is_upward() {
        let rocket = tiny_rocket();
        let s = FlightState::zero();
        let d = derivative(&rocket, 0.1, &s, &SimConfig::default());
        assert!(d[5] > 0.0, "expected positive Zv-dot (thrust should outweigh gravity)");
    }

    #[test]
    fn step_advances_time_and_stays_finite() {
        let rocket = tiny_rocket();
        let s = FlightState::zero();
        let config = SimConfig::default();
        let result = step(&rocket, &s, config.initial_step, &config).unwrap();
        assert!(result.state.t > s.t);
        assert!(result.state.is_finite());
        assert!(result.dt_used > 0.0);
    }
}
