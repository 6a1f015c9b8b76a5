//! Top-level flight simulation loop: launch rod constraint, RKF45 time
//! marching, and landing detection.

pub mod integrator;
pub mod state;

pub use state::FlightState;

use crate::component::AeroNode;
use crate::config::SimConfig;
use crate::error::SimError;

/// Launch conditions: rod length and its tilt off vertical / azimuth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchConditions {
    pub rod_length: f64,
    pub rod_angle: f64,
    pub rod_azimuth: f64,
}

impl Default for LaunchConditions {
    fn default() -> Self {
        LaunchConditions {
            rod_length: 1.2,
            rod_angle: 0.0,
            rod_azimuth: 0.0,
        }
    }
}

/// Runs a full flight from the pad to ground impact, returning the
/// recorded trajectory. Errors if the integrator cannot advance within
/// `config.max_steps` steps (divergence) or produces a non-finite state.
pub fn simulate(
    rocket: &AeroNode,
    config: &SimConfig,
    launch: &LaunchConditions,
) -> Result<Vec<FlightState>, SimError> {
    let mut s = FlightState::on_pad(launch.rod_angle, launch.rod_azimuth);
    let mut dt = config.initial_step;
    let mut trajectory = vec![s];
    let mut off_rod = false;

    for step_idx in 0..config.max_steps {
        let result = integrator::step(rocket, &s, dt, config)?;
        let mut next = result.state;

        if !off_rod {
            if next.position().norm() < launch.rod_length {
                // Constrained to the rod: only the axial (rod-aligned)
                // component of motion is kept, killing the weathercocking
                // moment's lateral drift before the fins have airspeed to
                // correct it themselves.
                let dir = rod_direction(launch);
                let axial = next.position().dot(&dir);
                let pos = dir * axial;
                let vel = dir * next.velocity().dot(&dir);
                next.xp = pos.x;
                next.yp = pos.y;
                next.zp = pos.z;
                next.xv = vel.x;
                next.yv = vel.y;
                next.zv = vel.z;
            } else {
                off_rod = true;
            }
        }

        trajectory.push(next);
        dt = result.dt_next;
        s = next;

        if off_rod && s.zp <= 0.0 && s.t > 0.5 {
            break;
        }
        if step_idx == config.max_steps - 1 {
            return Err(SimError::NumericalDivergence {
                steps: config.max_steps,
            });
        }
    }

    Ok(trajectory)
}

fn rod_direction(launch: &LaunchConditions) -> nalgebra::Vector3<f64> {
    let (sin_a, cos_a) = launch.rod_angle.sin_cos();
    let (sin_z, cos_z) = launch.rod_azimuth.sin_cos();
    nalgebra::Vector3::new(sin_a * cos_z, sin_a * sin_z, cos_a)
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
    fn flight_lands_and_trajectory_is_monotonic_in_time() {
        let rocket = tiny_rocket();
        let config = SimConfig::default();
        let launch = LaunchConditions::default();
        let trajectory = simulate(&rocket, &config, &launch).unwrap();
        assert!(trajectory.len() > 2);
        for w in trajectory.windows(2) {
            assert!(w[1].t > w[0].t);
            assert!(w[1].is_finite());
        }
        assert!(trajectory.iter().any(|s| s.zp > 1.0), "rocket should have left the pad");
    }

    #[test]
    fn tilted_rod_sends_rocket_downrange() {
        let rocket = tiny_rocket();
        let config = SimConfig::default();
        let launch = LaunchConditions {
            rod_length: 1.2,
            rod_angle: 0.2,
            rod_azimuth: 0.0,
        };
        let trajectory = simulate(&rocket, &config, &launch).unwrap();
        let apex = trajectory.iter().cloned().fold(trajectory[0], |a, b| if b.zp > a.zp { b } else { a });
        assert!(apex.xp.abs() > 0.0 || apex.zp > 0.0);
    }
}
