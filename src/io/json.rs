use std::io::{self, Write};

use crate::atmosphere;
use crate::sim::FlightState;

/// Summary statistics computed from a flight trajectory.
#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub apogee_m: f64,
    pub apogee_time: f64,
    pub max_speed: f64,
    pub max_mach: f64,
    pub max_accel: f64,
    pub max_accel_g: f64,
    pub flight_time: f64,
    pub impact_speed: f64,
}

impl FlightSummary {
    pub fn from_trajectory(trajectory: &[FlightState]) -> Self {
        let apogee_state = trajectory
            .iter()
            .max_by(|a, b| a.zp.partial_cmp(&b.zp).unwrap())
            .unwrap();

        let max_speed = trajectory
            .iter()
            .map(|s| s.velocity().norm())
            .fold(0.0_f64, f64::max);

        let max_mach = trajectory
            .iter()
            .map(|s| s.velocity().norm() / atmosphere::sound_speed(s.zp.max(0.0)))
            .fold(0.0_f64, f64::max);

        let max_accel = trajectory
            .windows(2)
            .map(|w| {
                let dt = w[1].t - w[0].t;
                if dt > 0.0 {
                    (w[1].velocity() - w[0].velocity()).norm() / dt
                } else {
                    0.0
                }
            })
            .fold(0.0_f64, f64::max);

        let last = trajectory.last().unwrap();

        FlightSummary {
            apogee_m: apogee_state.zp,
            apogee_time: apogee_state.t,
            max_speed,
            max_mach,
            max_accel,
            max_accel_g: max_accel / atmosphere::G0,
            flight_time: last.t,
            impact_speed: last.velocity().norm(),
        }
    }
}

/// Writes a flight summary as JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, rocket_name: &str, summary: &FlightSummary) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"rocket\": \"{rocket_name}\",")?;
    writeln!(writer, "  \"performance\": {{")?;
    writeln!(writer, "    \"apogee_m\": {:.2},", summary.apogee_m)?;
    writeln!(writer, "    \"apogee_time_s\": {:.2},", summary.apogee_time)?;
    writeln!(writer, "    \"max_speed_ms\": {:.2},", summary.max_speed)?;
    writeln!(writer, "    \"max_mach\": {:.3},", summary.max_mach)?;
    writeln!(writer, "    \"max_accel_ms2\": {:.2},", summary.max_accel)?;
    writeln!(writer, "    \"max_accel_g\": {:.2},", summary.max_accel_g)?;
    writeln!(writer, "    \"flight_time_s\": {:.2},", summary.flight_time)?;
    writeln!(writer, "    \"impact_speed_ms\": {:.2}", summary.impact_speed)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

pub fn write_summary_file(path: &str, rocket_name: &str, summary: &FlightSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, rocket_name, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_trajectory() -> Vec<FlightState> {
        vec![
            FlightState {
                t: 0.0,
                zv: 100.0,
                ..FlightState::zero()
            },
            FlightState {
                t: 10.0,
                zp: 5000.0,
                ..FlightState::zero()
            },
            FlightState {
                t: 20.0,
                zv: -50.0,
                ..FlightState::zero()
            },
        ]
    }

    #[test]
    fn summary_computes_apogee() {
        let traj = simple_trajectory();
        let s = FlightSummary::from_trajectory(&traj);
        assert!((s.apogee_m - 5000.0).abs() < 0.1);
        assert!((s.apogee_time - 10.0).abs() < 0.1);
    }

    #[test]
    fn json_output_is_valid() {
        let traj = simple_trajectory();
        let summary = FlightSummary::from_trajectory(&traj);

        let mut buf = Vec::new();
        write_summary(&mut buf, "Jeff 1", &summary).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"rocket\""));
        assert!(json.contains("\"apogee_m\""));
        assert!(json.contains("Jeff 1"));
    }
}
