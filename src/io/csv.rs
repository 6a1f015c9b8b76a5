use std::io::{self, Write};

use crate::sim::FlightState;

const HEADER: &str = "t,Xp,Xv,Yp,Yv,Zp,Zv,phi,dphi,theta,dtheta,psi,dpsi";

/// Writes a trajectory as CSV: one header row followed by one row per
/// recorded `FlightState`, in the exact field order of the 12-tuple.
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[FlightState]) -> io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for s in trajectory {
        writeln!(
            writer,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            s.t, s.xp, s.xv, s.yp, s.yv, s.zp, s.zv, s.phi, s.dphi, s.theta, s.dtheta, s.psi, s.dpsi
        )?;
    }
    Ok(())
}

pub fn write_trajectory_file(path: &str, trajectory: &[FlightState]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trajectory() -> Vec<FlightState> {
        vec![
            FlightState::zero(),
            FlightState {
                t: 0.1,
                zv: 50.0,
                zp: 5.0,
                ..FlightState::zero()
            },
        ]
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let traj = sample_trajectory();
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], HEADER);
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.000000,"));
    }
}
