use std::f64::consts::PI;
use std::io::BufRead;

use nalgebra::Vector3;

use crate::error::SimError;

/// A parsed solid-motor thrust curve, immutable once loaded.
///
/// `thrust(t)` returns a body-frame vector with its nonzero component along
/// -X_body: components in this crate point their long axis toward +X at the
/// nose and -X at the tail, so thrust pushes the rocket in -X locally. Every
/// internal magnitude computation below (impulse integration, interpolation)
/// works on the tabulated thrust magnitudes directly and only applies the
/// sign once, at the `thrust` accessor, so the convention is never silently
/// inverted by intermediate arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct Motor {
    pub name: String,
    pub diameter_m: f64,
    pub length_m: f64,
    pub propellant_mass: f64,
    pub total_mass: f64,
    pub manufacturer: String,
    curve: Vec<(f64, f64)>,
    total_impulse: f64,
    cumulative_impulse: Vec<f64>,
}

impl Motor {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Motor, SimError> {
        let mut header: Option<Vec<String>> = None;
        let mut curve = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(|e| SimError::MotorParseError {
                reason: e.to_string(),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            if header.is_none() {
                let tokens: Vec<String> = trimmed.split_whitespace().map(String::from).collect();
                if tokens.len() != 7 {
                    return Err(SimError::MotorParseError {
                        reason: format!("header must have 7 tokens, found {}", tokens.len()),
                    });
                }
                header = Some(tokens);
                continue;
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens.len() < 2 {
                return Err(SimError::MotorParseError {
                    reason: format!("malformed thrust row: {trimmed}"),
                });
            }
            let t: f64 = tokens[0].parse().map_err(|_| SimError::MotorParseError {
                reason: format!("non-numeric time in row: {trimmed}"),
            })?;
            let thrust: f64 = tokens[1].parse().map_err(|_| SimError::MotorParseError {
                reason: format!("non-numeric thrust in row: {trimmed}"),
            })?;
            let stop = thrust == 0.0 && !curve.is_empty();
            curve.push((t, thrust));
            if stop {
                break;
            }
        }

        let header = header.ok_or_else(|| SimError::MotorParseError {
            reason: "no header line found".into(),
        })?;
        if curve.is_empty() {
            return Err(SimError::MotorParseError {
                reason: "no thrust samples found".into(),
            });
        }

        let diameter_mm: f64 = header[1].parse().map_err(|_| SimError::MotorParseError {
            reason: format!("bad diameter field: {}", header[1]),
        })?;
        let length_mm: f64 = header[2].parse().map_err(|_| SimError::MotorParseError {
            reason: format!("bad length field: {}", header[2]),
        })?;
        let propellant_mass: f64 = header[4].parse().map_err(|_| SimError::MotorParseError {
            reason: format!("bad propellant mass field: {}", header[4]),
        })?;
        let total_mass: f64 = header[5].parse().map_err(|_| SimError::MotorParseError {
            reason: format!("bad total mass field: {}", header[5]),
        })?;

        let mut cumulative_impulse = Vec::with_capacity(curve.len());
        let mut running = 0.0;
        cumulative_impulse.push(0.0);
        for w in curve.windows(2) {
            let (t0, f0) = w[0];
            let (t1, f1) = w[1];
            running += 0.5 * (f0.abs() + f1.abs()) * (t1 - t0);
            cumulative_impulse.push(running);
        }
        let total_impulse = running;

        Ok(Motor {
            name: header[0].clone(),
            diameter_m: diameter_mm / 1000.0,
            length_m: length_mm / 1000.0,
            propellant_mass,
            total_mass,
            manufacturer: header[6].clone(),
            curve,
            total_impulse,
            cumulative_impulse,
        })
    }

    pub fn from_str(contents: &str) -> Result<Motor, SimError> {
        Motor::from_reader(std::io::Cursor::new(contents))
    }

    pub fn from_file(path: &str) -> Result<Motor, SimError> {
        let file = std::fs::File::open(path).map_err(|e| SimError::MotorParseError {
            reason: format!("{path}: {e}"),
        })?;
        Motor::from_reader(std::io::BufReader::new(file))
    }

    pub fn burn_time(&self) -> f64 {
        self.curve.last().map(|(t, _)| *t).unwrap_or(0.0)
    }

    /// Cross-sectional area of the motor casing, used as a stand-in for its
    /// nozzle exit area when closing out the base-drag area a still-burning
    /// motor occludes.
    pub fn exit_area(&self) -> f64 {
        PI * (self.diameter_m / 2.0).powi(2)
    }

    pub fn total_impulse(&self) -> f64 {
        self.total_impulse
    }

    fn bracket(&self, t: f64) -> Option<(usize, usize, f64)> {
        if self.curve.len() < 2 {
            return None;
        }
        for i in 0..self.curve.len() - 1 {
            let (t0, _) = self.curve[i];
            let (t1, _) = self.curve[i + 1];
            if t >= t0 && t <= t1 {
                let frac = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
                return Some((i, i + 1, frac));
            }
        }
        None
    }

    /// Thrust magnitude at time `t`, Newtons, zero outside the burn.
    pub fn thrust_magnitude(&self, t: f64) -> f64 {
        match self.bracket(t) {
            Some((i0, i1, frac)) => {
                self.curve[i0].1.abs() * (1.0 - frac) + self.curve[i1].1.abs() * frac
            }
            None => 0.0,
        }
    }

    /// Thrust as a body-frame vector, -X_body convention.
    pub fn thrust(&self, t: f64) -> Vector3<f64> {
        Vector3::new(-self.thrust_magnitude(t), 0.0, 0.0)
    }

    pub fn mass(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.total_mass;
        }
        let burn = self.burn_time();
        if t >= burn {
            return (self.total_mass - self.propellant_mass).max(0.0);
        }
        if self.total_impulse <= 0.0 {
            return self.total_mass;
        }
        let spent = match self.bracket(t) {
            Some((i0, i1, frac)) => {
                self.cumulative_impulse[i0] * (1.0 - frac) + self.cumulative_impulse[i1] * frac
            }
            None => 0.0,
        };
        self.total_mass - self.propellant_mass * (spent / self.total_impulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F27R_LIKE: &str = "\
; sample motor file
F27R 29 124 0 0.0602 0.1193 AeroTech
0.0 0.0
0.1 38.0
0.2 42.0
0.5 30.0
0.8 20.0
1.0 0.0
";

    #[test]
    fn parses_header_and_curve() {
        let m = Motor::from_str(F27R_LIKE).unwrap();
        assert_eq!(m.name, "F27R");
        assert_eq!(m.manufacturer, "AeroTech");
        assert!((m.diameter_m - 0.029).abs() < 1e-9);
        assert!((m.propellant_mass - 0.0602).abs() < 1e-9);
        assert!((m.total_mass - 0.1193).abs() < 1e-9);
        assert!((m.burn_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mass_decreases_monotonically_during_burn() {
        let m = Motor::from_str(F27R_LIKE).unwrap();
        let mut last = m.mass(0.0);
        for i in 1..=10 {
            let t = i as f64 * 0.1;
            let now = m.mass(t);
            assert!(now <= last + 1e-12);
            last = now;
        }
        assert!((m.mass(1.0) - (m.total_mass - m.propellant_mass)).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_header() {
        let bad = "F27R 29 124 0 0.0602 AeroTech\n0.0 0.0\n";
        assert!(Motor::from_str(bad).is_err());
    }

    #[test]
    fn exit_area_matches_casing_cross_section() {
        let m = Motor::from_str(F27R_LIKE).unwrap();
        let expected = std::f64::consts::PI * (m.diameter_m / 2.0).powi(2);
        assert!((m.exit_area() - expected).abs() < 1e-12);
    }

    #[test]
    fn thrust_is_zero_outside_burn() {
        let m = Motor::from_str(F27R_LIKE).unwrap();
        assert_eq!(m.thrust_magnitude(-1.0), 0.0);
        assert_eq!(m.thrust_magnitude(5.0), 0.0);
        assert!(m.thrust_magnitude(0.2) > 0.0);
        assert!(m.thrust(0.2).x < 0.0);
    }
}
