//! U.S. Standard Atmosphere 1976.
//!
//! Below 86 km the model is the seven-layer geopotential table, evaluated
//! in closed form, with the 80-86 km molecular-weight correction folded
//! into the molecular-scale temperature there. Above 86 km, USSA76 is a
//! species-by-species number-density integration: N2, O, O2, Ar, He and H
//! are each carried through a cumulative trapezoidal integration of their
//! own diffusive/eddy-mixed profile, built once on a 100 m grid from 86 km
//! to 1000 km and published behind a `OnceCell` so every reader after that
//! sees the finished table with no locking on the hot path.

use once_cell::sync::OnceCell;

pub const EARTH_RADIUS: f64 = 6_356_766.0; // m, R0
pub const G0: f64 = 9.806_65; // m/s^2
pub const R_STAR: f64 = 8314.32; // J/(kmol*K)
pub const M0: f64 = 28.9644; // kg/kmol, sea-level mean molar mass
pub const GAMMA: f64 = 1.4;
pub const SUTHERLAND_BETA: f64 = 1.458e-6;
pub const SUTHERLAND_S: f64 = 110.4; // K
const N_A: f64 = 6.022169e26; // molecules per kmol

/// Specific gas constant for air at sea level, J/(kg*K).
const R_AIR: f64 = R_STAR / M0;

const MIN_ALT: f64 = -5_000.0;
const MAX_ALT: f64 = 1_000_000.0;

/// (base geopotential height m, base temperature K, lapse rate K/m, base pressure Pa)
const LAYERS: [(f64, f64, f64, f64); 8] = [
    (0.0, 288.15, -0.0065, 101_325.0),
    (11_000.0, 216.65, 0.0, 22_632.1),
    (20_000.0, 216.65, 0.001, 5_474.89),
    (32_000.0, 228.65, 0.0028, 868.019),
    (47_000.0, 270.65, 0.0, 110.906),
    (51_000.0, 270.65, -0.0028, 66.9389),
    (71_000.0, 214.65, -0.002, 3.956_42),
    (84_852.0, 186.946, 0.0, 0.373_38),
];

/// Molecular-weight ratio M(z)/M0 from 0 to 86 km, tabulated at the
/// altitudes where the standard's dissociation correction is defined.
/// Flat at 1.0 below 80 km; the correction only bites in the last 6 km.
const M_RATIO_TABLE: [(f64, f64); 14] = [
    (0.0, 1.000_000),
    (80_000.0, 1.000_000),
    (80_500.0, 0.999_996),
    (81_000.0, 0.999_989),
    (81_500.0, 0.999_971),
    (82_000.0, 0.999_941),
    (82_500.0, 0.999_909),
    (83_000.0, 0.999_870),
    (83_500.0, 0.999_829),
    (84_000.0, 0.999_786),
    (84_500.0, 0.999_741),
    (85_000.0, 0.999_694),
    (85_500.0, 0.999_641),
    (86_000.0, 0.999_579),
];

/// Elliptic-arc constants shared by the 86-91 km plateau and the 91-110 km
/// sqrt-ellipse (the plateau is the arc's own value at its z = 91 km edge).
const ARC_T_C: f64 = 263.1905;
const ARC_A: f64 = -76.3232;
const ARC_A_KM: f64 = 19.9429;

/// Reference temperature at the 86 km boundary condition used to anchor the
/// species integration below, equal to the elliptic arc evaluated at its
/// own z = 91 km edge (where the sqrt term is exactly 1).
const MESOPAUSE_REFERENCE_T: f64 = ARC_T_C + ARC_A;

const GRID_STEP: f64 = 100.0; // m
const GRID_START: f64 = 86_000.0;
const GRID_END: f64 = 1_000_000.0;

/// Fixed parameters of one of the five diffusively-separated species
/// (all but atomic hydrogen, which has its own boundary condition at
/// 500 km rather than 86 km and is integrated separately).
struct Species {
    molar_mass: f64,
    /// Thermal-diffusion coefficient parameters, D = a/n * (T/273.15)^b.
    a: f64,
    b: f64,
    /// Thermal-diffusion constant (nonzero only for He and H).
    alpha: f64,
    /// Number density at the 86 km boundary, molecules/m^3.
    base_density: f64,
    /// Primary flux-term Gaussian-like hump, active for z <= 150 km.
    big_q: f64,
    big_u: f64,
    big_w: f64,
    /// Secondary flux-term hump, active only for z <= 97 km (O only).
    small_q: f64,
    small_u: f64,
    small_w: f64,
}

const N2: Species = Species {
    molar_mass: 28.0134,
    a: 0.0,
    b: 0.0,
    alpha: 0.0,
    base_density: 1.129_794e20,
    big_q: 0.0,
    big_u: 0.0,
    big_w: 0.0,
    small_q: 0.0,
    small_u: 0.0,
    small_w: 0.0,
};

const O: Species = Species {
    molar_mass: 15.9994,
    a: 6.986e20,
    b: 0.750,
    alpha: 0.0,
    base_density: 8.6e16,
    big_q: -5.809_644e-13,
    big_u: 56_903.11,
    big_w: 2.706_240e-14,
    small_q: -3.416_248e-12,
    small_u: 97_000.0,
    small_w: 5.008_765e-13,
};

const O2: Species = Species {
    molar_mass: 31.9988,
    a: 4.863e20,
    b: 0.750,
    alpha: 0.0,
    base_density: 3.030_898_426e19,
    big_q: 1.366_212e-13,
    big_u: 86_000.0,
    big_w: 8.333_333e-14,
    small_q: 0.0,
    small_u: 0.0,
    small_w: 0.0,
};

const AR: Species = Species {
    molar_mass: 39.948,
    a: 4.487e20,
    b: 0.870,
    alpha: 0.0,
    base_density: 1.351_400_22e18,
    big_q: 9.434_079e-14,
    big_u: 86_000.0,
    big_w: 8.333_333e-14,
    small_q: 0.0,
    small_u: 0.0,
    small_w: 0.0,
};

const HE: Species = Species {
    molar_mass: 4.0026,
    a: 1.700e21,
    b: 0.691,
    alpha: -0.40,
    base_density: 7.581_73e14,
    big_q: -2.457_369e-13,
    big_u: 86_000.0,
    big_w: 6.666_667e-13,
    small_q: 0.0,
    small_u: 0.0,
    small_w: 0.0,
};

// Atomic hydrogen is pinned at 500 km rather than 86 km, so it carries its
// own constants rather than going through `Species`/`integrate_species`.
const H_MOLAR_MASS: f64 = 1.00797;
const H_A: f64 = 3.305e21;
const H_B: f64 = 0.5;
const H_ALPHA: f64 = -0.25;
const H_BASE_DENSITY: f64 = 8e10;
const H_REFERENCE_T: f64 = 999.2356;

struct HighAltitudeTable {
    altitudes: Vec<f64>,
    number_density: Vec<f64>, // molecules / m^3
    molar_mass: Vec<f64>,     // kg/kmol
}

/// The singleton published high-altitude table and derived constants.
pub struct Atmosphere {
    table: HighAltitudeTable,
}

static ATMOSPHERE: OnceCell<Atmosphere> = OnceCell::new();

fn instance() -> &'static Atmosphere {
    ATMOSPHERE.get_or_init(Atmosphere::build)
}

impl Atmosphere {
    fn build() -> Self {
        log::debug!("building USSA76 species-integrated high-altitude table (86-1000 km)");
        let n_steps = ((GRID_END - GRID_START) / GRID_STEP).round() as usize;
        let altitudes: Vec<f64> = (0..=n_steps).map(|i| GRID_START + i as f64 * GRID_STEP).collect();

        let gravity: Vec<f64> = altitudes.iter().map(|&z| gravity(z)).collect();
        let temp: Vec<f64> = altitudes.iter().map(|&z| temperature(z)).collect();
        let eddy: Vec<f64> = altitudes.iter().map(|&z| eddy_diffusion_coefficient(z)).collect();
        let dtdz: Vec<f64> = altitudes.iter().map(|&z| temperature_gradient(z)).collect();

        // N2 carries the whole bulk molar mass below 100 km by itself; it's
        // integrated first and on its own, as nothing diffusively separates
        // from it down there.
        let bulk_below_100: Vec<f64> = altitudes.iter().map(|&z| if z < 100_000.0 { M0 } else { N2.molar_mass }).collect();
        let n2_integrand: Vec<f64> = (0..altitudes.len())
            .map(|i| bulk_below_100[i] * gravity[i] / (R_STAR * temp[i]))
            .collect();
        let n2_integral = cumulative_trapezoid(&altitudes, &n2_integrand);
        let n_n2: Vec<f64> = (0..altitudes.len())
            .map(|i| N2.base_density * (MESOPAUSE_REFERENCE_T / temp[i]) * (-n2_integral[i]).exp())
            .collect();

        let mut n_tot = n_n2.clone();
        let n_o = integrate_species(&O, &altitudes, &gravity, &temp, &eddy, &dtdz, &n_tot, &bulk_below_100);
        let n_o2 = integrate_species(&O2, &altitudes, &gravity, &temp, &eddy, &dtdz, &n_tot, &bulk_below_100);
        for i in 0..n_tot.len() {
            n_tot[i] += n_o[i] + n_o2[i];
        }

        let m_after_o: Vec<f64> = (0..altitudes.len())
            .map(|i| weighted_molar_mass(altitudes[i], n_tot[i], &[(&n_n2, N2.molar_mass), (&n_o, O.molar_mass), (&n_o2, O2.molar_mass)], i))
            .collect();

        let n_ar = integrate_species(&AR, &altitudes, &gravity, &temp, &eddy, &dtdz, &n_tot, &m_after_o);
        let n_he = integrate_species(&HE, &altitudes, &gravity, &temp, &eddy, &dtdz, &n_tot, &m_after_o);
        for i in 0..n_tot.len() {
            n_tot[i] += n_ar[i] + n_he[i];
        }

        let n_h = integrate_hydrogen(&altitudes, &gravity, &temp, &n_tot);
        for i in 0..n_tot.len() {
            n_tot[i] += n_h[i];
        }

        let molar_mass: Vec<f64> = (0..altitudes.len())
            .map(|i| {
                weighted_molar_mass(
                    altitudes[i],
                    n_tot[i],
                    &[
                        (&n_n2, N2.molar_mass),
                        (&n_o, O.molar_mass),
                        (&n_o2, O2.molar_mass),
                        (&n_ar, AR.molar_mass),
                        (&n_he, HE.molar_mass),
                        (&n_h, H_MOLAR_MASS),
                    ],
                    i,
                )
            })
            .collect();

        Atmosphere {
            table: HighAltitudeTable {
                altitudes,
                number_density: n_tot,
                molar_mass,
            },
        }
    }

    fn lookup(&self, z: f64) -> (f64, f64) {
        let t = &self.table;
        if z <= t.altitudes[0] {
            return (t.number_density[0], t.molar_mass[0]);
        }
        if z >= *t.altitudes.last().unwrap() {
            return (*t.number_density.last().unwrap(), *t.molar_mass.last().unwrap());
        }
        let idx = match t
            .altitudes
            .binary_search_by(|probe| probe.partial_cmp(&z).unwrap())
        {
            Ok(i) => return (t.number_density[i], t.molar_mass[i]),
            Err(i) => i,
        };
        let (z0, z1) = (t.altitudes[idx - 1], t.altitudes[idx]);
        let frac = (z - z0) / (z1 - z0);
        let n = t.number_density[idx - 1] * (1.0 - frac) + t.number_density[idx] * frac;
        let m = t.molar_mass[idx - 1] * (1.0 - frac) + t.molar_mass[idx] * frac;
        (n, m)
    }
}

/// Number-weighted mean molar mass from the species densities accumulated
/// so far, clamped to the sea-level value below 100 km (where the
/// atmosphere is still well mixed and hasn't started diffusively
/// separating).
fn weighted_molar_mass(z: f64, n_tot: f64, species: &[(&Vec<f64>, f64)], i: usize) -> f64 {
    if z < 100_000.0 {
        return M0;
    }
    let weighted: f64 = species.iter().map(|(n, m)| n[i] * m).sum();
    weighted / n_tot
}

/// Thermal-diffusion coefficient, D = a/n * (T/273.15)^b.
fn diffusion_coefficient(t: f64, a: f64, b: f64, n: f64) -> f64 {
    a / n * (t / 273.15).powf(b)
}

/// Eddy diffusion coefficient, the turbopause mixing profile.
fn eddy_diffusion_coefficient(z: f64) -> f64 {
    if z < 95_000.0 {
        120.0
    } else if z < 115_000.0 {
        120.0 * (1.0 - 400e6 / (400e6 - (z - 95_000.0).powi(2))).exp()
    } else {
        0.0
    }
}

/// dT/dz in K/m, matching the piecewise `temperature` formula above 86 km.
fn temperature_gradient(z: f64) -> f64 {
    if z < 91_000.0 {
        0.0
    } else if z < 110_000.0 {
        let dz_km = (z - 91_000.0) / 1000.0;
        let ratio = dz_km / ARC_A_KM;
        (-ARC_A / ARC_A_KM) * ratio / (1.0 - ratio * ratio).max(1e-12).sqrt() / 1000.0
    } else if z < 120_000.0 {
        0.012
    } else {
        const LAMBDA_PER_KM: f64 = 0.01875;
        let ratio = (EARTH_RADIUS + 120_000.0) / (EARTH_RADIUS + z);
        let xi_km = (z - 120_000.0) / 1000.0 * ratio;
        LAMBDA_PER_KM * (1000.0 - 360.0) * ratio * ratio * (-LAMBDA_PER_KM * xi_km).exp() / 1000.0
    }
}

fn species_flux(species: &Species, z: f64) -> f64 {
    if z > 150_000.0 {
        return 0.0;
    }
    let mut flux = species.big_q * (z - species.big_u).powi(2) * (-species.big_w * (z - species.big_u).powi(3)).exp();
    if z <= 97_000.0 && species.small_q != 0.0 {
        flux += species.small_q * (species.small_u - z).powi(2) * (-species.small_w * (species.small_u - z).powi(3)).exp();
    }
    flux
}

/// Cumulative trapezoidal integral of `y` against `x`, walking the arrays
/// in whatever order they're given (descending `x` integrates downward).
fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut result = vec![0.0; x.len()];
    for i in 1..x.len() {
        result[i] = result[i - 1] + 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
    }
    result
}

fn integrate_species(
    species: &Species,
    altitudes: &[f64],
    gravity: &[f64],
    temp: &[f64],
    eddy: &[f64],
    dtdz: &[f64],
    n_tot: &[f64],
    m_tot: &[f64],
) -> Vec<f64> {
    let len = altitudes.len();
    let f: Vec<f64> = (0..len)
        .map(|i| {
            let d = diffusion_coefficient(temp[i], species.a, species.b, n_tot[i]);
            let k = eddy[i];
            (gravity[i] / (R_STAR * temp[i])) * (d / (d + k))
                * (species.molar_mass + m_tot[i] * k / d + species.alpha * R_STAR / gravity[i] * dtdz[i])
        })
        .collect();
    let flux: Vec<f64> = altitudes.iter().map(|&z| species_flux(species, z)).collect();
    let sum: Vec<f64> = (0..len).map(|i| f[i] + flux[i]).collect();
    let integral = cumulative_trapezoid(altitudes, &sum);
    (0..len)
        .map(|i| species.base_density * (MESOPAUSE_REFERENCE_T / temp[i]) * (-integral[i]).exp())
        .collect()
}

/// Atomic hydrogen is pinned at a boundary density at 500 km (its
/// production peak) rather than at 86 km like the other species, so it is
/// integrated downward toward 86 km and upward toward 1000 km separately,
/// then zeroed below 150 km where it has no meaningful presence.
fn integrate_hydrogen(altitudes: &[f64], gravity: &[f64], temp: &[f64], n_tot: &[f64]) -> Vec<f64> {
    let len = altitudes.len();
    let tau_integrand: Vec<f64> = (0..len).map(|i| gravity[i] * H_MOLAR_MASS / (R_STAR * temp[i])).collect();

    let index = altitudes.partition_point(|&z| z <= 500_000.0) - 1;

    let reversed = |v: &[f64]| -> Vec<f64> { (0..=index).rev().map(|i| v[i]).collect() };
    let z_down = reversed(altitudes);
    let tau_down = cumulative_trapezoid(&z_down, &reversed(&tau_integrand));
    let t_down = reversed(temp);
    let d_down: Vec<f64> = (0..=index)
        .rev()
        .map(|i| diffusion_coefficient(temp[i], H_A, H_B, n_tot[i]))
        .collect();

    let integrand_down: Vec<f64> = (0..=index)
        .map(|k| 7.2e11 / d_down[k] * (t_down[k] / H_REFERENCE_T).powf(1.0 + H_ALPHA) * tau_down[k].exp())
        .collect();
    let cumulative_down = cumulative_trapezoid(&z_down, &integrand_down);

    let n_h_down: Vec<f64> = (0..=index)
        .map(|k| (H_BASE_DENSITY - cumulative_down[k]) * (H_REFERENCE_T / t_down[k]).powf(1.0 + H_ALPHA) * (-tau_down[k]).exp())
        .collect();

    let z_up = &altitudes[index + 1..];
    let tau_up = cumulative_trapezoid(z_up, &tau_integrand[index + 1..]);
    let n_h_up: Vec<f64> = (0..z_up.len())
        .map(|k| H_BASE_DENSITY * (H_REFERENCE_T / temp[index + 1 + k]).powf(1.0 + H_ALPHA) * (-tau_up[k]).exp())
        .collect();

    let mut n_h = vec![0.0; len];
    for (k, &v) in n_h_down.iter().enumerate() {
        n_h[index - k] = v;
    }
    for (k, &v) in n_h_up.iter().enumerate() {
        n_h[index + 1 + k] = v;
    }

    let zero_below = altitudes.partition_point(|&z| z <= 150_000.0) - 1;
    for slot in n_h.iter_mut().take(zero_below) {
        *slot = 0.0;
    }

    n_h
}

fn molecular_weight_ratio(z: f64) -> f64 {
    let z = z.clamp(0.0, 86_000.0);
    if z <= M_RATIO_TABLE[0].0 {
        return M_RATIO_TABLE[0].1;
    }
    for w in M_RATIO_TABLE.windows(2) {
        let (z0, r0) = w[0];
        let (z1, r1) = w[1];
        if z <= z1 {
            let frac = (z - z0) / (z1 - z0);
            return r0 + (r1 - r0) * frac;
        }
    }
    M_RATIO_TABLE.last().unwrap().1
}

fn clamp_altitude(z: f64) -> f64 {
    z.clamp(MIN_ALT, MAX_ALT)
}

/// Geopotential height from geometric altitude.
fn geopotential_height(z: f64) -> f64 {
    EARTH_RADIUS * z / (EARTH_RADIUS + z)
}

fn layer_for(h: f64) -> (f64, f64, f64, f64) {
    let mut layer = LAYERS[0];
    for &l in LAYERS.iter() {
        if h >= l.0 {
            layer = l;
        } else {
            break;
        }
    }
    layer
}

fn temperature_below_86km(h: f64) -> f64 {
    let (h_b, t_b, lapse, _) = layer_for(h);
    t_b + lapse * (h - h_b)
}

fn pressure_below_86km(h: f64) -> f64 {
    let (h_b, t_b, lapse, p_b) = layer_for(h);
    if lapse.abs() < 1e-12 {
        p_b * (-G0 * M0 * (h - h_b) / (R_STAR * t_b)).exp()
    } else {
        let t = t_b + lapse * (h - h_b);
        p_b * (t_b / t).powf(G0 * M0 / (R_STAR * lapse))
    }
}

/// Temperature at geometric altitude `z`, Kelvin.
pub fn temperature(z: f64) -> f64 {
    let z = clamp_altitude(z);
    if z < 86_000.0 {
        temperature_below_86km(geopotential_height(z)) * molecular_weight_ratio(z)
    } else if z < 91_000.0 {
        // Mesopause plateau, isothermal at the arc's own z = 91 km value.
        MESOPAUSE_REFERENCE_T
    } else if z < 110_000.0 {
        let dz_km = (z - 91_000.0) / 1000.0;
        let inner = (1.0 - (dz_km / ARC_A_KM).powi(2)).max(0.0);
        ARC_T_C + ARC_A * inner.sqrt()
    } else if z < 120_000.0 {
        240.0 + 0.012 * (z - 110_000.0)
    } else {
        const LAMBDA: f64 = 0.01875; // per km
        let xi_km = (z - 120_000.0) / 1000.0 * (EARTH_RADIUS + 120_000.0) / (EARTH_RADIUS + z);
        1000.0 - 640.0 * (-LAMBDA * xi_km).exp()
    }
}

/// Pressure at geometric altitude `z`, Pa.
pub fn pressure(z: f64) -> f64 {
    let z = clamp_altitude(z);
    if z < 86_000.0 {
        pressure_below_86km(geopotential_height(z))
    } else {
        let (n, _m) = instance().lookup(z);
        n * R_STAR * temperature(z) / N_A
    }
}

/// Density at geometric altitude `z`, kg/m^3.
pub fn density(z: f64) -> f64 {
    let z = clamp_altitude(z);
    let t = temperature(z);
    if t <= 0.0 {
        return 0.0;
    }
    if z < 86_000.0 {
        pressure(z) / (R_AIR * t)
    } else {
        let (_, m) = instance().lookup(z);
        pressure(z) * m / (R_STAR * t)
    }
}

/// Local gravitational acceleration, m/s^2.
pub fn gravity(z: f64) -> f64 {
    let z = clamp_altitude(z);
    G0 * (EARTH_RADIUS / (EARTH_RADIUS + z)).powi(2)
}

/// Speed of sound, m/s.
pub fn sound_speed(z: f64) -> f64 {
    let z = clamp_altitude(z);
    (GAMMA * R_AIR * temperature(z)).sqrt()
}

/// Dynamic viscosity via Sutherland's law, Pa*s.
pub fn dynamic_viscosity(z: f64) -> f64 {
    let t = temperature(clamp_altitude(z));
    SUTHERLAND_BETA * t.powf(1.5) / (t + SUTHERLAND_S)
}

/// Kinematic viscosity, m^2/s.
pub fn kinematic_viscosity(z: f64) -> f64 {
    let rho = density(z);
    if rho <= 0.0 {
        return 0.0;
    }
    dynamic_viscosity(z) / rho
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sea_level_standard_values() {
        assert_relative_eq!(temperature(0.0), 288.15, epsilon = 0.01);
        assert_relative_eq!(pressure(0.0), 101_325.0, epsilon = 1.0);
        assert_relative_eq!(density(0.0), 1.225, max_relative = 1e-3);
        assert_relative_eq!(sound_speed(0.0), 340.29, epsilon = 0.1);
        assert_relative_eq!(gravity(0.0), 9.80665, epsilon = 1e-9);
    }

    #[test]
    fn tropopause_11km() {
        assert_relative_eq!(temperature(11_000.0), 216.65, epsilon = 0.5);
        assert_relative_eq!(pressure(11_000.0), 22_632.0, epsilon = 100.0);
    }

    #[test]
    fn pressure_is_monotonically_non_increasing() {
        let mut last = pressure(-5_000.0);
        for z_km in (0..=200).step_by(5) {
            let p = pressure(z_km as f64 * 1000.0);
            assert!(p <= last + 1e-6, "pressure increased at {z_km} km");
            last = p;
        }
    }

    #[test]
    fn temperature_continuous_across_boundaries() {
        for &b in &[11_000.0, 20_000.0, 32_000.0, 47_000.0, 51_000.0, 71_000.0, 86_000.0, 91_000.0, 110_000.0, 120_000.0] {
            let below = temperature(b - 1.0);
            let above = temperature(b + 1.0);
            assert!((below - above).abs() < 1.0, "discontinuity at {b}: {below} vs {above}");
        }
    }

    #[test]
    fn mesopause_plateau_matches_arc_edge_value() {
        assert_relative_eq!(temperature(88_000.0), MESOPAUSE_REFERENCE_T, epsilon = 1e-9);
        assert_relative_eq!(temperature(91_000.0), MESOPAUSE_REFERENCE_T, epsilon = 1e-6);
    }

    #[test]
    fn negative_altitude_clamps_to_sea_level() {
        assert_relative_eq!(temperature(-10_000.0), temperature(MIN_ALT), epsilon = 1e-9);
    }

    #[test]
    fn near_vacuum_above_86km() {
        assert!(density(500_000.0) < density(86_000.0));
        assert!(pressure(1_000_000.0) < 1e-3);
    }

    #[test]
    fn number_density_decreases_with_altitude_above_86km() {
        let (n_low, _) = instance().lookup(86_000.0);
        let (n_mid, _) = instance().lookup(200_000.0);
        let (n_high, _) = instance().lookup(900_000.0);
        assert!(n_low > n_mid);
        assert!(n_mid > n_high);
    }

    #[test]
    fn molar_mass_drops_toward_hydrogen_at_the_top() {
        let (_, m_low) = instance().lookup(86_000.0);
        let (_, m_high) = instance().lookup(1_000_000.0);
        assert!(m_low > 20.0);
        assert!(m_high < m_low);
        assert!(m_high < 10.0);
    }
}
