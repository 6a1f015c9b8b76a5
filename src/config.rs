/// Integrator tolerances and run-time safety caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Relative tolerance used to form the adaptive-step acceptance bound.
    pub rtol: f64,
    /// Absolute tolerance used alongside `rtol`.
    pub atol: f64,
    /// Initial step size attempted by the integrator, in seconds.
    pub initial_step: f64,
    /// Smallest step the integrator will shrink to before giving up on a step.
    pub min_step: f64,
    /// Largest step the integrator will grow to.
    pub max_step: f64,
    /// Safety cap on total steps taken before declaring numerical divergence.
    pub max_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            rtol: 1e-3,
            atol: 1e-6,
            initial_step: 0.01,
            min_step: 1e-6,
            max_step: 0.25,
            max_steps: 1_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = SimConfig::default();
        assert_eq!(c.rtol, 1e-3);
        assert_eq!(c.atol, 1e-6);
        assert_eq!(c.max_steps, 1_000_000);
    }
}
