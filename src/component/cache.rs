use std::cell::RefCell;
use std::collections::HashMap;

/// Rounds a flight-state key the way every aero node's cache does: Mach to
/// 0.01, angle of attack to 0.1 degree, specific-heat ratio to 1. Identical
/// rounded keys must return bit-identical cached values for the cache's
/// lifetime.
pub fn round_key(mach: f64, alpha_rad: f64, gamma: f64) -> (i64, i64, i64) {
    (
        (mach * 100.0).round() as i64,
        (alpha_rad.to_degrees() * 10.0).round() as i64,
        gamma.round() as i64,
    )
}

pub fn round_damp_key(x_cm: f64, omega: f64, v: f64) -> (i64, i64, i64) {
    (
        (x_cm * 1000.0).round() as i64,
        (omega * 1000.0).round() as i64,
        (v * 100.0).round() as i64,
    )
}

/// A single memoized scalar/vector cache, epoch-stamped so a mutation
/// anywhere in the owning tree invalidates every entry without needing a
/// back-pointer to walk up and clear ancestors individually.
#[derive(Debug, Default)]
pub struct EpochCache<K: std::hash::Hash + Eq + Copy, V: Copy> {
    entries: RefCell<HashMap<K, (u64, V)>>,
}

impl<K: std::hash::Hash + Eq + Copy, V: Copy> EpochCache<K, V> {
    pub fn get_or_insert_with(&self, key: K, epoch: u64, f: impl FnOnce() -> V) -> V {
        if let Some((e, v)) = self.entries.borrow().get(&key) {
            if *e == epoch {
                return *v;
            }
        }
        let v = f();
        self.entries.borrow_mut().insert(key, (epoch, v));
        v
    }
}

#[derive(Debug, Default)]
pub struct AeroCache {
    pub c_n_alpha: EpochCache<(i64, i64, i64), f64>,
    pub c_m_alpha: EpochCache<(i64, i64, i64), f64>,
    pub cp: EpochCache<(i64, i64, i64), f64>,
    pub c_m_damp: EpochCache<(i64, i64, i64), f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn repeated_lookup_with_same_key_and_epoch_is_stable() {
        let cache: EpochCache<(i64, i64, i64), f64> = EpochCache::default();
        let calls = Cell::new(0);
        let key = round_key(0.5, 0.01, 1.4);
        let a = cache.get_or_insert_with(key, 0, || {
            calls.set(calls.get() + 1);
            42.0
        });
        let b = cache.get_or_insert_with(key, 0, || {
            calls.set(calls.get() + 1);
            99.0
        });
        assert_eq!(a, b);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn epoch_bump_forces_recompute() {
        let cache: EpochCache<(i64, i64, i64), f64> = EpochCache::default();
        let key = round_key(0.5, 0.01, 1.4);
        let a = cache.get_or_insert_with(key, 0, || 1.0);
        let b = cache.get_or_insert_with(key, 1, || 2.0);
        assert_eq!(a, 1.0);
        assert_eq!(b, 2.0);
    }
}
