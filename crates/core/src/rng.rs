use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// The single stochastic stream shared by every stage of a generation run.
///
/// All randomized decisions (point jittering, culture selection, center
/// placement, expansionism) draw from this one stream in the order the
/// pipeline visits them. Reordering stage calls or iterating a collection in
/// a different order will change the output even with the same seed; stages
/// are written to always sort their working sets before drawing so that
/// results stay reproducible regardless of underlying hash-map iteration
/// order.
pub struct WorldRng {
    inner: Pcg64,
}

impl WorldRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn inner_mut(&mut self) -> &mut Pcg64 {
        &mut self.inner
    }

    /// A biased pick in `[min, max)`, weighted towards `min` by `exponent`.
    /// Used for placing culture centers near (but not always at) the top of
    /// a preference-sorted list.
    pub fn biased_index(&mut self, min: usize, max: usize, exponent: i32) -> usize {
        if max <= min {
            return min;
        }
        let span = (max - min) as f64;
        let t: f64 = self.inner.gen_range(0.0..1.0);
        let biased = t.powi(exponent);
        min + ((biased * span) as usize).min(max - min - 1)
    }
}

impl rand::RngCore for WorldRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
