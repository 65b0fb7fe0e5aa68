//! Seeded pseudo-random number generation.
//!
//! Every subject derives its random stream from an identity string, so
//! reconnecting with the same identity reproduces the same trajectory.
//! The generator is a mulberry32 stream seeded by an FNV-1a hash of the
//! identity; it is deterministic and fast, and explicitly not
//! cryptographically secure.

/// Hash an identity string to a 32-bit seed using FNV-1a.
///
/// Pure and total: equal strings always produce equal seeds, and the
/// empty string hashes to the FNV offset basis.
#[must_use]
pub fn seed_from_identity(identity: &str) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for byte in identity.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

/// A mulberry32 random stream.
///
/// Produces an infinite, non-restartable sequence of `f64` values in
/// `[0, 1)`. Two streams built from the same seed yield bit-identical
/// sequences; all arithmetic is wrapping 32-bit, so the sequence is
/// stable across platforms.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a stream from a raw 32-bit seed.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Create a stream seeded from an identity string.
    #[must_use]
    pub fn from_identity(identity: &str) -> Self {
        Self::new(seed_from_identity(identity))
    }

    /// Draw the next value in `[0, 1)`, advancing the stream.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        f64::from(r ^ (r >> 14)) / 4_294_967_296.0
    }
}

/// Advance `value` by one bounded random-walk step.
///
/// Draws exactly one value from `rng`; the delta is uniform in
/// `[-step, +step]` and the result is clamped to `[min, max]`. The clamp
/// applies even when `value` starts outside the bounds, so a walk can
/// never produce an out-of-range metric.
pub fn random_walk(value: f64, rng: &mut SeededRng, step: f64, min: f64, max: f64) -> f64 {
    let delta = (rng.next_f64() - 0.5) * 2.0 * step;
    (value + delta).clamp(min, max)
}
