//! Randomness port: Trait for the uniform draws behind every stochastic step.
//!
//! Scoring noise, ECG synthesis and the per-model ECG boost all consume
//! values from an injected source, so production code can use a CSPRNG and
//! tests can script the exact sequence.

/// Source of uniform random values in `[0, 1)`.
///
/// The engine never synchronizes access itself. Share a source between
/// threads only behind a lock, or give each call its own instance.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Integer in `[lo, hi]` drawn as `lo + round(u * (hi - lo))`.
    fn int_between(&mut self, lo: u32, hi: u32) -> u32 {
        let span = f64::from(hi.saturating_sub(lo));
        lo + (self.next_unit() * span).round() as u32
    }

    /// Symmetric noise in `[-half_width, half_width)`.
    fn symmetric(&mut self, half_width: f64) -> f64 {
        (self.next_unit() * 2.0 - 1.0) * half_width
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}
