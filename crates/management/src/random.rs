//! Seeded pseudo-random stream used for fixtures and simulated runtime variance.
//!
//! Every value is fully determined by the seed and the number of prior calls,
//! so regenerating fixtures from the same seed reproduces the same document.

use rand::{RngCore, SeedableRng};

const INCREMENT: u32 = 0x6D2B_79F5;
const SCALE: f64 = 4_294_967_296.0;

/// Restartable 32-bit stream (mulberry32 mixer) producing floats in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SeededStream {
    seed: u32,
    state: u32,
}

impl SeededStream {
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Rewind to the first value of the sequence.
    pub fn restart(&mut self) {
        self.state = self.seed;
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / SCALE
    }

    /// `round(base + next * spread)`, the shape most fixture fields take.
    pub fn round_between(&mut self, base: f64, spread: f64) -> u64 {
        (base + self.next_f64() * spread).round() as u64
    }

    /// Pick one element uniformly using the next value of the stream.
    pub fn pick_one<'a, T>(&mut self, values: &'a [T]) -> Option<&'a T> {
        if values.is_empty() {
            return None;
        }
        let index = (self.next_f64() * values.len() as f64).floor() as usize;
        values.get(index.min(values.len() - 1))
    }
}

impl RngCore for SeededStream {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let value = self.state;
        let mut t = (value ^ (value >> 15)).wrapping_mul(1 | value);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let low = self.next_u32() as u64;
        let high = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededStream {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Round to two decimal places, as every bid/ctr/cost figure is stored.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_known_sequence_for_seed() {
        let mut stream = SeededStream::new(42);
        assert_eq!(stream.next_u32(), 2_581_720_956);
        assert_eq!(stream.next_u32(), 1_925_393_290);
        assert_eq!(stream.next_u32(), 3_661_312_704);

        let mut runtime = SeededStream::new(2025);
        assert_eq!(runtime.next_u32(), 1_827_426_074);
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut stream = SeededStream::new(7);
        for _ in 0..10_000 {
            let v = stream.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_restart_replays_sequence() {
        let mut stream = SeededStream::new(99);
        let first: Vec<f64> = (0..5).map(|_| stream.next_f64()).collect();
        stream.restart();
        let second: Vec<f64> = (0..5).map(|_| stream.next_f64()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_independent_streams_do_not_share_state() {
        let mut a = SeededStream::new(42);
        let mut b = SeededStream::new(42);
        let mut other = SeededStream::new(2025);
        for _ in 0..50 {
            other.next_f64();
        }
        assert_eq!(a.next_f64(), b.next_f64());
    }

    #[test]
    fn test_pick_one_uses_next_value() {
        let values = ["a", "b", "c", "d"];
        let mut stream = SeededStream::new(42);
        let mut probe = SeededStream::new(42);
        let expected = (probe.next_f64() * 4.0).floor() as usize;
        assert_eq!(stream.pick_one(&values), Some(&values[expected]));

        let empty: [u8; 0] = [];
        assert_eq!(stream.pick_one(&empty), None);
    }

    #[test]
    fn test_usable_as_rand_rng() {
        let mut stream = SeededStream::from_seed(42u32.to_le_bytes());
        let mut plain = SeededStream::new(42);
        let drawn: u32 = stream.gen();
        assert_eq!(drawn, plain.next_u32());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.2000000000000002), 2.2);
        assert_eq!(round2(19.999), 20.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
