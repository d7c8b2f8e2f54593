// src/rng.rs
//! Random Number Generation for Reproducible Trajectories
//!
//! # Design Philosophy
//!
//! A trajectory is only as reproducible as its noise stream:
//! 1. **Reproducibility**: Same seed → same draws, bit for bit, across runs
//! 2. **Isolation**: Each run owns its generator; there is no global state
//! 3. **Stable draw convention**: One symmetric draw per step, in step order
//!
//! # Mersenne Twister (MT19937)
//!
//! The canonical generator is the 32-bit Mersenne Twister with array seeding
//! (`init_by_array`). A `u64` seed is split into little-endian 32-bit words
//! (the seed `0` becomes the single word `[0]`), matching the common
//! array-seeded MT19937 streams bit for bit.
//!
//! # 53-bit Unit Draw
//!
//! ```text
//! a = next_u32() >> 5          (27 bits)
//! b = next_u32() >> 6          (26 bits)
//! U = (a * 2^26 + b) / 2^53    U ∈ [0, 1)
//! u = -1 + 2U                  u ∈ [-1, 1)
//! ```

use rand::RngCore;

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// 32-bit Mersenne Twister with array seeding
///
/// # Thread Safety
///
/// Every run constructs its own instance from the configured seed. Nothing is
/// shared between instances, so independent runs never perturb each other.
#[derive(Clone)]
pub struct Mt19937 {
    state: [u32; N],
    index: usize,
}

impl std::fmt::Debug for Mt19937 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt19937")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Mt19937 {
    /// Seed from a 64-bit value via `init_by_array`
    pub fn new(seed: u64) -> Self {
        let low = seed as u32;
        let high = (seed >> 32) as u32;
        if high == 0 {
            Self::new_with_key(&[low])
        } else {
            Self::new_with_key(&[low, high])
        }
    }

    /// Seed from an explicit key of 32-bit words
    pub fn new_with_key(key: &[u32]) -> Self {
        let key: &[u32] = if key.is_empty() { &[0] } else { key };
        let mut rng = Self::new_unkeyed(19_650_218);
        let mt = &mut rng.state;

        let mut i = 1usize;
        let mut j = 0usize;
        for _ in 0..N.max(key.len()) {
            let prev = mt[i - 1] ^ (mt[i - 1] >> 30);
            mt[i] = (mt[i] ^ prev.wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..N - 1 {
            let prev = mt[i - 1] ^ (mt[i - 1] >> 30);
            mt[i] = (mt[i] ^ prev.wrapping_mul(1_566_083_941)).wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
        }
        mt[0] = UPPER_MASK;

        rng
    }

    fn new_unkeyed(seed: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = seed;
        for i in 1..N {
            let prev = state[i - 1] ^ (state[i - 1] >> 30);
            state[i] = 1_812_433_253u32.wrapping_mul(prev).wrapping_add(i as u32);
        }
        Self { state, index: N }
    }

    fn twist(&mut self) {
        for k in 0..N {
            let y = (self.state[k] & UPPER_MASK) | (self.state[(k + 1) % N] & LOWER_MASK);
            let mag = if y & 1 == 1 { MATRIX_A } else { 0 };
            self.state[k] = self.state[(k + M) % N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }

    fn next_word(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }
}

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_word());
        let high = u64::from(self.next_word());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Create the canonical generator for a run
pub fn seed_rng_from_u64(seed: u64) -> Mt19937 {
    Mt19937::new(seed)
}

/// Uniform draw in `[0, 1)` with 53 bits of precision
///
/// Consumes exactly two 32-bit outputs.
pub fn unit_draw<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    let a = (rng.next_u32() >> 5) as f64;
    let b = (rng.next_u32() >> 6) as f64;
    (a * 67_108_864.0 + b) * (1.0 / 9_007_199_254_740_992.0)
}

/// Uniform draw in `[-1, 1)`
pub fn symmetric_draw<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    -1.0 + 2.0 * unit_draw(rng)
}
