// Seeded, portable pseudo-random number generator for the pipes simulation.
//
// xoshiro256++ (Blackman & Vigna) with the 256-bit state expanded from a
// single `u64` by SplitMix64. No external RNG crate is involved, so a given
// seed produces the same pipe layout on every platform and toolchain.
//
// The sim only ever needs three kinds of draws: a uniform integer below a
// bound (random start cells), a uniform pick from a short slice (candidate
// directions, material palette), and raw `u64`s. Everything else is left
// out on purpose.
//
// **Critical constraint: determinism.** No floating point, no OS entropy,
// no global state. Two `PipeRng`s with the same seed and the same call
// sequence must agree forever.

use serde::{Deserialize, Serialize};

/// xoshiro256++ generator. Owned by the growth session; every random
/// decision in a run is drawn from one instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeRng {
    s: [u64; 4],
}

impl PipeRng {
    /// Seed a new generator. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        let mut s = [0u64; 4];
        for word in &mut s {
            *word = splitmix64(&mut sm);
        }
        Self { s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = self.s;
        let out = s0.wrapping_add(s3).rotate_left(23).wrapping_add(s0);

        let t = s1 << 17;
        let s2 = s2 ^ s0;
        let s3 = s3 ^ s1;
        let s1 = s1 ^ s2;
        let s0 = s0 ^ s3;
        self.s = [s0, s1, s2 ^ t, s3.rotate_left(45)];

        out
    }

    /// Upper half of the next `u64`.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform integer in `[0, bound)`, without modulo bias.
    ///
    /// Panics if `bound == 0`.
    pub fn below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "below: bound must be nonzero");
        if bound.is_power_of_two() {
            return self.next_u64() & (bound - 1);
        }
        // Reject the short tail of the u64 range that would favour low values.
        let zone = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u64();
            if r >= zone {
                return r % bound;
            }
        }
    }

    /// Uniform `u32` in `[0, bound)`. Panics if `bound == 0`.
    pub fn below_u32(&mut self, bound: u32) -> u32 {
        self.below(bound as u64) as u32
    }

    /// Uniform index into a collection of length `len`. Panics if `len == 0`.
    pub fn index(&mut self, len: usize) -> usize {
        self.below(len as u64) as usize
    }

    /// Uniform pick from a slice, `None` when it is empty. Consumes no
    /// randomness for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
