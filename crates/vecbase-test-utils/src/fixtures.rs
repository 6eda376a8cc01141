//! Shared sample data and seeded random workloads.
//!
//! All random data comes from a `ChaCha8Rng` seeded by the caller, so a
//! failing test or benchmark input can be reproduced from its seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// Ten sorted, distinct keys with negative, zero and positive values.
pub const SORTED_SAMPLE: [i32; 10] = [-100, -1, 0, 10, 12, 20, 21, 30, 34, 60];

/// Binary-insert input whose sorted result contains one duplicate (`2`).
pub const INSERT_SEQUENCE: [i32; 11] = [9, 6, 2, 0, 5, 4, 7, 3, 1, 8, 2];

/// Fixed-width byte-string keys in lexicographic order.
pub const LEX_WORDS: [[u8; 3]; 5] = [*b"aaa", *b"abc", *b"abd", *b"acz", *b"xyz"];

/// A record type with a sub-field worth gathering.
///
/// `#[repr(C)]` without padding, so it is a valid element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable)]
#[repr(C)]
pub struct Particle {
    pub id: u32,
    pub x: i32,
    pub y: i32,
}

/// `len` particles with ids `0..len` and deterministic coordinates.
pub fn particles(len: u32) -> Vec<Particle> {
    (0..len)
        .map(|id| Particle {
            id,
            x: id as i32 * 3 - 7,
            y: -(id as i32),
        })
        .collect()
}

/// `len` values drawn uniformly from `range`.
pub fn random_i32s(seed: u64, len: usize, range: std::ops::Range<i32>) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(range.clone())).collect()
}

/// The keys `0..len` in a seeded random order.
pub fn shuffled_keys(seed: u64, len: u32) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keys: Vec<u32> = (0..len).collect();
    keys.shuffle(&mut rng);
    keys
}

/// One step of a random push/pop workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Push(u32),
    Pop,
    Insert { index_seed: u32, value: u32 },
    Remove { index_seed: u32 },
}

/// A seeded workload of `len` operations, biased toward pushes by
/// `push_bias` in `[0, 1]`.
pub fn random_ops(seed: u64, len: usize, push_bias: f64) -> Vec<Op> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let grow = rng.random_bool(push_bias);
            match (grow, rng.random_bool(0.5)) {
                (true, true) => Op::Push(rng.random()),
                (true, false) => Op::Insert {
                    index_seed: rng.random(),
                    value: rng.random(),
                },
                (false, true) => Op::Pop,
                (false, false) => Op::Remove {
                    index_seed: rng.random(),
                },
            }
        })
        .collect()
}
