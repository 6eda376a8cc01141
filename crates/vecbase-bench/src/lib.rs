//! Workload builders shared by the vecbase benchmarks and examples.
//!
//! - [`filled_growvec`]: a growable vector holding seeded random keys
//! - [`sorted_growvec`]: the same keys, binary-inserted
//! - [`iota_vector`]: a fixed vector holding `0..n`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use vecbase::{GrowVec, Vector, VectorError, VectorOptions};
use vecbase_test_utils::fixtures::{random_i32s, shuffled_keys};

/// Default workload size for the benchmarks.
pub const WORKLOAD_LEN: usize = 10_000;

/// A growable vector of `len` seeded random values, appended in one call.
pub fn filled_growvec(seed: u64, len: usize) -> Result<GrowVec<i32>, VectorError> {
    let mut v = GrowVec::new()?;
    v.extend_from_slice(&random_i32s(seed, len, -1_000_000..1_000_000))?;
    Ok(v)
}

/// A growable vector built by binary-inserting `len` shuffled keys.
pub fn sorted_growvec(seed: u64, len: u32) -> Result<GrowVec<u32>, VectorError> {
    let mut v = GrowVec::new()?;
    for key in shuffled_keys(seed, len) {
        v.binary_insert(key, Ord::cmp)?;
    }
    Ok(v)
}

/// A fixed vector of exactly `len` slots holding `0..len`.
pub fn iota_vector(len: usize) -> Result<Vector<u64>, VectorError> {
    let mut v = Vector::with_options(VectorOptions::new().with_capacity(len))?;
    for (slot, value) in v.as_mut_slice().iter_mut().zip(0u64..) {
        *slot = value;
    }
    Ok(v)
}
