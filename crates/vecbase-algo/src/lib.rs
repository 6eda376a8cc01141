//! Search and range algorithms for vecbase.
//!
//! Everything here works on plain slices of [`Element`](vecbase_core::Element)s
//! and never allocates. The vector types in `vecbase` call into these
//! functions after making sure the slice they pass has the right length,
//! including any temporary headroom that [`range::swap_ranges`] and
//! [`range::reverse`] need at its tail.
//!
//! Contract violations (out-of-range offsets, overlapping ranges where
//! disjoint ones are required, missing headroom) panic with a message
//! naming the operation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod range;
pub mod search;

pub use range::{
    copy_to, copy_within, move_within, part_copy, reverse, reverse_headroom, shift, spread, swap,
    swap_ranges,
};
pub use search::{binary_find, binary_find_index, binary_insert_position, linear_find};
