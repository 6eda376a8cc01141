//! Core types for the vecbase growable array engine.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! element model, the byte layout of a vector block, the capacity growth
//! policy, and the error types shared by the rest of the workspace.
//!
//! # Block layout
//!
//! ```text
//! ┌──────────────────┬──────────────────┬─────────┬───────────┬───────────┬───
//! │ allocator param  │ extension header │ padding │ element 0 │ element 1 │ …
//! └──────────────────┴──────────────────┴─────────┴───────────┴───────────┴───
//!                                                 ▲
//!                                                 └── data offset, aligned to T
//! ```
//!
//! The control data (capacity, size, backend) lives in the owning handle,
//! not in the block, so the block is exactly the regions above.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod layout;
pub mod policy;

pub use element::{cmp_lex_asc, cmp_lex_dsc, Element};
pub use error::{Operation, PolicyError, VectorError};
pub use layout::{aligned_size, compute_alloc_size, BlockLayout};
pub use policy::GrowthPolicy;
