//! vecbase: a generic growable array engine.
//!
//! One contiguous block holds a run of fixed-size elements, optionally
//! preceded by an allocator parameter region and an extension header that
//! containers built on top (stacks, deques, sorted sets) can use for their
//! own metadata. The block comes from a pluggable [`Backend`] owned by the
//! vector.
//!
//! Two variants share the same block:
//!
//! - [`Vector`]: fixed content. Every slot up to the capacity is an
//!   element; the capacity changes only on request.
//! - [`GrowVec`]: a size plus a [`GrowthPolicy`] that grows before
//!   insertions and shrinks after removals, with one resize at most per
//!   operation.
//!
//! # Quick start
//!
//! ```rust
//! use vecbase::{ErrorHandler, GrowVec, VectorOptions};
//!
//! let options = VectorOptions::new()
//!     .with_capacity(4)
//!     .with_ext_header(8)
//!     .with_error_handler(ErrorHandler::new(|e| eprintln!("{e}")));
//! let mut v = GrowVec::<u32>::with_options(options)?;
//!
//! v.extend_from_slice(&[1, 4, 5])?;
//! assert_eq!(v.binary_insert(3, Ord::cmp)?, 1);
//! v.ext_header_mut()[0] = 1;
//! v.reverse()?;
//! assert_eq!(v.as_slice(), &[5, 4, 3, 1]);
//! # Ok::<(), vecbase::VectorError>(())
//! ```
//!
//! # Crates
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vecbase-core` | Element model, block layout, growth policy, errors |
//! | [`backend`] | `vecbase-alloc` | Backends, error handlers, raw blocks |
//! | [`algo`] | `vecbase-algo` | Slice-level search and range algorithms |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod growable;
pub mod options;
pub mod vector;

/// Element model, layout math and growth policy (`vecbase-core`).
pub use vecbase_core as types;

/// Allocation backends and raw blocks (`vecbase-alloc`).
pub use vecbase_alloc as backend;

/// Slice-level search and range algorithms (`vecbase-algo`).
pub use vecbase_algo as algo;

pub use growable::GrowVec;
pub use options::VectorOptions;
pub use vector::Vector;

pub use vecbase_alloc::{Backend, Budget, ErrorHandler, Global};
pub use vecbase_core::{
    cmp_lex_asc, cmp_lex_dsc, Element, GrowthPolicy, Operation, PolicyError, VectorError,
};
