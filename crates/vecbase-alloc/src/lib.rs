//! Allocation backends and raw block storage for vecbase.
//!
//! This is the only crate in the workspace that contains `unsafe` code. It
//! is confined to two modules:
//!
//! - `backend`: the [`Backend`] trait and the [`Global`] / [`Budget`]
//!   implementations that call into `std::alloc`.
//! - `raw`: [`RawBlock`], which owns one block, keeps it zero-initialised,
//!   and hands out typed slices over its regions.
//!
//! # Architecture
//!
//! ```text
//! RawBlock<T, B>
//! ├── BlockLayout   (region sizes, capacity, data offset)
//! ├── NonNull<u8>   (the block, or dangling when it has zero bytes)
//! └── B: Backend    (owned per instance; allocate / reallocate / deallocate)
//! ```
//!
//! Allocation failures surface as [`VectorError`](vecbase_core::VectorError)
//! values. What happens next is decided by an [`ErrorHandler`]: the default
//! one prints a diagnostic and aborts, a custom one can record the failure
//! and let the caller continue with its still-valid handle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod backend;
pub mod handler;
pub mod raw;

pub use backend::{Backend, Budget, Global};
pub use handler::ErrorHandler;
pub use raw::RawBlock;
