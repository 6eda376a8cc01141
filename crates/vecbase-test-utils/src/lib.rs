//! Test utilities for vecbase development.
//!
//! - [`CountingBackend`] wraps [`Global`](vecbase_alloc::Global) and counts
//!   every backend call, so tests can assert how many physical
//!   reallocations a logical operation performed. Built with
//!   `refusing_shrinks`, it also fails every shrinking reallocation.
//! - [`fixtures`] holds the shared sample data sets and seeded random
//!   workloads.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod counting;
pub mod fixtures;

pub use counting::{AllocStats, CountingBackend};
