//! Pluggable allocation backends.
//!
//! A [`Backend`] is injected into every vector at construction and owned by
//! it, so any per-instance state (an alignment, a budget, statistics) lives
//! in the backend value itself. There is no global override: a vector
//! without an explicit backend uses [`Global`].

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Low-level allocate / reallocate / deallocate operations.
///
/// # Safety
///
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`. `reallocate`
/// must preserve the first `min(old.size(), new_size)` bytes and may return
/// a different address; the old address is invalid once it returns `Some`.
/// A `None` result leaves the original block untouched and still owned by
/// the caller.
pub unsafe trait Backend {
    /// Allocate a block for `layout`.
    ///
    /// # Safety
    ///
    /// `layout.size()` must be non-zero.
    unsafe fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>>;

    /// Resize a block previously obtained from this backend.
    ///
    /// # Safety
    ///
    /// `ptr` must have been allocated by this backend with layout `old`,
    /// `new_size` must be non-zero, and `new_size` rounded up to
    /// `old.align()` must not exceed `isize::MAX`.
    unsafe fn reallocate(
        &mut self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// Release a block previously obtained from this backend.
    ///
    /// # Safety
    ///
    /// `ptr` must have been allocated by this backend with `layout` and not
    /// released since.
    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout);
}

/// The host's general-purpose allocator (`std::alloc`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

// SAFETY: forwards to the global allocator, which upholds the contract.
unsafe impl Backend for Global {
    unsafe fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        // SAFETY: caller guarantees a non-zero size.
        NonNull::new(unsafe { alloc::alloc(layout) })
    }

    unsafe fn reallocate(
        &mut self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: caller guarantees `ptr` came from `alloc` with `old` and
        // that `new_size` is a valid non-zero size for `old.align()`.
        NonNull::new(unsafe { alloc::realloc(ptr.as_ptr(), old, new_size) })
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `ptr` is live and was allocated with `layout`.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// A backend that refuses to hold more than `limit` bytes at once.
///
/// Wraps another backend and tracks the bytes it currently has
/// outstanding. Requests that would exceed the limit fail without
/// touching the inner backend. Cloning copies the ledger, bytes already
/// outstanding included; a vector clone then allocates against that copy.
#[derive(Clone, Debug)]
pub struct Budget<B = Global> {
    inner: B,
    limit: usize,
    in_use: usize,
}

impl Budget<Global> {
    /// A budget of `limit` bytes over the global allocator.
    pub fn new(limit: usize) -> Self {
        Self::with_backend(limit, Global)
    }
}

impl<B: Backend> Budget<B> {
    /// A budget of `limit` bytes over `inner`.
    pub fn with_backend(limit: usize, inner: B) -> Self {
        Self {
            inner,
            limit,
            in_use: 0,
        }
    }

    /// Maximum number of bytes outstanding at once.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes currently allocated through this budget.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.limit - self.in_use
    }
}

// SAFETY: every successful call is forwarded to `inner`, which upholds the
// contract; failures are reported before `inner` is touched.
unsafe impl<B: Backend> Backend for Budget<B> {
    unsafe fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() > self.remaining() {
            return None;
        }
        // SAFETY: forwarded caller contract.
        let ptr = unsafe { self.inner.allocate(layout) }?;
        self.in_use += layout.size();
        Some(ptr)
    }

    unsafe fn reallocate(
        &mut self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let without_old = self.in_use - old.size();
        if new_size > self.limit - without_old {
            return None;
        }
        // SAFETY: forwarded caller contract.
        let new_ptr = unsafe { self.inner.reallocate(ptr, old, new_size) }?;
        self.in_use = without_old + new_size;
        Some(new_ptr)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.deallocate(ptr, layout) };
        self.in_use -= layout.size();
    }
}
