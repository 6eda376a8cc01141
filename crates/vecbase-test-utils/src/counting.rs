//! A backend that counts its calls and can refuse shrinking reallocations.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

use vecbase_alloc::{Backend, Global};

/// Call counters shared by a [`CountingBackend`] and all of its clones.
#[derive(Debug, Default)]
pub struct AllocStats {
    allocations: Cell<usize>,
    reallocations: Cell<usize>,
    deallocations: Cell<usize>,
    refusals: Cell<usize>,
    live_bytes: Cell<usize>,
}

impl AllocStats {
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations.get()
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations.get()
    }

    /// Shrinking reallocations refused by a
    /// [`refusing_shrinks`](CountingBackend::refusing_shrinks) backend.
    pub fn refusals(&self) -> usize {
        self.refusals.get()
    }

    /// Bytes currently held by blocks from any clone of the backend.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    /// Allocations plus reallocations: every call that may move a block.
    pub fn resizes(&self) -> usize {
        self.allocations() + self.reallocations()
    }
}

fn bump(cell: &Cell<usize>) {
    cell.set(cell.get() + 1);
}

/// [`Global`] with shared call counters.
///
/// Keep a clone before moving the backend into a vector; the clone
/// observes the same [`AllocStats`].
#[derive(Clone, Debug, Default)]
pub struct CountingBackend {
    stats: Rc<AllocStats>,
    refuse_shrinks: bool,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `reallocate` fails whenever the block would get
    /// smaller. Growth and fresh allocations still succeed.
    pub fn refusing_shrinks() -> Self {
        Self {
            refuse_shrinks: true,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> &AllocStats {
        &self.stats
    }
}

// SAFETY: every call is forwarded unchanged to `Global`; a refused
// reallocation returns `None` before touching the block.
unsafe impl Backend for CountingBackend {
    unsafe fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        // SAFETY: forwarded caller contract.
        let ptr = unsafe { Global.allocate(layout) }?;
        bump(&self.stats.allocations);
        self.stats
            .live_bytes
            .set(self.stats.live_bytes() + layout.size());
        Some(ptr)
    }

    unsafe fn reallocate(
        &mut self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if self.refuse_shrinks && new_size < old.size() {
            bump(&self.stats.refusals);
            return None;
        }
        // SAFETY: forwarded caller contract.
        let ptr = unsafe { Global.reallocate(ptr, old, new_size) }?;
        bump(&self.stats.reallocations);
        self.stats
            .live_bytes
            .set(self.stats.live_bytes() - old.size() + new_size);
        Some(ptr)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { Global.deallocate(ptr, layout) };
        bump(&self.stats.deallocations);
        self.stats
            .live_bytes
            .set(self.stats.live_bytes() - layout.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecbase_alloc::RawBlock;

    #[test]
    fn clones_share_counters() {
        let backend = CountingBackend::new();
        let probe = backend.clone();
        {
            let mut block = RawBlock::<u32, _>::allocate(4, 0, &[], backend).unwrap();
            assert_eq!(probe.stats().allocations(), 1);
            assert_eq!(probe.stats().live_bytes(), 16);
            block.resize(8).unwrap();
            assert_eq!(probe.stats().reallocations(), 1);
            assert_eq!(probe.stats().live_bytes(), 32);
        }
        assert_eq!(probe.stats().deallocations(), 1);
        assert_eq!(probe.stats().live_bytes(), 0);
    }

    #[test]
    fn refusing_backend_only_blocks_shrinks() {
        let backend = CountingBackend::refusing_shrinks();
        let probe = backend.clone();
        let mut block = RawBlock::<u32, _>::allocate(4, 0, &[], backend).unwrap();
        block.resize(8).unwrap();
        assert!(block.resize(2).is_err());
        assert_eq!(block.capacity(), 8);
        assert_eq!(probe.stats().refusals(), 1);
        assert_eq!(probe.stats().live_bytes(), 32);
    }
}
