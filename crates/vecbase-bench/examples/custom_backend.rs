//! Over-aligned storage through a custom backend, plus a small stack built
//! on the extension header.
//!
//! Demonstrates: implement `Backend` → inject it through `VectorOptions` →
//! check the block alignment → keep container metadata in the header.

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use vecbase::{Backend, GrowVec, VectorError, VectorOptions};

/// Every block is aligned to at least `alignment` bytes.
#[derive(Clone, Copy, Debug)]
struct Aligned {
    alignment: usize,
}

impl Aligned {
    fn layout(&self, size: usize, align: usize) -> Option<Layout> {
        Layout::from_size_align(size, align.max(self.alignment)).ok()
    }
}

// SAFETY: blocks come from `std::alloc` with a layout at least as aligned as
// requested; reallocation copies the preserved prefix before freeing.
unsafe impl Backend for Aligned {
    unsafe fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        let layout = self.layout(layout.size(), layout.align())?;
        // SAFETY: non-zero size per the caller contract.
        NonNull::new(unsafe { alloc::alloc(layout) })
    }

    unsafe fn reallocate(
        &mut self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if new_size == old.size() {
            return Some(ptr);
        }
        let layout = Layout::from_size_align(new_size, old.align()).ok()?;
        // SAFETY: `new_size` is non-zero per the caller contract.
        let new = unsafe { self.allocate(layout) }?;
        // SAFETY: both blocks are live, distinct and at least this long.
        unsafe {
            ptr::copy_nonoverlapping(ptr.as_ptr(), new.as_ptr(), old.size().min(new_size));
            self.deallocate(ptr, old);
        }
        Some(new)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        if let Some(layout) = self.layout(layout.size(), layout.align()) {
            // SAFETY: allocated by `allocate` with this widened layout.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

const PAGE: usize = 4096;

/// A stack that counts its pushes in the first 8 header bytes.
struct CountingStack {
    items: GrowVec<u32, Aligned>,
}

impl CountingStack {
    fn new() -> Result<Self, VectorError> {
        let options = VectorOptions::new()
            .with_capacity(4)
            .with_ext_header(8)
            .with_backend(Aligned { alignment: PAGE });
        Ok(Self {
            items: GrowVec::with_options(options)?,
        })
    }

    fn pushes(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.items.ext_header());
        u64::from_le_bytes(bytes)
    }

    fn push(&mut self, value: u32) -> Result<(), VectorError> {
        self.items.push(value)?;
        let pushes = self.pushes() + 1;
        self.items
            .ext_header_mut()
            .copy_from_slice(&pushes.to_le_bytes());
        Ok(())
    }

    fn pop(&mut self) -> Result<Option<u32>, VectorError> {
        self.items.pop()
    }
}

fn main() -> Result<(), VectorError> {
    println!("=== vecbase custom backend example ===\n");

    let mut stack = CountingStack::new()?;
    for i in 0..100 {
        stack.push(i * i)?;
        let block = stack.items.as_slice().as_ptr() as usize - stack.items.ext_header_size();
        assert_eq!(block % PAGE, 0, "block must stay page aligned");
    }
    println!(
        "pushed {} values, capacity {} ({} bytes)",
        stack.pushes(),
        stack.items.capacity(),
        stack.items.capacity_bytes()
    );

    let mut popped = 0;
    while let Some(value) = stack.pop()? {
        popped += 1;
        if popped <= 3 {
            println!("  popped {value}");
        }
    }
    println!(
        "popped {popped} values, capacity back to {} (initial {})",
        stack.items.capacity(),
        stack.items.initial_capacity()
    );
    println!("header still records {} pushes", stack.pushes());
    Ok(())
}
