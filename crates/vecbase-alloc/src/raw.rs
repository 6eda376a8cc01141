//! Owned raw blocks.
//!
//! [`RawBlock`] owns one contiguous block obtained from a [`Backend`] and
//! exposes its three regions as slices: the allocator parameter bytes, the
//! extension header bytes, and the element slots as `&[T]`.
//!
//! Every byte of the block is zero-filled before it becomes reachable
//! (at allocation and on every growth), and `T: Element` accepts any bit
//! pattern, so viewing the whole capacity as initialised `T`s is sound.
//! Blocks of zero bytes are never requested from the backend; they use a
//! dangling, well-aligned pointer instead.
//!
//! The visible layout may be smaller than the allocation held from the
//! backend: [`RawBlock::narrow`] lowers the capacity without a backend
//! call. The allocation is always released with the layout it was
//! obtained with.

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use vecbase_core::{BlockLayout, Element, Operation, VectorError};

use crate::backend::Backend;

/// An owned, zero-initialised block of `[param][header][T; capacity]`.
pub struct RawBlock<T, B: Backend> {
    ptr: NonNull<u8>,
    layout: BlockLayout,
    /// Layout of the allocation itself; never smaller than `layout`.
    held: BlockLayout,
    backend: B,
    _marker: PhantomData<T>,
}

impl<T: Element, B: Backend> RawBlock<T, B> {
    /// Allocate a block for `capacity` elements with a `header_size`-byte
    /// extension header and a copy of `param` as the allocator parameter
    /// region.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or with `"allocation size overflow"` if
    /// the block size is not representable.
    #[track_caller]
    pub fn allocate(
        capacity: usize,
        header_size: usize,
        param: &[u8],
        mut backend: B,
    ) -> Result<Self, VectorError> {
        let layout = BlockLayout::of::<T>(capacity, header_size, param.len());
        let ptr = if layout.size() == 0 {
            Self::dangling()
        } else {
            // SAFETY: the layout has a non-zero size.
            unsafe { backend.allocate(layout.to_layout()) }.ok_or(VectorError::AllocFailed {
                operation: Operation::Create,
                requested: layout.size(),
            })?
        };
        // SAFETY: `ptr` is valid for `layout.size()` bytes (or the size is 0).
        unsafe { ptr.as_ptr().write_bytes(0, layout.size()) };

        let mut block = Self {
            ptr,
            layout,
            held: layout,
            backend,
            _marker: PhantomData,
        };
        block.param_mut().copy_from_slice(param);
        Ok(block)
    }

    fn dangling() -> NonNull<u8> {
        NonNull::<T>::dangling().cast()
    }

    /// Change the element capacity, relocating the block if the backend
    /// needs to.
    ///
    /// Bytes below the smaller of the two sizes are preserved; new element
    /// slots are zero-filled. On failure the block is unchanged.
    ///
    /// # Panics
    ///
    /// Panics with `"allocation size overflow"` if the new size is not
    /// representable.
    #[track_caller]
    pub fn resize(&mut self, capacity: usize) -> Result<(), VectorError> {
        let new = self.layout.with_capacity(capacity);
        let held_size = self.held.size();
        let new_size = new.size();

        if new_size != held_size {
            let failed = VectorError::AllocFailed {
                operation: Operation::Resize,
                requested: new_size,
            };
            let ptr = if new_size == 0 {
                // SAFETY: held_size != 0, so the block is a real allocation.
                unsafe { self.backend.deallocate(self.ptr, self.held.to_layout()) };
                Self::dangling()
            } else if held_size == 0 {
                // SAFETY: non-zero size.
                unsafe { self.backend.allocate(new.to_layout()) }.ok_or(failed)?
            } else {
                // SAFETY: the block came from this backend with the held
                // layout; `new` was validated by `BlockLayout`.
                unsafe {
                    self.backend
                        .reallocate(self.ptr, self.held.to_layout(), new_size)
                }
                .ok_or(failed)?
            };
            self.ptr = ptr;
            self.held = new;
        }

        let old_size = self.layout.size();
        if new_size > old_size {
            // SAFETY: `ptr` is valid for `new_size` bytes.
            unsafe {
                self.ptr
                    .as_ptr()
                    .add(old_size)
                    .write_bytes(0, new_size - old_size)
            };
        }
        self.layout = new;
        Ok(())
    }

    /// Lower the element capacity without calling the backend.
    ///
    /// The allocation keeps its size until the next [`resize`](Self::resize)
    /// or drop. Used when the backend refuses a shrinking reallocation.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the current capacity.
    #[track_caller]
    pub fn narrow(&mut self, capacity: usize) {
        let current = self.capacity();
        assert!(
            capacity <= current,
            "narrow: capacity {capacity} exceeds current capacity {current}"
        );
        self.layout = self.layout.with_capacity(capacity);
    }

    /// Bytes held from the backend, which may exceed the visible layout
    /// after [`narrow`](Self::narrow).
    pub fn held_size(&self) -> usize {
        self.held.size()
    }

    /// Copy the whole block, all regions included, into a new block from a
    /// clone of the backend.
    pub fn try_clone(&self) -> Result<Self, VectorError>
    where
        B: Clone,
    {
        let mut backend = self.backend.clone();
        let size = self.layout.size();
        let ptr = if size == 0 {
            Self::dangling()
        } else {
            // SAFETY: non-zero size.
            unsafe { backend.allocate(self.layout.to_layout()) }.ok_or(
                VectorError::AllocFailed {
                    operation: Operation::Clone,
                    requested: size,
                },
            )?
        };
        // SAFETY: both blocks are valid for `size` bytes and distinct.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), ptr.as_ptr(), size) };
        Ok(Self {
            ptr,
            layout: self.layout,
            held: self.layout,
            backend,
            _marker: PhantomData,
        })
    }

    /// The current layout.
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Number of element slots.
    pub fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    /// The backend that owns this block.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Address of the first byte of the block.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// All element slots.
    pub fn elements(&self) -> &[T] {
        // SAFETY: the data offset is aligned for `T`, the slots are
        // initialised (zero-filled) and any bytes are a valid `T`.
        unsafe {
            slice::from_raw_parts(
                self.ptr.as_ptr().add(self.layout.data_offset()).cast::<T>(),
                self.layout.capacity(),
            )
        }
    }

    /// All element slots, mutably.
    pub fn elements_mut(&mut self) -> &mut [T] {
        // SAFETY: as in `elements`, with exclusive access through `&mut self`.
        unsafe {
            slice::from_raw_parts_mut(
                self.ptr.as_ptr().add(self.layout.data_offset()).cast::<T>(),
                self.layout.capacity(),
            )
        }
    }

    /// The extension header bytes.
    pub fn header(&self) -> &[u8] {
        // SAFETY: the header region lies inside the initialised block.
        unsafe {
            slice::from_raw_parts(
                self.ptr.as_ptr().add(self.layout.header_offset()),
                self.layout.header_size(),
            )
        }
    }

    /// The extension header bytes, mutably.
    pub fn header_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `header`, with exclusive access.
        unsafe {
            slice::from_raw_parts_mut(
                self.ptr.as_ptr().add(self.layout.header_offset()),
                self.layout.header_size(),
            )
        }
    }

    /// The allocator parameter bytes.
    pub fn param(&self) -> &[u8] {
        // SAFETY: the parameter region starts the initialised block.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.layout.param_size()) }
    }

    fn param_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `param`, with exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.param_size()) }
    }
}

impl<T, B: Backend> Drop for RawBlock<T, B> {
    fn drop(&mut self) {
        if self.held.size() > 0 {
            // SAFETY: the block came from this backend with the held layout.
            unsafe { self.backend.deallocate(self.ptr, self.held.to_layout()) };
        }
    }
}

impl<T, B: Backend> fmt::Debug for RawBlock<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBlock")
            .field("ptr", &self.ptr)
            .field("layout", &self.layout)
            .field("held", &self.held.size())
            .finish()
    }
}
