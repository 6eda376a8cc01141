//! Block layout computation with overflow detection.
//!
//! All arithmetic here is checked. An overflow means the caller asked for a
//! block that cannot exist in this address space, which is a programming
//! error: it panics with `"allocation size overflow"` instead of wrapping or
//! clamping to a shorter block.

use std::alloc::Layout;
use std::mem;

#[cold]
#[inline(never)]
#[track_caller]
fn overflow(element_size: usize, capacity: usize) -> ! {
    panic!("allocation size overflow: {capacity} elements of {element_size} bytes");
}

/// Total bytes needed for a block holding `capacity` elements of
/// `element_size` bytes plus the extension header and allocator parameter
/// regions.
///
/// The control data lives in the owning handle, so it contributes nothing
/// here. The result does not include alignment padding; see
/// [`BlockLayout`] for the padded size.
///
/// # Panics
///
/// Panics with `"allocation size overflow"` if any intermediate value
/// overflows `usize` or the total exceeds `isize::MAX`.
#[track_caller]
pub fn compute_alloc_size(
    element_size: usize,
    capacity: usize,
    ext_header_size: usize,
    allocator_region_size: usize,
) -> usize {
    let total = element_size
        .checked_mul(capacity)
        .and_then(|data| data.checked_add(ext_header_size))
        .and_then(|sum| sum.checked_add(allocator_region_size))
        .unwrap_or_else(|| overflow(element_size, capacity));
    if total > isize::MAX as usize {
        overflow(element_size, capacity);
    }
    total
}

/// Round `size` up to the next multiple of `alignment`.
///
/// # Panics
///
/// Panics if `alignment` is not a power of two, or on overflow.
///
/// ```
/// use vecbase_core::aligned_size;
///
/// assert_eq!(aligned_size(0, 8), 0);
/// assert_eq!(aligned_size(8, 8), 8);
/// assert_eq!(aligned_size(15, 8), 16);
/// ```
#[track_caller]
pub fn aligned_size(size: usize, alignment: usize) -> usize {
    assert!(
        alignment.is_power_of_two(),
        "alignment must be a power of two, got {alignment}"
    );
    match size.checked_add(alignment - 1) {
        Some(padded) => padded & !(alignment - 1),
        None => overflow(1, size),
    }
}

/// The computed layout of one vector block.
///
/// A block is `[allocator param][extension header][padding][elements]`,
/// where the padding only brings the element buffer up to the element
/// alignment. Region sizes are fixed for a handle's lifetime; only
/// `capacity` changes, through [`with_capacity`](Self::with_capacity).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    param_size: usize,
    header_size: usize,
    element_size: usize,
    element_align: usize,
    capacity: usize,
    data_offset: usize,
    size: usize,
}

impl BlockLayout {
    /// Compute a layout from raw sizes.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is zero, if `element_align` is not a power
    /// of two, or with `"allocation size overflow"` if the block cannot be
    /// represented.
    #[track_caller]
    pub fn new(
        element_size: usize,
        element_align: usize,
        capacity: usize,
        header_size: usize,
        param_size: usize,
    ) -> Self {
        assert!(element_size > 0, "element size must be non-zero");
        compute_alloc_size(element_size, capacity, header_size, param_size);

        let data_offset = aligned_size(param_size + header_size, element_align);
        let size = element_size
            .checked_mul(capacity)
            .and_then(|data| data.checked_add(data_offset))
            .unwrap_or_else(|| overflow(element_size, capacity));
        // `Layout` additionally requires the size rounded up to the
        // alignment to fit in an isize.
        if size > isize::MAX as usize - (element_align - 1) {
            overflow(element_size, capacity);
        }

        Self {
            param_size,
            header_size,
            element_size,
            element_align,
            capacity,
            data_offset,
            size,
        }
    }

    /// Compute the layout of a block of `T` elements.
    #[track_caller]
    pub fn of<T>(capacity: usize, header_size: usize, param_size: usize) -> Self {
        Self::new(
            mem::size_of::<T>(),
            mem::align_of::<T>(),
            capacity,
            header_size,
            param_size,
        )
    }

    /// The same regions with a different element capacity.
    #[track_caller]
    pub fn with_capacity(&self, capacity: usize) -> Self {
        Self::new(
            self.element_size,
            self.element_align,
            capacity,
            self.header_size,
            self.param_size,
        )
    }

    /// Size of the allocator parameter region in bytes.
    pub fn param_size(&self) -> usize {
        self.param_size
    }

    /// Size of the extension header region in bytes.
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// Byte offset of the extension header within the block.
    pub fn header_offset(&self) -> usize {
        self.param_size
    }

    /// Byte offset of element 0 within the block.
    pub fn data_offset(&self) -> usize {
        self.data_offset
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of element slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes occupied by the element slots.
    pub fn data_size(&self) -> usize {
        self.element_size * self.capacity
    }

    /// Total block size in bytes, padding included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Required alignment of the block.
    pub fn align(&self) -> usize {
        self.element_align
    }

    /// The block as an allocator [`Layout`].
    pub fn to_layout(&self) -> Layout {
        Layout::from_size_align(self.size, self.element_align)
            .expect("size and alignment were validated at construction")
    }
}
