//! The element model.
//!
//! vecbase stores elements as raw bytes and moves them with byte copies, so
//! an element type must be plain old data: any bit pattern (in particular
//! all zeroes) is a valid value and the type has no padding bytes. The
//! [`Element`] trait captures exactly that, on top of the `zerocopy` traits.

use std::cmp::Ordering;

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes};

/// A fixed-size, plain-old-data element storable in a vector block.
///
/// Implemented automatically for every `Copy` type that is
/// `FromBytes + IntoBytes + Immutable` (integers, floats, arrays of those,
/// and `#[derive]`d `#[repr(C)]` records without padding).
pub trait Element: Copy + FromBytes + IntoBytes + Immutable {
    /// The all-zero value of this element type.
    fn zeroed() -> Self {
        <Self as FromZeros>::new_zeroed()
    }
}

impl<T: Copy + FromBytes + IntoBytes + Immutable> Element for T {}

/// Lexicographic comparison of the raw bytes of `value` against `element`,
/// ascending.
///
/// Equivalent to `memcmp` over `size_of::<T>()` bytes. Useful for keys
/// such as fixed-width byte strings (`[u8; N]`).
pub fn cmp_lex_asc<T: Element>(value: &T, element: &T) -> Ordering {
    value.as_bytes().cmp(element.as_bytes())
}

/// Lexicographic comparison of raw bytes in descending order.
pub fn cmp_lex_dsc<T: Element>(value: &T, element: &T) -> Ordering {
    cmp_lex_asc(value, element).reverse()
}
