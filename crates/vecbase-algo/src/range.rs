//! In-place range algorithms.
//!
//! Ranges are `(offset, length)` pairs in element units. Every function
//! checks its ranges against the slice it is given and panics on a
//! violation instead of clamping.
//!
//! [`swap_ranges`] and [`reverse`] borrow temporary headroom instead of an
//! external buffer: the last slots of the slice they receive are scratch
//! space, and must lie after every range being exchanged. The caller grows
//! its buffer by the required amount beforehand and shrinks it afterwards.

use std::mem;

use vecbase_core::Element;
use zerocopy::IntoBytes;

const WORD: usize = mem::size_of::<usize>();

#[track_caller]
fn range_end(offset: usize, length: usize, capacity: usize, operation: &str) -> usize {
    match offset.checked_add(length) {
        Some(end) if end <= capacity => end,
        _ => panic!(
            "{operation}: range {offset}+{length} out of bounds for capacity {capacity}"
        ),
    }
}

/// Copy `length` elements starting at `offset` into the front of `dest`.
///
/// # Panics
///
/// Panics if the source range is out of bounds or `dest` is too short.
#[track_caller]
pub fn copy_to<T: Element>(buf: &[T], offset: usize, length: usize, dest: &mut [T]) {
    let end = range_end(offset, length, buf.len(), "copy_to");
    assert!(
        dest.len() >= length,
        "copy_to: destination holds {} elements, {length} needed",
        dest.len()
    );
    dest[..length].copy_from_slice(&buf[offset..end]);
}

/// Copy `length` elements from `src` to `dst` within one buffer. The two
/// ranges must not overlap; use [`move_within`] when they might.
///
/// # Panics
///
/// Panics if either range is out of bounds or the ranges overlap.
#[track_caller]
pub fn copy_within<T: Element>(buf: &mut [T], src: usize, length: usize, dst: usize) {
    let src_end = range_end(src, length, buf.len(), "copy_within");
    let dst_end = range_end(dst, length, buf.len(), "copy_within");
    assert!(
        length == 0 || src_end <= dst || dst_end <= src,
        "copy_within: ranges {src}+{length} and {dst}+{length} overlap"
    );
    buf.copy_within(src..src_end, dst);
}

/// Overlap-safe copy of `length` elements from `src` to `dst`.
///
/// # Panics
///
/// Panics if either range is out of bounds.
#[track_caller]
pub fn move_within<T: Element>(buf: &mut [T], src: usize, length: usize, dst: usize) {
    let src_end = range_end(src, length, buf.len(), "move_within");
    range_end(dst, length, buf.len(), "move_within");
    buf.copy_within(src..src_end, dst);
}

/// Gather a `part_length`-byte sub-field at byte `part_offset` of each of
/// `length` elements starting at `offset`, packed contiguously into
/// `dest`.
///
/// ```
/// use vecbase_algo::part_copy;
///
/// let pairs: [[u8; 4]; 3] = [[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12]];
/// let mut out = [0u8; 6];
/// part_copy(&pairs, 0, 3, 1, 2, &mut out);
/// assert_eq!(out, [2, 3, 6, 7, 10, 11]);
/// ```
///
/// # Panics
///
/// Panics if the element range is out of bounds, the sub-field does not
/// fit in one element, or `dest` is shorter than `length * part_length`.
#[track_caller]
pub fn part_copy<T: Element>(
    buf: &[T],
    offset: usize,
    length: usize,
    part_offset: usize,
    part_length: usize,
    dest: &mut [u8],
) {
    let end = range_end(offset, length, buf.len(), "part_copy");
    let part_end = range_end(part_offset, part_length, mem::size_of::<T>(), "part_copy");
    let needed = length
        .checked_mul(part_length)
        .filter(|&needed| needed <= dest.len())
        .unwrap_or_else(|| {
            panic!(
                "part_copy: destination holds {} bytes, {length} parts of {part_length} needed",
                dest.len()
            )
        });
    if part_length == 0 {
        return;
    }
    for (element, out) in buf[offset..end]
        .iter()
        .zip(dest[..needed].chunks_exact_mut(part_length))
    {
        out.copy_from_slice(&element.as_bytes()[part_offset..part_end]);
    }
}

/// Replicate the element at `index` across `amount` slots starting at
/// `index`.
///
/// The filled run doubles with one bulk copy per step while it still fits
/// in `amount`; the remaining tail is then filled one element at a time.
///
/// # Panics
///
/// Panics if `index..index + amount` is out of bounds, or if `amount > 0`
/// and `index` is not a valid slot.
#[track_caller]
pub fn spread<T: Element>(buf: &mut [T], index: usize, amount: usize) {
    range_end(index, amount, buf.len(), "spread");
    if amount == 0 {
        return;
    }

    let mut filled = 1;
    while filled * 2 <= amount {
        buf.copy_within(index..index + filled, index + filled);
        filled *= 2;
    }
    for slot in index + filled..index + amount {
        buf[slot] = buf[slot - 1];
    }
}

/// Move `length` elements at `offset` by `by` slots (negative toward lower
/// indices). Overlap-safe; the vacated slots keep their old contents.
///
/// # Panics
///
/// Panics if the source or the destination range leaves the buffer.
#[track_caller]
pub fn shift<T: Element>(buf: &mut [T], offset: usize, length: usize, by: isize) {
    let end = range_end(offset, length, buf.len(), "shift");
    let dst = offset.checked_add_signed(by).unwrap_or_else(|| {
        panic!("shift: destination {offset}{by:+} out of bounds for capacity {}", buf.len())
    });
    range_end(dst, length, buf.len(), "shift");
    buf.copy_within(offset..end, dst);
}

/// Exchange the elements at `a` and `b`.
///
/// Bytes are exchanged a machine word at a time through a single stack
/// word, then byte by byte for the remainder.
///
/// # Panics
///
/// Panics if `a == b` or either index is out of bounds.
#[track_caller]
pub fn swap<T: Element>(buf: &mut [T], a: usize, b: usize) {
    assert!(a != b, "swap: indices must differ, both are {a}");
    let capacity = buf.len();
    assert!(
        a < capacity && b < capacity,
        "swap: indices {a} and {b} out of bounds for capacity {capacity}"
    );

    let (low, high) = (a.min(b), a.max(b));
    let (left, right) = buf.split_at_mut(high);
    swap_bytes(left[low].as_mut_bytes(), right[0].as_mut_bytes());
}

fn swap_bytes(x: &mut [u8], y: &mut [u8]) {
    let mut scratch = [0u8; WORD];
    let mut x_words = x.chunks_exact_mut(WORD);
    let mut y_words = y.chunks_exact_mut(WORD);
    for (xw, yw) in (&mut x_words).zip(&mut y_words) {
        scratch.copy_from_slice(xw);
        xw.copy_from_slice(yw);
        yw.copy_from_slice(&scratch);
    }
    for (xb, yb) in x_words
        .into_remainder()
        .iter_mut()
        .zip(y_words.into_remainder())
    {
        mem::swap(xb, yb);
    }
}

/// Exchange the disjoint ranges `a..a + len_a` and `b..b + len_b`, which
/// may differ in length. The elements between them move so that the
/// result is `[B][middle][A]` in the space that held `[A][middle][B]`.
///
/// The last `max(len_a, len_b)` slots of `buf` are used as scratch and
/// must start at or after `b + len_b`.
///
/// # Panics
///
/// Panics if `a + len_a > b` or the headroom is missing.
#[track_caller]
pub fn swap_ranges<T: Element>(buf: &mut [T], a: usize, len_a: usize, b: usize, len_b: usize) {
    let a_end = range_end(a, len_a, buf.len(), "swap_ranges");
    assert!(
        a_end <= b,
        "swap_ranges: range {a}+{len_a} must end at or before {b}"
    );
    let end = range_end(b, len_b, buf.len(), "swap_ranges");
    let headroom = len_a.max(len_b);
    let scratch = buf.len() - headroom;
    assert!(
        scratch >= end,
        "swap_ranges: needs {headroom} slots of headroom after {end}, capacity is {}",
        buf.len()
    );

    if len_b >= len_a {
        buf.copy_within(b..end, scratch);
        buf.copy_within(a..a_end, end - len_a);
        buf.copy_within(a_end..b, a + len_b);
        buf.copy_within(scratch..scratch + len_b, a);
    } else {
        buf.copy_within(a..a_end, scratch);
        buf.copy_within(b..end, a);
        buf.copy_within(a_end..b, a + len_b);
        buf.copy_within(scratch..scratch + len_a, end - len_a);
    }
}

/// Headroom [`reverse`] needs to reverse `length` elements.
pub fn reverse_headroom(length: usize) -> usize {
    length - length / 2
}

/// Reverse `length` elements starting at `start` without an auxiliary
/// buffer.
///
/// The range is split into halves of `floor(n/2)` and `ceil(n/2)`
/// elements, the halves are exchanged with [`swap_ranges`], and each half
/// is reversed recursively. The last [`reverse_headroom`]`(length)` slots
/// of `buf` are scratch and must start at or after `start + length`.
///
/// # Panics
///
/// Panics if the range is out of bounds or the headroom is missing.
#[track_caller]
pub fn reverse<T: Element>(buf: &mut [T], start: usize, length: usize) {
    let end = range_end(start, length, buf.len(), "reverse");
    let headroom = reverse_headroom(length);
    assert!(
        buf.len() - end >= headroom,
        "reverse: needs {headroom} slots of headroom after {end}, capacity is {}",
        buf.len()
    );
    reverse_split(buf, start, length);
}

fn reverse_split<T: Element>(buf: &mut [T], start: usize, length: usize) {
    if length < 2 {
        return;
    }
    let half = length / 2;
    let rest = length - half;
    swap_ranges(buf, start, half, start + half, rest);
    reverse_split(buf, start, rest);
    reverse_split(buf, start + rest, half);
}
