//! Linear and binary search over the first `limit` elements of a slice.
//!
//! Comparators follow the `memcmp` sign convention: `cmp(value, element)`
//! returns `Less` when `value` sorts before `element`. The searched prefix
//! must already be ordered consistently with the comparator; otherwise the
//! results are unspecified (but never out of bounds).

use std::cmp::Ordering;

#[track_caller]
fn check_limit(limit: usize, len: usize) {
    assert!(
        limit <= len,
        "search limit {limit} exceeds searchable length {len}"
    );
}

/// Index of the first element in `slice[..limit]` accepted by `predicate`.
///
/// # Panics
///
/// Panics if `limit > slice.len()`.
#[track_caller]
pub fn linear_find<T, P>(slice: &[T], limit: usize, mut predicate: P) -> Option<usize>
where
    P: FnMut(&T) -> bool,
{
    check_limit(limit, slice.len());
    slice[..limit].iter().position(|element| predicate(element))
}

/// Index of an element of `slice[..limit]` comparing equal to `value`.
///
/// Uses recursive bisection. With duplicates, any one of the equal
/// elements may be returned.
///
/// # Panics
///
/// Panics if `limit > slice.len()`.
#[track_caller]
pub fn binary_find_index<T, F>(slice: &[T], value: &T, limit: usize, mut cmp: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    check_limit(limit, slice.len());
    bisect(slice, value, 0, limit, &mut cmp)
}

/// Reference to an element of `slice[..limit]` comparing equal to `value`.
///
/// ```
/// use vecbase_algo::binary_find;
///
/// let data = [1, 3, 5, 7];
/// assert_eq!(binary_find(&data, &5, 4, |a, b| a.cmp(b)), Some(&5));
/// assert_eq!(binary_find(&data, &4, 4, |a, b| a.cmp(b)), None);
/// ```
#[track_caller]
pub fn binary_find<'a, T, F>(slice: &'a [T], value: &T, limit: usize, cmp: F) -> Option<&'a T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    binary_find_index(slice, value, limit, cmp).map(|index| &slice[index])
}

fn bisect<T, F>(slice: &[T], value: &T, low: usize, high: usize, cmp: &mut F) -> Option<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if low >= high {
        return None;
    }
    let middle = low + (high - low) / 2;
    match cmp(value, &slice[middle]) {
        Ordering::Equal => Some(middle),
        Ordering::Less => bisect(slice, value, low, middle, cmp),
        Ordering::Greater => bisect(slice, value, middle + 1, high, cmp),
    }
}

/// Position at which `value` should be inserted into `slice[..limit]` to
/// keep it ordered.
///
/// Equality continues the search toward higher indices, so the result is
/// the position after the last element equal to `value`. Inserting equal
/// keys one after another therefore keeps them in insertion order.
///
/// ```
/// use vecbase_algo::binary_insert_position;
///
/// let data = [-100, -1, 0, 10, 12, 20, 21, 30, 34, 60];
/// assert_eq!(binary_insert_position(&data, &-20, 10, |a, b| a.cmp(b)), 1);
/// assert_eq!(binary_insert_position(&data, &0, 10, |a, b| a.cmp(b)), 3);
/// ```
///
/// # Panics
///
/// Panics if `limit > slice.len()`.
#[track_caller]
pub fn binary_insert_position<T, F>(slice: &[T], value: &T, limit: usize, mut cmp: F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    check_limit(limit, slice.len());
    insert_bisect(slice, value, 0, limit, &mut cmp)
}

fn insert_bisect<T, F>(slice: &[T], value: &T, low: usize, high: usize, cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    if low >= high {
        return low;
    }
    let middle = low + (high - low) / 2;
    match cmp(value, &slice[middle]) {
        Ordering::Less => insert_bisect(slice, value, low, middle, cmp),
        Ordering::Equal | Ordering::Greater => insert_bisect(slice, value, middle + 1, high, cmp),
    }
}
