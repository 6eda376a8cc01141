//! The growable vector.
//!
//! [`GrowVec`] adds a size to a [`Vector`] and lets a [`GrowthPolicy`]
//! drive the capacity. The ordering of each mutation is fixed:
//!
//! - insertions grow **before** opening the gap, so the shift never
//!   writes past the allocated slots;
//! - removals close the gap **before** shrinking, so no live element is
//!   ever beyond the capacity being released.
//!
//! Each logical operation performs at most one physical resize, and a
//! failed resize leaves the vector as it was before the call.

use std::cmp::Ordering;
use std::fmt;

use vecbase_alloc::{Backend, ErrorHandler, Global};
use vecbase_core::{Element, GrowthPolicy, Operation, VectorError};

use crate::options::VectorOptions;
use crate::vector::Vector;

/// A vector of `len` live elements whose capacity follows a
/// [`GrowthPolicy`].
///
/// ```
/// use vecbase::GrowVec;
///
/// let mut v = GrowVec::<i32>::new()?;
/// for x in [3, 1, 2] {
///     v.binary_insert(x, Ord::cmp)?;
/// }
/// assert_eq!(v.as_slice(), &[1, 2, 3]);
/// assert_eq!(v.pop()?, Some(3));
/// # Ok::<(), vecbase::VectorError>(())
/// ```
pub struct GrowVec<T, B: Backend = Global> {
    vec: Vector<T, B>,
    len: usize,
    policy: GrowthPolicy,
}

impl<T: Element> GrowVec<T, Global> {
    /// An empty vector with the default options and policy.
    pub fn new() -> Result<Self, VectorError> {
        Self::with_options(VectorOptions::new())
    }
}

impl<T: Element, B: Backend> GrowVec<T, B> {
    /// An empty vector with the default policy.
    #[track_caller]
    pub fn with_options(options: VectorOptions<B>) -> Result<Self, VectorError> {
        Self::with_policy(options, GrowthPolicy::default())
    }

    /// An empty vector with an explicit policy.
    #[track_caller]
    pub fn with_policy(
        options: VectorOptions<B>,
        policy: GrowthPolicy,
    ) -> Result<Self, VectorError> {
        Ok(Self {
            vec: Vector::with_options(options)?,
            len: 0,
            policy,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.vec.capacity()
    }

    /// Bytes occupied by the allocated slots.
    pub fn capacity_bytes(&self) -> usize {
        self.vec.capacity_bytes()
    }

    /// The capacity floor set at construction.
    pub fn initial_capacity(&self) -> usize {
        self.vec.initial_capacity()
    }

    /// [`initial_capacity`](Self::initial_capacity) in bytes.
    pub fn initial_capacity_bytes(&self) -> usize {
        self.vec.initial_capacity_bytes()
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.vec.element_size()
    }

    /// The growth policy.
    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    /// Size of the extension header in bytes.
    pub fn ext_header_size(&self) -> usize {
        self.vec.ext_header_size()
    }

    /// The extension header. Panics if none was reserved.
    #[track_caller]
    pub fn ext_header(&self) -> &[u8] {
        self.vec.ext_header()
    }

    /// The extension header, mutably. Panics if none was reserved.
    #[track_caller]
    pub fn ext_header_mut(&mut self) -> &mut [u8] {
        self.vec.ext_header_mut()
    }

    /// The allocator parameter bytes.
    pub fn alloc_param(&self) -> &[u8] {
        self.vec.alloc_param()
    }

    /// The backend owning the block.
    pub fn backend(&self) -> &B {
        self.vec.backend()
    }

    /// The installed error handler.
    pub fn error_handler(&self) -> &ErrorHandler {
        self.vec.error_handler()
    }

    /// The live elements.
    pub fn as_slice(&self) -> &[T] {
        &self.vec.as_slice()[..self.len]
    }

    /// The live elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.vec.as_mut_slice()[..len]
    }

    /// The element at `index`, or `None` if `index >= len`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// The element at `index` mutably, or `None` if `index >= len`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Overwrite the live element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: T) {
        self.check_index(index);
        self.vec.set(index, value);
    }

    /// Zero the live element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn set_zero(&mut self, index: usize) {
        self.check_index(index);
        self.vec.set_zero(index);
    }

    #[track_caller]
    fn check_index(&self, index: usize) {
        let len = self.len;
        assert!(index < len, "index {index} out of bounds for length {len}");
    }

    /// The first live element.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The last live element.
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Grow once, if the policy asks for it, so `projected` elements fit.
    #[track_caller]
    fn grow_for(&mut self, projected: usize) -> Result<(), VectorError> {
        let capacity = self.capacity();
        if !self.policy.should_grow(capacity, projected) {
            return Ok(());
        }
        let grown = self.policy.grown_capacity(capacity, projected);
        self.vec.resize_as(grown, Operation::Grow)
    }

    /// Shrink once, if the policy asks for it, never below the initial
    /// capacity.
    fn shrink_to_policy(&mut self) -> Result<(), VectorError> {
        let capacity = self.capacity();
        if !self.policy.should_shrink(capacity, self.len) {
            return Ok(());
        }
        let shrunk = self
            .policy
            .shrunk_capacity(capacity, self.len, self.initial_capacity());
        if shrunk >= capacity {
            return Ok(());
        }
        self.vec.resize_as(shrunk, Operation::Shrink)
    }

    /// Append `value`.
    ///
    /// On allocation failure the vector is unchanged.
    pub fn push(&mut self, value: T) -> Result<(), VectorError> {
        self.insert(self.len, value)
    }

    /// Insert `value` at `index`, moving later elements up by one.
    ///
    /// On allocation failure the vector is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), VectorError> {
        let len = self.len;
        assert!(index <= len, "insert index {index} past length {len}");
        self.grow_for(len + 1)?;
        self.vec.shift(index, len - index, 1);
        self.vec.set(index, value);
        self.len += 1;
        Ok(())
    }

    /// Append every element of `values` with at most one resize.
    ///
    /// On allocation failure the vector is unchanged.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), VectorError> {
        let len = self.len;
        self.grow_for(len + values.len())?;
        self.vec.as_mut_slice()[len..len + values.len()].copy_from_slice(values);
        self.len += values.len();
        Ok(())
    }

    /// Insert `value` after every element comparing less than or equal
    /// to it, and return the index it landed at.
    ///
    /// Equal keys keep their insertion order.
    pub fn binary_insert<F>(&mut self, value: T, cmp: F) -> Result<usize, VectorError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let index = self.binary_insert_position(&value, cmp);
        self.insert(index, value)?;
        Ok(index)
    }

    /// Remove and return the element at `index`, moving later elements
    /// down by one, then shrink if the policy asks for it.
    ///
    /// If the shrink fails, the gap is reopened and `value` put back, so
    /// the vector is unchanged and the element stays in it.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> Result<T, VectorError> {
        self.check_index(index);
        let value = *self.vec.get(index);
        let tail = self.len - index - 1;
        self.vec.shift(index + 1, tail, -1);
        self.len -= 1;
        if let Err(err) = self.shrink_to_policy() {
            self.vec.shift(index, tail, 1);
            self.vec.set(index, value);
            self.len += 1;
            return Err(err);
        }
        Ok(value)
    }

    /// Remove and return the last element, or `None` if empty.
    ///
    /// As with [`remove`](Self::remove), a failed shrink keeps the
    /// element in the vector.
    pub fn pop(&mut self) -> Result<Option<T>, VectorError> {
        if self.is_empty() {
            return Ok(None);
        }
        self.remove(self.len - 1).map(Some)
    }

    /// Drop every element and shrink back toward the initial capacity.
    ///
    /// If the shrink fails, nothing is dropped.
    pub fn clear(&mut self) -> Result<(), VectorError> {
        let len = self.len;
        self.len = 0;
        if let Err(err) = self.shrink_to_policy() {
            self.len = len;
            return Err(err);
        }
        Ok(())
    }

    /// Resize to `capacity` directly, bypassing the policy, and drop any
    /// live elements past it.
    ///
    /// A failure is only returned: the error handler is not called, and
    /// the vector is unchanged.
    #[track_caller]
    pub fn truncate(&mut self, capacity: usize) -> Result<(), VectorError> {
        self.vec.truncate(capacity)?;
        self.len = self.len.min(capacity);
        Ok(())
    }

    /// Copy the live elements, header and parameter regions into a new
    /// vector with a clone of the backend.
    pub fn try_clone(&self) -> Result<Self, VectorError>
    where
        B: Clone,
    {
        Ok(Self {
            vec: self.vec.try_clone()?,
            len: self.len,
            policy: self.policy,
        })
    }

    /// Reverse the live elements in place.
    ///
    /// Uses spare capacity as headroom; grows only when there is less than
    /// `ceil(len / 2)` spare, and then restores the capacity afterwards.
    /// If the backend refuses that shrink, the reversal stands and the
    /// refusal is returned as a `Shrink` error.
    pub fn reverse(&mut self) -> Result<(), VectorError> {
        let len = self.len;
        let needed = len + vecbase_algo::reverse_headroom(len);
        let capacity = self.capacity();
        if needed > capacity {
            self.vec.resize_as(needed, Operation::Grow)?;
        }
        vecbase_algo::reverse(&mut self.vec.as_mut_slice()[..needed], 0, len);
        if needed > capacity {
            self.vec.restore_capacity(capacity)?;
        }
        Ok(())
    }

    /// Replicate the element at `index` over `amount` live slots.
    #[track_caller]
    pub fn spread(&mut self, index: usize, amount: usize) {
        vecbase_algo::spread(self.as_mut_slice(), index, amount);
    }

    /// Exchange the live elements at `a` and `b` (`a != b`).
    #[track_caller]
    pub fn swap(&mut self, a: usize, b: usize) {
        vecbase_algo::swap(self.as_mut_slice(), a, b);
    }

    /// Index of the first live element accepted by `predicate`.
    pub fn linear_find<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        vecbase_algo::linear_find(self.as_slice(), self.len, predicate)
    }

    /// A live element equal to `value`; the elements must be ordered.
    pub fn binary_find<F>(&self, value: &T, cmp: F) -> Option<&T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        vecbase_algo::binary_find(self.as_slice(), value, self.len, cmp)
    }

    /// Index of a live element equal to `value`.
    pub fn binary_find_index<F>(&self, value: &T, cmp: F) -> Option<usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        vecbase_algo::binary_find_index(self.as_slice(), value, self.len, cmp)
    }

    /// Position after the last live element equal to `value`.
    pub fn binary_insert_position<F>(&self, value: &T, cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        vecbase_algo::binary_insert_position(self.as_slice(), value, self.len, cmp)
    }

    /// Call `f` on each live element, stopping at the first error.
    pub fn try_for_each<E, F>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        self.vec.try_for_each(self.len, f)
    }

    /// Fold the live elements into `init`, stopping at the first error.
    pub fn aggregate<A, E, F>(&self, init: A, f: F) -> Result<A, E>
    where
        F: FnMut(A, &T) -> Result<A, E>,
    {
        self.vec.aggregate(self.len, init, f)
    }

    /// Modify each live element in place, stopping at the first error.
    pub fn transform<E, F>(&mut self, f: F) -> Result<(), E>
    where
        F: FnMut(&mut T) -> Result<(), E>,
    {
        self.vec.transform(self.len, f)
    }
}

impl<T: Element + fmt::Debug, B: Backend> fmt::Debug for GrowVec<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
