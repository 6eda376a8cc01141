//! The fixed-content vector.
//!
//! A [`Vector`] has no notion of size: every slot in `0..capacity` is a
//! live element (zero until written), and the capacity only changes
//! through [`Vector::resize`] and [`Vector::truncate`], or transiently
//! inside [`swap_ranges`](Vector::swap_ranges) and
//! [`reverse`](Vector::reverse).

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use vecbase_alloc::{Backend, ErrorHandler, Global, RawBlock};
use vecbase_core::{Element, Operation, VectorError};

use crate::options::VectorOptions;

/// Report `error` to `handler` and hand it back for propagation.
pub(crate) fn report(handler: &ErrorHandler, error: VectorError) -> VectorError {
    handler.handle(&error);
    error
}

/// A contiguous block of `capacity` elements of `T`, with an optional
/// extension header and allocator parameter region in front.
pub struct Vector<T, B: Backend = Global> {
    block: RawBlock<T, B>,
    initial_capacity: usize,
    handler: ErrorHandler,
}

impl<T: Element> Vector<T, Global> {
    /// A vector with the default options.
    pub fn new() -> Result<Self, VectorError> {
        Self::with_options(VectorOptions::new())
    }

    /// A vector of `capacity` zeroed elements with otherwise default
    /// options.
    ///
    /// # Panics
    ///
    /// Panics with `"allocation size overflow"` if the block size is not
    /// representable.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Result<Self, VectorError> {
        Self::with_options(VectorOptions::new().with_capacity(capacity))
    }
}

impl<T: Element, B: Backend> Vector<T, B> {
    /// Build a vector from `options`.
    ///
    /// On allocation failure the error handler runs first; with a
    /// non-aborting handler the error is returned and no vector exists.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized, or with `"allocation size overflow"`
    /// if the block size is not representable.
    #[track_caller]
    pub fn with_options(options: VectorOptions<B>) -> Result<Self, VectorError> {
        let VectorOptions {
            initial_capacity,
            ext_header_size,
            alloc_param,
            backend,
            error_handler,
        } = options;
        let block = RawBlock::allocate(initial_capacity, ext_header_size, &alloc_param, backend)
            .map_err(|e| report(&error_handler, e))?;
        Ok(Self {
            block,
            initial_capacity,
            handler: error_handler,
        })
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Number of element slots.
    pub fn capacity(&self) -> usize {
        self.block.capacity()
    }

    /// Bytes occupied by the element slots.
    pub fn capacity_bytes(&self) -> usize {
        self.block.layout().data_size()
    }

    /// Capacity requested at construction.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// [`initial_capacity`](Self::initial_capacity) in bytes.
    pub fn initial_capacity_bytes(&self) -> usize {
        self.initial_capacity * self.element_size()
    }

    /// Size of the extension header in bytes.
    pub fn ext_header_size(&self) -> usize {
        self.block.layout().header_size()
    }

    /// The extension header.
    ///
    /// # Panics
    ///
    /// Panics if no header was reserved.
    #[track_caller]
    pub fn ext_header(&self) -> &[u8] {
        self.assert_header();
        self.block.header()
    }

    /// The extension header, mutably.
    ///
    /// # Panics
    ///
    /// Panics if no header was reserved.
    #[track_caller]
    pub fn ext_header_mut(&mut self) -> &mut [u8] {
        self.assert_header();
        self.block.header_mut()
    }

    #[track_caller]
    fn assert_header(&self) {
        assert!(
            self.ext_header_size() > 0,
            "extension header was not reserved (size 0)"
        );
    }

    /// The allocator parameter bytes supplied at construction.
    pub fn alloc_param(&self) -> &[u8] {
        self.block.param()
    }

    /// The backend owning the block.
    pub fn backend(&self) -> &B {
        self.block.backend()
    }

    /// The installed error handler.
    pub fn error_handler(&self) -> &ErrorHandler {
        &self.handler
    }

    /// Every slot, `0..capacity`.
    pub fn as_slice(&self) -> &[T] {
        self.block.elements()
    }

    /// Every slot, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.block.elements_mut()
    }

    #[track_caller]
    fn check_index(&self, index: usize) {
        let capacity = self.capacity();
        assert!(
            index < capacity,
            "index {index} out of bounds for capacity {capacity}"
        );
    }

    /// The element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[track_caller]
    pub fn get(&self, index: usize) -> &T {
        self.check_index(index);
        &self.as_slice()[index]
    }

    /// The element at `index`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[track_caller]
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        self.check_index(index);
        &mut self.as_mut_slice()[index]
    }

    /// Overwrite the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: T) {
        *self.get_mut(index) = value;
    }

    /// Fill the slot at `index` with zero bytes.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[track_caller]
    pub fn set_zero(&mut self, index: usize) {
        *self.get_mut(index) = T::zeroed();
    }

    /// Change the capacity. Elements below the new capacity are kept,
    /// new slots are zero, and slots beyond a smaller capacity are
    /// discarded.
    ///
    /// On failure the handler runs and the vector is unchanged.
    #[track_caller]
    pub fn resize(&mut self, capacity: usize) -> Result<(), VectorError> {
        self.resize_as(capacity, Operation::Resize)
    }

    /// Resize like [`resize`](Self::resize), but report a failure only
    /// through the return value: the error handler is not called.
    ///
    /// On failure the vector is unchanged.
    #[track_caller]
    pub fn truncate(&mut self, capacity: usize) -> Result<(), VectorError> {
        self.block.resize(capacity)
    }

    #[track_caller]
    pub(crate) fn resize_as(
        &mut self,
        capacity: usize,
        operation: Operation,
    ) -> Result<(), VectorError> {
        self.block
            .resize(capacity)
            .map_err(|e| report(&self.handler, e.during(operation)))
    }

    /// Copy the whole vector (header and parameter regions included) into
    /// a new vector with a clone of the backend.
    pub fn try_clone(&self) -> Result<Self, VectorError>
    where
        B: Clone,
    {
        let block = self
            .block
            .try_clone()
            .map_err(|e| report(&self.handler, e))?;
        Ok(Self {
            block,
            initial_capacity: self.initial_capacity,
            handler: self.handler.clone(),
        })
    }

    /// Copy `length` elements at `offset` to the front of `dest`.
    #[track_caller]
    pub fn copy_to(&self, offset: usize, length: usize, dest: &mut [T]) {
        vecbase_algo::copy_to(self.as_slice(), offset, length, dest);
    }

    /// Copy `length` elements from `src` to a disjoint range at `dst`.
    #[track_caller]
    pub fn copy_within(&mut self, src: usize, length: usize, dst: usize) {
        vecbase_algo::copy_within(self.as_mut_slice(), src, length, dst);
    }

    /// Overlap-safe copy of `length` elements from `src` to `dst`.
    #[track_caller]
    pub fn move_within(&mut self, src: usize, length: usize, dst: usize) {
        vecbase_algo::move_within(self.as_mut_slice(), src, length, dst);
    }

    /// Gather a sub-field of each element into `dest`; see
    /// [`vecbase_algo::part_copy`].
    #[track_caller]
    pub fn part_copy(
        &self,
        offset: usize,
        length: usize,
        part_offset: usize,
        part_length: usize,
        dest: &mut [u8],
    ) {
        vecbase_algo::part_copy(
            self.as_slice(),
            offset,
            length,
            part_offset,
            part_length,
            dest,
        );
    }

    /// Replicate the element at `index` over `amount` slots.
    #[track_caller]
    pub fn spread(&mut self, index: usize, amount: usize) {
        vecbase_algo::spread(self.as_mut_slice(), index, amount);
    }

    /// Move `length` elements at `offset` by `by` slots.
    #[track_caller]
    pub fn shift(&mut self, offset: usize, length: usize, by: isize) {
        vecbase_algo::shift(self.as_mut_slice(), offset, length, by);
    }

    /// Exchange the elements at `a` and `b` (`a != b`).
    #[track_caller]
    pub fn swap(&mut self, a: usize, b: usize) {
        vecbase_algo::swap(self.as_mut_slice(), a, b);
    }

    /// Exchange the disjoint ranges `a..a + len_a` and `b..b + len_b`.
    ///
    /// The capacity is grown by `max(len_a, len_b)` for the duration of
    /// the exchange and restored afterwards. If the growth fails nothing
    /// is exchanged. If the backend refuses to shrink back, the exchange
    /// stands, the capacity is still restored over the larger allocation
    /// and the refusal is returned as a `Shrink` error.
    ///
    /// # Panics
    ///
    /// Panics if `a + len_a > b` or `b + len_b > capacity`.
    #[track_caller]
    pub fn swap_ranges(
        &mut self,
        a: usize,
        len_a: usize,
        b: usize,
        len_b: usize,
    ) -> Result<(), VectorError> {
        let capacity = self.capacity();
        assert!(
            a.checked_add(len_a).is_some_and(|end| end <= b),
            "swap_ranges: range {a}+{len_a} must end at or before {b}"
        );
        assert!(
            b.checked_add(len_b).is_some_and(|end| end <= capacity),
            "swap_ranges: range {b}+{len_b} out of bounds for capacity {capacity}"
        );
        self.with_headroom(len_a.max(len_b), |buf| {
            vecbase_algo::swap_ranges(buf, a, len_a, b, len_b);
        })
    }

    /// Reverse every slot in place.
    ///
    /// Borrows `ceil(capacity / 2)` slots of headroom while it runs; a
    /// failure to return them behaves as in
    /// [`swap_ranges`](Self::swap_ranges).
    pub fn reverse(&mut self) -> Result<(), VectorError> {
        let length = self.capacity();
        self.with_headroom(vecbase_algo::reverse_headroom(length), |buf| {
            vecbase_algo::reverse(buf, 0, length);
        })
    }

    /// Grow by `headroom` slots, run `f` over the enlarged buffer, then
    /// restore the capacity.
    fn with_headroom(
        &mut self,
        headroom: usize,
        f: impl FnOnce(&mut [T]),
    ) -> Result<(), VectorError> {
        let capacity = self.capacity();
        if headroom == 0 {
            f(self.as_mut_slice());
            return Ok(());
        }
        self.resize_as(capacity + headroom, Operation::Grow)?;
        f(self.as_mut_slice());
        self.restore_capacity(capacity)
    }

    /// Shrink back to `capacity` after borrowing headroom. A refused
    /// shrink still hides the borrowed slots; the error is reported.
    pub(crate) fn restore_capacity(&mut self, capacity: usize) -> Result<(), VectorError> {
        self.block.resize(capacity).map_err(|e| {
            self.block.narrow(capacity);
            report(&self.handler, e.during(Operation::Shrink))
        })
    }

    /// Index of the first of the first `limit` elements accepted by
    /// `predicate`.
    #[track_caller]
    pub fn linear_find<P>(&self, limit: usize, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        vecbase_algo::linear_find(self.as_slice(), limit, predicate)
    }

    /// An element of the ordered prefix `0..limit` equal to `value`.
    #[track_caller]
    pub fn binary_find<F>(&self, value: &T, limit: usize, cmp: F) -> Option<&T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        vecbase_algo::binary_find(self.as_slice(), value, limit, cmp)
    }

    /// Index of an element of the ordered prefix `0..limit` equal to
    /// `value`.
    #[track_caller]
    pub fn binary_find_index<F>(&self, value: &T, limit: usize, cmp: F) -> Option<usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        vecbase_algo::binary_find_index(self.as_slice(), value, limit, cmp)
    }

    /// Position after the last element of `0..limit` equal to `value`.
    #[track_caller]
    pub fn binary_insert_position<F>(&self, value: &T, limit: usize, cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        vecbase_algo::binary_insert_position(self.as_slice(), value, limit, cmp)
    }

    /// Call `f` on each of the first `limit` elements, stopping at the
    /// first error.
    #[track_caller]
    pub fn try_for_each<E, F>(&self, limit: usize, f: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        self.prefix(limit).iter().try_for_each(f)
    }

    /// Fold the first `limit` elements into `init`, stopping at the first
    /// error.
    #[track_caller]
    pub fn aggregate<A, E, F>(&self, limit: usize, init: A, f: F) -> Result<A, E>
    where
        F: FnMut(A, &T) -> Result<A, E>,
    {
        self.prefix(limit).iter().try_fold(init, f)
    }

    /// Modify each of the first `limit` elements in place, stopping at the
    /// first error. Elements before the failing one keep their changes.
    #[track_caller]
    pub fn transform<E, F>(&mut self, limit: usize, f: F) -> Result<(), E>
    where
        F: FnMut(&mut T) -> Result<(), E>,
    {
        self.check_limit(limit);
        self.as_mut_slice()[..limit].iter_mut().try_for_each(f)
    }

    #[track_caller]
    fn prefix(&self, limit: usize) -> &[T] {
        self.check_limit(limit);
        &self.as_slice()[..limit]
    }

    #[track_caller]
    fn check_limit(&self, limit: usize) {
        let capacity = self.capacity();
        assert!(
            limit <= capacity,
            "limit {limit} exceeds capacity {capacity}"
        );
    }
}

impl<T, B: Backend> fmt::Debug for Vector<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("block", &self.block)
            .field("initial_capacity", &self.initial_capacity)
            .field("handler", &self.handler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vecbase_alloc::Budget;
    use vecbase_test_utils::fixtures::SORTED_SAMPLE;
    use vecbase_test_utils::CountingBackend;

    fn sample() -> Vector<i32> {
        let mut v = Vector::with_capacity(SORTED_SAMPLE.len()).unwrap();
        v.as_mut_slice().copy_from_slice(&SORTED_SAMPLE);
        v
    }

    #[test]
    fn new_vector_is_zeroed() {
        let v = Vector::<u64>::new().unwrap();
        assert_eq!(v.capacity(), VectorOptions::DEFAULT_INITIAL_CAPACITY);
        assert_eq!(v.capacity_bytes(), 80);
        assert_eq!(v.initial_capacity_bytes(), 80);
        assert!(v.as_slice().iter().all(|&x| x == 0));
    }

    #[test]
    fn set_get_and_zero() {
        let mut v = Vector::<u32>::with_capacity(4).unwrap();
        v.set(3, 0xdead_beef);
        assert_eq!(*v.get(3), 0xdead_beef);
        v.set_zero(3);
        assert_eq!(*v.get(3), 0);
    }

    #[test]
    #[should_panic(expected = "index 4 out of bounds for capacity 4")]
    fn get_past_capacity_panics() {
        let v = Vector::<u32>::with_capacity(4).unwrap();
        v.get(4);
    }

    #[test]
    #[should_panic(expected = "extension header was not reserved")]
    fn header_without_reservation_panics() {
        let v = Vector::<u8>::new().unwrap();
        v.ext_header();
    }

    #[test]
    fn header_and_param_survive_resize_and_clone() {
        let options = VectorOptions::new()
            .with_capacity(2)
            .with_ext_header(3)
            .with_alloc_param([0xAA]);
        let mut v = Vector::<u16>::with_options(options).unwrap();
        v.ext_header_mut().copy_from_slice(b"hdr");
        v.resize(50).unwrap();
        let c = v.try_clone().unwrap();
        assert_eq!(c.ext_header(), b"hdr");
        assert_eq!(c.alloc_param(), &[0xAA]);
        assert_eq!(c.capacity(), 50);
    }

    #[test]
    fn resize_keeps_prefix() {
        let mut v = sample();
        v.resize(4).unwrap();
        assert_eq!(v.as_slice(), &SORTED_SAMPLE[..4]);
        v.resize(6).unwrap();
        assert_eq!(v.as_slice(), &[-100, -1, 0, 10, 0, 0]);
    }

    #[test]
    fn failed_resize_calls_handler_and_keeps_vector() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let options = VectorOptions::new()
            .with_capacity(4)
            .with_backend(Budget::new(16))
            .with_error_handler(ErrorHandler::new(move |e| sink.borrow_mut().push(e.clone())));
        let mut v = Vector::<u32, _>::with_options(options).unwrap();
        v.set(0, 7);

        let err = v.resize(8).unwrap_err();
        assert_eq!(err.operation(), Operation::Resize);
        assert_eq!(calls.borrow().as_slice(), &[err]);
        assert_eq!(v.capacity(), 4);
        assert_eq!(*v.get(0), 7);
    }

    #[test]
    fn swap_ranges_restores_capacity() {
        let probe = CountingBackend::new();
        let options = VectorOptions::new()
            .with_capacity(6)
            .with_backend(probe.clone());
        let mut v = Vector::<u8, _>::with_options(options).unwrap();
        v.as_mut_slice().copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        v.swap_ranges(0, 1, 3, 3).unwrap();
        assert_eq!(v.as_slice(), &[4, 5, 6, 2, 3, 1]);
        assert_eq!(v.capacity(), 6);
        assert_eq!(probe.stats().reallocations(), 2);
    }

    fn refusing(data: &[u8]) -> (Vector<u8, CountingBackend>, Rc<RefCell<Vec<VectorError>>>) {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        let options = VectorOptions::new()
            .with_capacity(data.len())
            .with_backend(CountingBackend::refusing_shrinks())
            .with_error_handler(ErrorHandler::new(move |e| sink.borrow_mut().push(e.clone())));
        let mut v = Vector::with_options(options).unwrap();
        v.as_mut_slice().copy_from_slice(data);
        (v, errors)
    }

    #[test]
    fn refused_shrink_after_reverse_keeps_capacity() {
        let (mut v, errors) = refusing(&[1, 2, 3, 4]);
        let err = v.reverse().unwrap_err();
        assert_eq!(err.operation(), Operation::Shrink);
        assert_eq!(errors.borrow().as_slice(), &[err]);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.as_slice(), &[4, 3, 2, 1]);

        // The borrowed slots come back zeroed on the next growth.
        v.resize(6).unwrap();
        assert_eq!(v.as_slice(), &[4, 3, 2, 1, 0, 0]);
    }

    #[test]
    fn refused_shrink_after_swap_ranges_keeps_capacity() {
        let (mut v, errors) = refusing(&[1, 2, 3, 4]);
        let err = v.swap_ranges(0, 1, 2, 2).unwrap_err();
        assert_eq!(err.operation(), Operation::Shrink);
        assert_eq!(errors.borrow().len(), 1);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.as_slice(), &[3, 4, 2, 1]);

        let c = v.try_clone().unwrap();
        assert_eq!(c.as_slice(), &[3, 4, 2, 1]);
    }

    #[test]
    fn truncate_skips_the_handler() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let options = VectorOptions::new()
            .with_capacity(4)
            .with_backend(Budget::new(16))
            .with_error_handler(ErrorHandler::new(move |_| *counter.borrow_mut() += 1));
        let mut v = Vector::<u32, _>::with_options(options).unwrap();
        v.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);

        let err = v.truncate(8).unwrap_err();
        assert_eq!(
            err,
            VectorError::AllocFailed {
                operation: Operation::Resize,
                requested: 32,
            }
        );
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(v.as_slice(), &[1, 2, 3, 4]);

        v.truncate(2).unwrap();
        assert_eq!(v.as_slice(), &[1, 2]);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    #[should_panic(expected = "must end at or before")]
    fn swap_ranges_rejects_misordered() {
        let mut v = sample();
        let _ = v.swap_ranges(4, 2, 1, 2);
    }

    #[test]
    fn reverse_whole_capacity() {
        let mut v = sample();
        v.reverse().unwrap();
        let mut expected = SORTED_SAMPLE;
        expected.reverse();
        assert_eq!(v.as_slice(), &expected);
        assert_eq!(v.capacity(), SORTED_SAMPLE.len());
    }

    #[test]
    fn searches_over_prefix() {
        let v = sample();
        assert_eq!(v.linear_find(10, |&x| x > 20), Some(6));
        assert_eq!(v.binary_find(&34, 10, Ord::cmp), Some(&34));
        assert_eq!(v.binary_find_index(&34, 8, Ord::cmp), None);
        assert_eq!(v.binary_insert_position(&-20, 10, Ord::cmp), 1);
        assert_eq!(v.binary_insert_position(&0, 10, Ord::cmp), 3);
    }

    #[test]
    fn iteration_helpers_stop_at_first_error() {
        let mut v = sample();
        let mut seen = 0;
        let result = v.try_for_each(10, |&x| {
            seen += 1;
            if x == 10 {
                Err(x)
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err(10));
        assert_eq!(seen, 4);

        let sum: Result<i64, ()> = v.aggregate(10, 0i64, |acc, &x| Ok(acc + i64::from(x)));
        assert_eq!(sum, Ok(SORTED_SAMPLE.iter().map(|&x| i64::from(x)).sum()));

        let result = v.transform(10, |x| {
            if *x > 0 {
                return Err("positive");
            }
            *x = -*x;
            Ok(())
        });
        assert_eq!(result, Err("positive"));
        assert_eq!(&v.as_slice()[..4], &[100, 1, 0, 10]);
    }

    #[test]
    #[should_panic(expected = "limit 11 exceeds capacity 10")]
    fn iteration_limit_past_capacity_panics() {
        let _ = sample().try_for_each(11, |_| Ok::<(), ()>(()));
    }
}
