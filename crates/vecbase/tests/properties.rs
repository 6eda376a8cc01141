//! End-to-end properties of the vector engine.
//!
//! Each test exercises one guarantee through the public facade only:
//! element round-trips, bounded size, search agreement, stable binary
//! insertion, the insert-position tie-break, spread, reversal, the
//! overflow guard and allocation failure handling.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use vecbase::{
    cmp_lex_asc, Budget, ErrorHandler, GrowVec, Operation, Vector, VectorError, VectorOptions,
};
use vecbase_test_utils::fixtures::{
    particles, random_i32s, random_ops, shuffled_keys, Op, Particle, INSERT_SEQUENCE, LEX_WORDS,
    SORTED_SAMPLE,
};
use vecbase_test_utils::CountingBackend;

fn recording_handler() -> (ErrorHandler, Rc<RefCell<Vec<VectorError>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let handler = ErrorHandler::new(move |e| sink.borrow_mut().push(e.clone()));
    (handler, log)
}

#[test]
fn binary_insert_sequence_is_sorted_and_stable() {
    let mut v = GrowVec::<i32>::new().unwrap();
    for key in INSERT_SEQUENCE {
        v.binary_insert(key, Ord::cmp).unwrap();
    }
    assert_eq!(v.as_slice(), &[0, 1, 2, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn insert_position_lands_after_equal_keys() {
    let mut v = Vector::<i32>::with_capacity(SORTED_SAMPLE.len()).unwrap();
    v.as_mut_slice().copy_from_slice(&SORTED_SAMPLE);
    assert_eq!(v.binary_insert_position(&-20, 10, Ord::cmp), 1);
    assert_eq!(v.binary_insert_position(&0, 10, Ord::cmp), 3);
    assert_eq!(v.binary_insert_position(&0, 0, Ord::cmp), 0);
}

#[test]
fn spread_five_over_ten_slots() {
    let mut v = Vector::<u32>::with_capacity(10).unwrap();
    for i in 0..10 {
        v.set(i, i as u32);
    }
    v.set(5, 0xaabb_ccdd);
    v.spread(5, 5);
    assert_eq!(
        v.as_slice(),
        &[0, 1, 2, 3, 4, 0xaabb_ccdd, 0xaabb_ccdd, 0xaabb_ccdd, 0xaabb_ccdd, 0xaabb_ccdd]
    );
}

#[test]
fn double_reverse_is_identity() {
    for len in [0usize, 1, 2, 7, 10, 33] {
        let data = random_i32s(len as u64, len, -1000..1000);
        let mut v = GrowVec::<i32>::with_options(VectorOptions::new().with_capacity(len)).unwrap();
        v.extend_from_slice(&data).unwrap();
        v.reverse().unwrap();
        let expected: Vec<i32> = data.iter().rev().copied().collect();
        assert_eq!(v.as_slice(), expected.as_slice(), "length {len}");
        v.reverse().unwrap();
        assert_eq!(v.as_slice(), data.as_slice(), "length {len}");
    }
}

#[test]
fn fixed_vector_reverse_round_trip() {
    for len in [0usize, 1, 6, 9] {
        let mut v = Vector::<u64>::with_capacity(len).unwrap();
        for i in 0..len {
            v.set(i, i as u64 * 11);
        }
        let original = v.as_slice().to_vec();
        v.reverse().unwrap();
        v.reverse().unwrap();
        assert_eq!(v.as_slice(), original.as_slice());
        assert_eq!(v.capacity(), len);
    }
}

#[test]
#[should_panic(expected = "allocation size overflow")]
fn overflowing_capacity_panics() {
    let _ = Vector::<u64>::with_capacity(usize::MAX / 4);
}

#[test]
#[should_panic(expected = "allocation size overflow")]
fn overflowing_growth_panics() {
    let mut v = Vector::<u32>::with_capacity(1).unwrap();
    let _ = v.resize(usize::MAX / 2);
}

#[test]
fn construction_over_budget_returns_err_and_calls_handler() {
    let (handler, log) = recording_handler();
    let options = VectorOptions::new()
        .with_capacity(100)
        .with_backend(Budget::new(64))
        .with_error_handler(handler);
    let result = Vector::<u32, _>::with_options(options);

    let expected = VectorError::AllocFailed {
        operation: Operation::Create,
        requested: 400,
    };
    assert_eq!(result.unwrap_err(), expected);
    assert_eq!(log.borrow().as_slice(), &[expected]);
}

#[test]
fn growable_construction_over_budget_fails_the_same_way() {
    let (handler, log) = recording_handler();
    let options = VectorOptions::new()
        .with_capacity(8)
        .with_ext_header(4)
        .with_backend(Budget::new(16))
        .with_error_handler(handler);
    let err = GrowVec::<u64, _>::with_options(options).unwrap_err();
    assert_eq!(err.operation(), Operation::Create);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn clone_over_budget_reports_clone() {
    let (handler, log) = recording_handler();
    let options = VectorOptions::new()
        .with_capacity(4)
        .with_backend(Budget::new(16))
        .with_error_handler(handler);
    let v = Vector::<u32, _>::with_options(options).unwrap();
    // The clone gets a copy of the budget ledger, already full.
    let err = v.try_clone().unwrap_err();
    assert_eq!(err.operation(), Operation::Clone);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn lexicographic_keys_with_part_copy() {
    let mut v = GrowVec::<[u8; 3]>::new().unwrap();
    for word in [LEX_WORDS[4], LEX_WORDS[0], LEX_WORDS[2], LEX_WORDS[1], LEX_WORDS[3]] {
        v.binary_insert(word, cmp_lex_asc).unwrap();
    }
    assert_eq!(v.as_slice(), &LEX_WORDS);
    assert_eq!(v.binary_find_index(b"acz", cmp_lex_asc), Some(3));

    let mut vec = Vector::<[u8; 3]>::with_capacity(5).unwrap();
    vec.as_mut_slice().copy_from_slice(v.as_slice());
    let mut middles = [0u8; 5];
    vec.part_copy(0, 5, 1, 1, &mut middles);
    assert_eq!(&middles, b"abbcy");
}

#[test]
fn part_copy_extracts_record_field() {
    let records = particles(6);
    let mut v = Vector::<Particle>::with_capacity(records.len()).unwrap();
    v.as_mut_slice().copy_from_slice(&records);

    // Gather the `x` field (bytes 4..8) of elements 1..4.
    let mut xs = [0u8; 12];
    v.part_copy(1, 3, 4, 4, &mut xs);
    let gathered: Vec<i32> = xs
        .chunks_exact(4)
        .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(gathered, vec![records[1].x, records[2].x, records[3].x]);
}

#[test]
fn shuffled_binary_inserts_yield_sorted_keys() {
    let keys = shuffled_keys(42, 500);
    let mut v = GrowVec::<u32>::new().unwrap();
    for key in keys {
        v.binary_insert(key, Ord::cmp).unwrap();
    }
    assert!(v.as_slice().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(v.len(), 500);
}

#[test]
fn one_resize_per_logical_operation() {
    let probe = CountingBackend::new();
    let options = VectorOptions::new().with_backend(probe.clone());
    let mut v = GrowVec::<u32, _>::with_options(options).unwrap();
    let mut model: Vec<u32> = Vec::new();

    for op in random_ops(7, 2000, 0.55) {
        let before = probe.stats().resizes();
        match op {
            Op::Push(x) => {
                v.push(x).unwrap();
                model.push(x);
            }
            Op::Pop => assert_eq!(v.pop().unwrap(), model.pop()),
            Op::Insert { index_seed, value } => {
                let index = index_seed as usize % (model.len() + 1);
                v.insert(index, value).unwrap();
                model.insert(index, value);
            }
            Op::Remove { index_seed } => {
                if !model.is_empty() {
                    let index = index_seed as usize % model.len();
                    assert_eq!(v.remove(index).unwrap(), model.remove(index));
                }
            }
        }
        assert!(probe.stats().resizes() - before <= 1);
        assert!(v.len() <= v.capacity());
        assert!(v.capacity() >= v.initial_capacity());
    }
    assert_eq!(v.as_slice(), model.as_slice());
    drop(v);
    assert_eq!(probe.stats().live_bytes(), 0);
}

proptest! {
    #[test]
    fn set_then_get_round_trips(
        capacity in 1usize..256,
        writes in prop::collection::vec((any::<usize>(), any::<i64>()), 1..64),
    ) {
        let mut v = Vector::<i64>::with_capacity(capacity).unwrap();
        for (slot, value) in writes {
            let index = slot % capacity;
            v.set(index, value);
            prop_assert_eq!(*v.get(index), value);
        }
    }

    #[test]
    fn binary_find_agrees_with_linear_scan(
        mut data in prop::collection::vec(-100i32..100, 0..128),
        needle in -110i32..110,
    ) {
        data.sort();
        let mut v = GrowVec::<i32>::new().unwrap();
        v.extend_from_slice(&data).unwrap();
        let linear = v.linear_find(|&x| x == needle);
        let binary = v.binary_find(&needle, Ord::cmp);
        prop_assert_eq!(linear.is_some(), binary.is_some());
        if let Some(found) = binary {
            prop_assert_eq!(*found, needle);
        }
    }

    #[test]
    fn swap_ranges_on_fixed_vector(
        data in prop::collection::vec(any::<u8>(), 2..40),
        split in (0usize..40, 0usize..40, 0usize..40, 0usize..40),
    ) {
        let n = data.len();
        let mut cuts = [split.0 % (n + 1), split.1 % (n + 1), split.2 % (n + 1), split.3 % (n + 1)];
        cuts.sort();
        let [a, a_end, b, b_end] = cuts;

        let mut v = Vector::<u8>::with_capacity(n).unwrap();
        v.as_mut_slice().copy_from_slice(&data);
        v.swap_ranges(a, a_end - a, b, b_end - b).unwrap();

        let mut expected = data[..a].to_vec();
        expected.extend_from_slice(&data[b..b_end]);
        expected.extend_from_slice(&data[a_end..b]);
        expected.extend_from_slice(&data[a..a_end]);
        expected.extend_from_slice(&data[b_end..]);
        prop_assert_eq!(v.as_slice(), expected.as_slice());
        prop_assert_eq!(v.capacity(), n);
    }
}
