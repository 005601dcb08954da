//! Integration test: allocation failures roll back cleanly.
//!
//! A `FaultyAllocator` refuses the growth step of each operation. The
//! container must report an allocation failure and keep its length,
//! capacity, and contents exactly as they were before the call.

use trove_core::{ErrorKind, VecError};
use trove_test_utils::{FaultyAllocator, TrackingAllocator};
use trove_vec::AllocVec;

/// Fill `v` until it is exactly at capacity.
fn fill_to_capacity(v: &mut AllocVec<'_, u32, FaultyAllocator>) {
    v.push_back(0).unwrap();
    while v.len() < v.capacity() {
        v.push_back(v.len() as u32).unwrap();
    }
}

fn snapshot(v: &AllocVec<'_, u32, FaultyAllocator>) -> (usize, usize, Vec<u32>) {
    (v.len(), v.capacity(), v.as_slice().to_vec())
}

#[test]
fn push_back_failure_leaves_container_intact() {
    let alloc = FaultyAllocator::new();
    let mut v = AllocVec::with_hint_in(4, &alloc).unwrap();
    fill_to_capacity(&mut v);
    let before = snapshot(&v);

    alloc.fail_next();
    let err = v.push_back(99).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AllocationFailure);
    assert!(matches!(err, VecError::AllocationFailed(_)));
    assert_eq!(snapshot(&v), before);

    alloc.heal();
    v.push_back(99).unwrap();
    assert_eq!(*v.back().unwrap(), 99);
}

#[test]
fn first_allocation_failure_keeps_container_unallocated() {
    let alloc = FaultyAllocator::new();
    let mut v: AllocVec<'_, u32, _> = AllocVec::new_in(&alloc);
    alloc.fail_next();
    assert!(v.push_back(1).unwrap_err().is_allocation_failure());
    assert_eq!(v.capacity(), 0);
    assert!(v.is_empty());
}

#[test]
fn insert_at_failure_does_not_shift() {
    let alloc = FaultyAllocator::new();
    let mut v = AllocVec::with_hint_in(3, &alloc).unwrap();
    fill_to_capacity(&mut v);
    let before = snapshot(&v);

    alloc.fail_next();
    assert!(v.insert_at(0, 42).is_err());
    assert_eq!(snapshot(&v), before);
}

#[test]
fn insert_uninit_failure_hands_out_no_slot() {
    let alloc = FaultyAllocator::new();
    let mut v = AllocVec::with_hint_in(2, &alloc).unwrap();
    fill_to_capacity(&mut v);
    let before = snapshot(&v);

    alloc.fail_next();
    assert!(v.insert_uninit(1).is_err());
    assert!(v.push_uninit().is_err());
    assert_eq!(snapshot(&v), before);
}

#[test]
fn reserve_failure_keeps_capacity() {
    let alloc = FaultyAllocator::new();
    let mut v = AllocVec::new_in(&alloc);
    v.push_back(1u32).unwrap();
    let before = snapshot(&v);

    alloc.fail_above(64);
    assert!(v.reserve(1_000).unwrap_err().is_allocation_failure());
    assert_eq!(snapshot(&v), before);
}

#[test]
fn shrink_to_fit_failure_keeps_storage() {
    let alloc = FaultyAllocator::new();
    let mut v = AllocVec::with_hint_in(16, &alloc).unwrap();
    v.push_back(7u32).unwrap();
    v.push_back(8).unwrap();
    let before = snapshot(&v);

    alloc.fail_next();
    assert!(v.shrink_to_fit().is_err());
    assert_eq!(snapshot(&v), before);
    assert_eq!(v.capacity(), 16);
}

#[test]
fn extend_failure_adds_nothing() {
    let alloc = FaultyAllocator::new();
    let mut v = AllocVec::with_hint_in(2, &alloc).unwrap();
    v.push_back(1u32).unwrap();
    let before = snapshot(&v);

    alloc.fail_next();
    assert!(v.try_extend_from_slice(&[2, 3, 4, 5]).is_err());
    assert_eq!(snapshot(&v), before);
}

#[test]
fn preconditions_are_not_allocation_failures() {
    let alloc = FaultyAllocator::new();
    let mut v: AllocVec<'_, u32, _> = AllocVec::new_in(&alloc);
    alloc.fail_next();
    let err = v.pop_back().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
    // The precondition was rejected before the allocator was consulted.
    assert_eq!(alloc.injected_failures(), 0);
}

#[test]
fn failures_never_leak() {
    let tracking = TrackingAllocator::new();
    let faulty = FaultyAllocator::wrapping(&tracking);
    {
        let mut v = AllocVec::new_in(&faulty);
        for i in 0..20u64 {
            v.push_back(i).unwrap();
        }
        faulty.fail_next();
        assert!(v.reserve(10_000).is_err());
        faulty.heal();
        v.push_back(20).unwrap();
        assert_eq!(v.len(), 21);
    }
    tracking.assert_no_leaks();
}
