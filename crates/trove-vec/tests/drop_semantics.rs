//! Integration test: element lifetimes.
//!
//! Every element handed to the container is destroyed exactly once:
//! either by the container (clear, drop) in index order, or by the
//! caller after `pop_back`/`remove_at` returns ownership.

use trove_test_utils::{DropLog, DropProbe, TrackingAllocator};
use trove_vec::AllocVec;

fn filled<'a>(
    alloc: &'a TrackingAllocator,
    log: &DropLog,
    ids: std::ops::Range<u32>,
) -> AllocVec<'a, DropProbe, TrackingAllocator> {
    let mut v = AllocVec::new_in(alloc);
    for id in ids {
        v.push_back(log.probe(id)).unwrap();
    }
    v
}

#[test]
fn drop_destroys_in_index_order() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    drop(filled(&alloc, &log, 0..6));
    assert_eq!(log.dropped(), vec![0, 1, 2, 3, 4, 5]);
    alloc.assert_no_leaks();
}

#[test]
fn growth_relocates_without_dropping() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let v = filled(&alloc, &log, 0..100);
    assert_eq!(log.count(), 0);
    assert_eq!(alloc.live_blocks(), 1);
    drop(v);
    assert_eq!(log.count(), 100);
    alloc.assert_no_leaks();
}

#[test]
fn clear_destroys_once_and_keeps_storage() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let mut v = filled(&alloc, &log, 0..4);
    v.clear();
    assert_eq!(log.dropped(), vec![0, 1, 2, 3]);
    assert_eq!(alloc.live_blocks(), 1);

    drop(v);
    assert_eq!(log.count(), 4);
    alloc.assert_no_leaks();
}

#[test]
fn pop_back_hands_ownership_to_caller() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let mut v = filled(&alloc, &log, 0..3);
    let last = v.pop_back().unwrap();
    assert_eq!(last.id(), 2);
    assert_eq!(log.count(), 0);
    drop(last);
    assert_eq!(log.dropped(), vec![2]);

    drop(v);
    assert_eq!(log.dropped(), vec![2, 0, 1]);
}

#[test]
fn remove_at_shifts_without_dropping_survivors() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let mut v = filled(&alloc, &log, 0..5);
    let removed = v.remove_at(1).unwrap();
    assert_eq!(removed.id(), 1);
    assert_eq!(log.count(), 0);
    let ids: Vec<u32> = v.iter().map(DropProbe::id).collect();
    assert_eq!(ids, vec![0, 2, 3, 4]);

    drop(removed);
    drop(v);
    assert_eq!(log.dropped(), vec![1, 0, 2, 3, 4]);
    alloc.assert_no_leaks();
}

#[test]
fn insert_at_shifts_without_dropping() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let mut v = filled(&alloc, &log, 0..3);
    v.insert_at(0, log.probe(10)).unwrap();
    v.insert_at(2, log.probe(11)).unwrap();
    assert_eq!(log.count(), 0);
    drop(v);
    assert_eq!(log.dropped(), vec![10, 0, 11, 1, 2]);
}

#[test]
fn unwritten_slot_constructs_nothing() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let mut v = filled(&alloc, &log, 0..2);
    drop(v.insert_uninit(0).unwrap());
    drop(v.push_uninit().unwrap());
    assert_eq!(v.len(), 2);
    drop(v);
    assert_eq!(log.dropped(), vec![0, 1]);
    alloc.assert_no_leaks();
}

#[test]
fn shrink_to_fit_keeps_every_element_alive() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let mut v = AllocVec::with_hint_in(32, &alloc).unwrap();
    for id in 0..3 {
        v.push_back(log.probe(id)).unwrap();
    }
    v.shrink_to_fit().unwrap();
    assert_eq!(v.capacity(), 3);
    assert_eq!(log.count(), 0);
    drop(v);
    assert_eq!(log.dropped(), vec![0, 1, 2]);
    alloc.assert_no_leaks();
}

#[test]
fn failed_push_drops_only_the_rejected_value() {
    let tracking = TrackingAllocator::new();
    let faulty = trove_test_utils::FaultyAllocator::wrapping(&tracking);
    let log = DropLog::new();
    {
        let mut v = AllocVec::new_in(&faulty);
        v.push_back(log.probe(0)).unwrap();
        faulty.fail_next();
        assert!(v.push_back(log.probe(1)).is_err());
        assert_eq!(log.dropped(), vec![1]);
        assert_eq!(v.len(), 1);
        faulty.heal();
    }
    assert_eq!(log.dropped(), vec![1, 0]);
    tracking.assert_no_leaks();
}

#[test]
fn cursor_removal_hands_ownership_to_caller() {
    let alloc = TrackingAllocator::new();
    let log = DropLog::new();
    let mut v = filled(&alloc, &log, 0..4);
    {
        let mut cursor = v.begin_mut();
        cursor.advance().unwrap();
        let taken = cursor.remove_current().unwrap();
        assert_eq!(taken.id(), 1);
        assert_eq!(log.count(), 0);
        assert_eq!(cursor.current().unwrap().id(), 2);
    }
    assert_eq!(log.dropped(), vec![1]);
    drop(v);
    assert_eq!(log.dropped(), vec![1, 0, 2, 3]);
    alloc.assert_no_leaks();
}
