//! Integration tests for the public sequence workflow: build → edit → copy → move

use dynseq_core::{dynseq, DynSeq, FixedArray, SeqError, TrackingAllocator};

#[test]
fn test_push_back_sequence() {
    let mut seq = DynSeq::new();
    for value in [1, 2, 3] {
        seq.push_back(value).unwrap();
    }

    assert_eq!(seq.len(), 3);
    assert!(seq.capacity() >= 3);
    assert_eq!(seq.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_edit_scenario() {
    let mut seq = dynseq![1, 2, 3];

    // Step 1: erase the middle value
    let next = seq.erase(seq.begin() + 1usize).unwrap();
    assert_eq!(seq, [1, 3]);
    assert_eq!(next.offset(), 1);

    // Step 2: put it back
    let inserted = seq.insert(seq.begin() + 1usize, 2).unwrap();
    assert_eq!(seq, [1, 2, 3]);
    assert_eq!(seq.cursor(inserted).unwrap().get(), Some(&2));

    // Step 3: grow with defaults, then cut back
    seq.resize(5).unwrap();
    assert_eq!(seq, [1, 2, 3, 0, 0]);
    seq.resize(1).unwrap();
    assert_eq!(seq, [1]);
    assert!(seq.capacity() >= 5);
}

#[test]
fn test_pop_and_shrink_scenario() {
    let mut seq = dynseq![10, 20, 30];
    assert_eq!(seq.pop_back(), Some(30));
    assert_eq!(seq.pop_back(), Some(20));
    seq.shrink_to_fit().unwrap();

    assert_eq!(seq.len(), 1);
    assert_eq!(seq.capacity(), 1);
    assert_eq!(seq[0], 10);
}

#[test]
fn test_erase_reinsert_round_trip() {
    let original = dynseq!['a', 'b', 'c', 'd', 'e'];
    for index in 0..original.len() {
        let mut seq = original.clone();
        let removed = seq[index];
        let at = seq.erase(seq.begin() + index).unwrap();
        seq.insert(at, removed).unwrap();
        assert_eq!(seq, original);
    }
}

#[test]
fn test_reserve_noop_and_growth() {
    let mut seq: DynSeq<u16> = DynSeq::with_capacity(8).unwrap();
    seq.reserve(4).unwrap();
    assert_eq!(seq.capacity(), 8);

    seq.push_back(1).unwrap();
    seq.reserve(100).unwrap();
    assert_eq!(seq.capacity(), 100);
    assert_eq!(seq, [1]);
}

#[test]
fn test_clone_independence() {
    let mut original = dynseq![String::from("left"), String::from("right")];
    let copy = original.clone();
    original[0].clear();
    original.push_back(String::from("extra")).unwrap();

    assert_eq!(copy, ["left", "right"]);
    assert_eq!(original, ["", "right", "extra"]);
}

#[test]
fn test_take_leaves_source_empty() {
    let mut source = dynseq![1, 2, 3];
    let mut target = dynseq![9];
    assert_eq!(target.len(), 1);
    target = source.take();

    assert_eq!(target, [1, 2, 3]);
    assert!(source.is_empty());
    assert_eq!(source.capacity(), 0);
    assert!(source.data().is_null());

    // The emptied source is still usable
    source.push_back(4).unwrap();
    assert_eq!(source, [4]);
}

#[test]
fn test_at_bounds() {
    let mut seq = dynseq![5, 6];
    assert_eq!(*seq.at(1).unwrap(), 6);
    assert_eq!(seq.at(2), Err(SeqError::OutOfRange { index: 2, len: 2 }));
    assert!(seq.at_mut(9).unwrap_err().is_out_of_range());
}

#[test]
#[should_panic]
fn test_index_out_of_bounds_panics() {
    let seq = dynseq![1];
    let _value = seq[1];
}

#[test]
fn test_positions_invalidated_by_reallocation() {
    let mut seq = DynSeq::new();
    seq.push_back(1).unwrap();
    let stale = seq.end();

    // Capacity 1 → 2 relocates the block
    seq.push_back(2).unwrap();
    assert!(matches!(
        seq.insert(stale, 3),
        Err(SeqError::InvalidatedPosition { .. })
    ));
    assert!(seq.cursor(stale).is_err());
    assert_eq!(seq, [1, 2]);
}

#[test]
fn test_cursor_traversal() {
    let seq = dynseq![1, 2, 3, 4];

    let forward: Vec<_> = seq.iter().copied().collect();
    let backward: Vec<_> = seq.rbegin().copied().collect();
    assert_eq!(forward, [1, 2, 3, 4]);
    assert_eq!(backward, [4, 3, 2, 1]);

    let cursor = seq.cursor(seq.begin() + 2usize).unwrap();
    assert_eq!(cursor.get(), Some(&3));
    assert_eq!(cursor.peek(-2), Some(&1));
    assert!((cursor + 2usize).is_end());
    assert_eq!(cursor.position() - seq.begin(), 2);
}

#[test]
fn test_into_iter_and_collect() {
    let seq: DynSeq<u32> = (1..=5).collect();
    let doubled: DynSeq<u32> = seq.into_iter().map(|v| v * 2).collect();
    assert_eq!(doubled, [2, 4, 6, 8, 10]);

    let mut sum = 0;
    for value in &doubled {
        sum += value;
    }
    assert_eq!(sum, 30);
}

#[test]
fn test_extend_and_slice_methods() {
    let mut seq = dynseq![3, 1, 2];
    seq.extend([5, 4]);
    seq.sort();
    assert_eq!(seq, [1, 2, 3, 4, 5]);
    assert!(seq.contains(&4));
    assert_eq!(seq.iter().rev().next(), Some(&5));
}

#[test]
fn test_tracked_workflow_is_balanced() {
    let alloc = TrackingAllocator::new();
    {
        let mut seq = DynSeq::new_in(alloc.clone());
        for i in 0..20 {
            seq.push_back(format!("value-{}", i)).unwrap();
        }
        seq.erase_range(seq.begin() + 5usize, seq.begin() + 15usize)
            .unwrap();
        seq.shrink_to_fit().unwrap();
        let copy = seq.try_clone().unwrap();
        assert_eq!(copy.len(), 10);
    }

    let stats = alloc.stats();
    assert_eq!(stats.constructed, 30);
    assert!(stats.is_balanced());
    assert!(stats.peak_slots >= 32);
}

#[test]
fn test_serde_round_trip() {
    let seq = dynseq![String::from("x"), String::from("y")];
    let json = serde_json::to_string(&seq).unwrap();
    assert_eq!(json, r#"["x","y"]"#);

    let back: DynSeq<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, seq);
}

#[test]
fn test_fixed_array_basics() {
    let mut arr: FixedArray<i32, 3> = FixedArray::from_slice(&[3, 1]).unwrap();
    arr.push(2).unwrap();
    assert!(matches!(
        arr.push(0),
        Err(SeqError::LengthExceeded { max: 3, .. })
    ));
    arr.sort();
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(arr.get::<0>(), Some(&1));
}
