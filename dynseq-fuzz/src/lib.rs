//! Fuzz entry points for dynseq-core
//!
//! Each entry point turns arbitrary bytes into an operation stream, runs it
//! against a `DynSeq` and a `Vec` model, and panics on any disagreement.
//! Hook them up to a libFuzzer harness with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call `fuzz_ops` / `fuzz_alloc_failures` from a `fuzz_target!`

use dynseq_core::{DynSeq, TrackingAllocator};

/// Run a byte-encoded operation stream against `DynSeq` and `Vec`
///
/// Each operation takes a tag byte plus up to two argument bytes.
pub fn fuzz_ops(data: &[u8]) {
    let alloc = TrackingAllocator::new();
    let mut seq = DynSeq::new_in(alloc.clone());
    let mut model: Vec<u8> = Vec::new();

    let mut bytes = data.iter().copied();
    while let Some(tag) = bytes.next() {
        let a = bytes.next().unwrap_or(0);
        let b = bytes.next().unwrap_or(0);
        let (ia, ib) = (a as usize % 48, b as usize % 48);

        match tag % 9 {
            0 => {
                seq.push_back(a).unwrap();
                model.push(a);
            }
            1 => assert_eq!(seq.pop_back(), model.pop()),
            2 => {
                let result = seq.insert(seq.begin() + ia, b);
                if ia <= model.len() {
                    result.unwrap();
                    model.insert(ia, b);
                } else {
                    assert!(result.is_err());
                }
            }
            3 => {
                let result = seq.erase(seq.begin() + ia);
                if ia < model.len() {
                    result.unwrap();
                    model.remove(ia);
                } else {
                    assert!(result.is_err());
                }
            }
            4 => {
                let result = seq.erase_range(seq.begin() + ia, seq.begin() + ib);
                if ia <= ib && ib <= model.len() {
                    result.unwrap();
                    model.drain(ia..ib);
                } else {
                    assert!(result.is_err());
                }
            }
            5 => {
                seq.resize_with_value(ia, b).unwrap();
                model.resize(ia, b);
            }
            6 => seq.reserve(ia).unwrap(),
            7 => seq.shrink_to_fit().unwrap(),
            _ => {
                let copy = seq.clone();
                assert_eq!(copy, seq);
                seq = copy;
            }
        }

        assert_eq!(seq.as_slice(), model.as_slice());
        assert!(seq.len() <= seq.capacity());
    }

    drop(seq);
    assert!(alloc.stats().is_balanced());
}

/// Push, insert and clone under an allocation budget taken from the input
///
/// Once the budget runs out every operation must fail without changing the
/// sequence.
pub fn fuzz_alloc_failures(data: &[u8]) {
    let Some((&budget, rest)) = data.split_first() else {
        return;
    };

    let alloc = TrackingAllocator::new();
    alloc.fail_after(budget as usize % 16);
    let mut seq: DynSeq<String, _> = DynSeq::new_in(alloc.clone());

    for (i, &byte) in rest.iter().enumerate() {
        let before: Vec<String> = seq.iter().cloned().collect();
        let capacity = seq.capacity();

        let failed = match byte % 3 {
            0 => seq.push_back(i.to_string()).is_err(),
            1 => {
                let at = byte as usize % (seq.len() + 1);
                seq.insert(seq.begin() + at, i.to_string()).is_err()
            }
            _ => seq.try_clone().is_err(),
        };

        if failed {
            assert_eq!(seq.as_slice(), before.as_slice());
            assert_eq!(seq.capacity(), capacity);
        }
    }

    drop(seq);
    alloc.disarm();
    assert!(alloc.stats().is_balanced());
}
