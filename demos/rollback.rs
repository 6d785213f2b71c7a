//! Rollback example: injected allocation failures leave the sequence intact

use dynseq_core::{DynSeq, TrackingAllocator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Dynseq Rollback Example\n");

    let alloc = TrackingAllocator::new();
    let mut seq = DynSeq::new_in(alloc.clone());
    for word in ["one", "two", "three", "four"] {
        seq.push_back(String::from(word))?;
    }
    println!("Before: {:?} (capacity {})", seq, seq.capacity());

    // Refuse every further allocation
    alloc.fail_after(0);

    match seq.push_back(String::from("five")) {
        Ok(()) => println!("push_back unexpectedly succeeded"),
        Err(e) => println!("push_back failed: {}", e),
    }
    match seq.try_clone() {
        Ok(_) => println!("try_clone unexpectedly succeeded"),
        Err(e) => println!("try_clone failed: {}", e),
    }
    println!("After:  {:?} (capacity {})", seq, seq.capacity());

    alloc.disarm();
    seq.push_back(String::from("five"))?;
    println!("Recovered: {:?}", seq);

    drop(seq);
    let stats = alloc.stats();
    println!("\nAllocator stats: {:#?}", stats);
    println!("Balanced: {}", stats.is_balanced());

    Ok(())
}
