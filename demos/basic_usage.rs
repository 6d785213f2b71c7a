//! Basic usage example

use dynseq_core::{dynseq, DynSeq};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Dynseq Basic Usage Example\n");

    let mut readings = DynSeq::new();
    for i in 1..=6 {
        readings.push_back(i * 10)?;
        println!(
            "push {:>3}: len {}, capacity {}",
            i * 10,
            readings.len(),
            readings.capacity()
        );
    }

    // Positions are plain values; feed them straight back in
    let at = readings.insert(readings.begin() + 2usize, 25)?;
    println!("\nInserted 25 at offset {}: {:?}", at.offset(), readings);

    readings.erase_range(readings.begin(), readings.begin() + 2usize)?;
    println!("Dropped the first two: {:?}", readings);

    println!("Walking backwards:");
    for value in readings.rbegin() {
        println!("  {}", value);
    }

    readings.resize(3)?;
    readings.shrink_to_fit()?;
    println!(
        "\nAfter resize(3) + shrink_to_fit: {:?} (capacity {})",
        readings,
        readings.capacity()
    );

    let labels = dynseq!["alpha", "beta"];
    let copy = labels.clone();
    println!("\nClone of {:?}: {:?}", labels, copy);

    match readings.at(10) {
        Ok(v) => println!("Unexpected value {}", v),
        Err(e) => println!("Checked access failed as expected: {}", e),
    }

    Ok(())
}
