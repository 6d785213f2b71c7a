use anyhow::{Context, Result};
use colored::*;
use dynseq_core::{AllocStats, DynSeq, TrackingAllocator};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Capacity change observed while pushing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Length after the push that triggered the change
    pub len: usize,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthReport {
    pub count: usize,
    pub transitions: Vec<Transition>,
    pub final_capacity: usize,
    /// Capacity after `shrink_to_fit`, when requested
    pub shrunk_capacity: Option<usize>,
    pub stats: AllocStats,
}

/// Push `count` integers into a tracked sequence and record every
/// capacity change
pub fn measure(count: usize, shrink: bool) -> Result<GrowthReport> {
    let alloc = TrackingAllocator::new();
    let mut seq = DynSeq::new_in(alloc.clone());
    let mut transitions = Vec::new();

    for i in 0..count {
        let before = seq.capacity();
        seq.push_back(i)
            .with_context(|| format!("Push {} of {} failed", i + 1, count))?;
        if seq.capacity() != before {
            transitions.push(Transition {
                len: seq.len(),
                from: before,
                to: seq.capacity(),
            });
        }
    }

    let final_capacity = seq.capacity();
    let shrunk_capacity = if shrink {
        seq.shrink_to_fit().context("shrink_to_fit failed")?;
        Some(seq.capacity())
    } else {
        None
    };
    drop(seq);

    Ok(GrowthReport {
        count,
        transitions,
        final_capacity,
        shrunk_capacity,
        stats: alloc.stats(),
    })
}

pub fn execute(count: usize, shrink: bool) -> Result<()> {
    info!("Measuring growth over {} pushes", count);

    let report = measure(count, shrink)?;

    println!("\n=== Capacity Transitions ===");
    for t in &report.transitions {
        println!("len {:>8}: {:>8} -> {}", t.len, t.from, t.to.to_string().cyan());
    }

    println!("\n=== Summary ===");
    println!("Pushes:             {}", report.count);
    println!("Reallocations:      {}", report.transitions.len());
    println!("Final capacity:     {}", report.final_capacity);
    if let Some(cap) = report.shrunk_capacity {
        println!("After shrink:       {}", cap);
    }
    println!("Peak slots:         {}", report.stats.peak_slots);

    if report.stats.is_balanced() {
        println!("{} Every block and value released", "✓".green());
    } else {
        println!("{} Allocator ledger is unbalanced", "✗".red());
    }

    Ok(())
}
