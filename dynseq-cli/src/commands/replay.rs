use anyhow::{bail, Context, Result};
use colored::*;
use dynseq_core::{AllocStats, DynSeq, Position, TrackingAllocator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use tracing::{debug, info, warn};

/// One step of a replay script
///
/// Scripts are JSON arrays of objects tagged by `op`, e.g.
/// `{"op": "insert", "index": 1, "value": "x"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Push {
        value: Value,
    },
    Pop,
    Insert {
        index: isize,
        value: Value,
    },
    Erase {
        index: isize,
    },
    EraseRange {
        first: isize,
        last: isize,
    },
    Resize {
        count: usize,
        /// Fill value for new slots
        #[serde(default)]
        value: Value,
    },
    Reserve {
        capacity: usize,
    },
    Shrink,
    Clear,
}

/// Result of applying one operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: usize,
    pub operation: Operation,
    pub ok: bool,
    pub detail: String,
    pub len: usize,
    pub capacity: usize,
}

/// Everything a replay produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub steps: Vec<StepOutcome>,
    /// Step at which the replay stopped early, if it did
    pub stopped_at: Option<usize>,
    pub contents: Vec<Value>,
    pub len: usize,
    pub capacity: usize,
    pub stats: AllocStats,
}

impl ReplayReport {
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }
}

/// Read a script from `input`, or from stdin when `input` is `-`
pub fn load_operations(input: &str) -> Result<Vec<Operation>> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read script from stdin")?;
        buf
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read input file: {}", input))?
    };

    serde_json::from_str(&content).with_context(|| "Failed to parse operation script")
}

fn at(seq: &DynSeq<Value, TrackingAllocator>, index: isize) -> Position {
    seq.begin() + index
}

fn apply(seq: &mut DynSeq<Value, TrackingAllocator>, op: &Operation) -> dynseq_core::Result<String> {
    let detail = match op {
        Operation::Push { value } => {
            seq.push_back(value.clone())?;
            format!("pushed {}", value)
        }
        Operation::Pop => match seq.pop_back() {
            Some(value) => format!("popped {}", value),
            None => "nothing to pop".to_string(),
        },
        Operation::Insert { index, value } => {
            let pos = seq.insert(at(seq, *index), value.clone())?;
            format!("inserted {} at {}", value, pos.offset())
        }
        Operation::Erase { index } => {
            let pos = seq.erase(at(seq, *index))?;
            format!("erased {}, next at {}", index, pos.offset())
        }
        Operation::EraseRange { first, last } => {
            seq.erase_range(at(seq, *first), at(seq, *last))?;
            format!("erased [{}, {})", first, last)
        }
        Operation::Resize { count, value } => {
            seq.resize_with_value(*count, value.clone())?;
            format!("resized to {}", count)
        }
        Operation::Reserve { capacity } => {
            seq.reserve(*capacity)?;
            format!("reserved {}", capacity)
        }
        Operation::Shrink => {
            seq.shrink_to_fit()?;
            "shrunk to fit".to_string()
        }
        Operation::Clear => {
            seq.clear();
            "cleared".to_string()
        }
    };
    Ok(detail)
}

/// Apply `ops` in order to a fresh tracked sequence
///
/// Failed operations are recorded and skipped, or end the replay when
/// `stop_on_error` is set.
pub fn replay(ops: &[Operation], stop_on_error: bool) -> ReplayReport {
    let alloc = TrackingAllocator::new();
    let mut seq = DynSeq::new_in(alloc.clone());
    let mut steps = Vec::with_capacity(ops.len());
    let mut stopped_at = None;

    for (step, op) in ops.iter().enumerate() {
        let (ok, detail) = match apply(&mut seq, op) {
            Ok(detail) => {
                debug!("Step {}: {}", step, detail);
                (true, detail)
            }
            Err(e) => {
                warn!("Step {} ({:?}) failed: {}", step, op, e);
                (false, e.to_string())
            }
        };
        steps.push(StepOutcome {
            step,
            operation: op.clone(),
            ok,
            detail,
            len: seq.len(),
            capacity: seq.capacity(),
        });

        if !ok && stop_on_error {
            stopped_at = Some(step);
            break;
        }
    }

    let len = seq.len();
    let capacity = seq.capacity();
    let contents: Vec<Value> = seq.iter().cloned().collect();
    drop(seq);

    ReplayReport {
        steps,
        stopped_at,
        contents,
        len,
        capacity,
        stats: alloc.stats(),
    }
}

pub fn execute(input: &str, output: Option<&str>, stop_on_error: bool) -> Result<()> {
    info!("Replaying script: {}", input);

    let ops = load_operations(input)?;
    info!("Loaded {} operations", ops.len());

    let report = replay(&ops, stop_on_error);

    println!("\n=== Replay ===");
    for step in &report.steps {
        let mark = if step.ok { "✓".green() } else { "✗".red() };
        println!(
            "{} #{:<4} {:<40} len {:<5} cap {}",
            mark, step.step, step.detail, step.len, step.capacity
        );
    }

    println!("\n=== Final State ===");
    println!("Contents:           {}", Value::Array(report.contents.clone()));
    println!("Length:             {}", report.len);
    println!("Capacity:           {}", report.capacity);

    println!("\n=== Allocator ===");
    println!("Allocations:        {}", report.stats.allocations);
    println!("Deallocations:      {}", report.stats.deallocations);
    println!("Peak slots:         {}", report.stats.peak_slots);
    println!("Values constructed: {}", report.stats.constructed);
    if report.stats.is_balanced() {
        println!("{} Every block and value released", "✓".green());
    } else {
        println!("{} Allocator ledger is unbalanced", "✗".red());
    }

    let failures = report.failures();
    if failures > 0 {
        println!("{} {} operation(s) failed", "!".yellow(), failures);
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize replay report")?;
        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;
        info!("Replay report written to: {}", output_path);
    }

    if let Some(step) = report.stopped_at {
        bail!("Replay stopped at step {}: {}", step, report.steps[step].detail);
    }

    Ok(())
}
