use std::fs;
use tempfile::tempdir;

use dynseq_cli::commands::replay::{self, Operation, ReplayReport};
use serde_json::json;

fn write_file<P: AsRef<std::path::Path>>(p: P, s: &str) {
    fs::write(p, s.as_bytes()).unwrap();
}

#[test]
fn replay_parses_tagged_operations() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("ops.json");

    let input = r#"[
      {"op": "push", "value": 1},
      {"op": "insert", "index": 0, "value": "zero"},
      {"op": "erase_range", "first": 0, "last": 1},
      {"op": "resize", "count": 3},
      {"op": "shrink"}
    ]"#;
    write_file(&in_path, input);

    let ops = replay::load_operations(in_path.to_str().unwrap()).unwrap();
    assert_eq!(ops.len(), 5);
    assert_eq!(
        ops[1],
        Operation::Insert {
            index: 0,
            value: json!("zero")
        }
    );
    assert_eq!(
        ops[3],
        Operation::Resize {
            count: 3,
            value: serde_json::Value::Null
        }
    );
}

#[test]
fn replay_scenario_matches_expected_state() {
    let ops = vec![
        Operation::Push { value: json!(1) },
        Operation::Push { value: json!(2) },
        Operation::Push { value: json!(3) },
        Operation::Erase { index: 1 },
        Operation::Insert {
            index: 1,
            value: json!(2),
        },
        Operation::Resize {
            count: 5,
            value: json!(0),
        },
        Operation::Resize {
            count: 1,
            value: json!(0),
        },
    ];

    let report = replay::replay(&ops, false);
    assert_eq!(report.failures(), 0);
    assert_eq!(report.contents, vec![json!(1)]);
    assert_eq!(report.len, 1);
    assert!(report.capacity >= 5);
    assert!(report.stats.is_balanced());
}

#[test]
fn replay_records_failures_and_continues() {
    let ops = vec![
        Operation::Push { value: json!("a") },
        Operation::Erase { index: 5 },
        Operation::EraseRange { first: 1, last: 0 },
        Operation::Push { value: json!("b") },
    ];

    let report = replay::replay(&ops, false);
    assert_eq!(report.failures(), 2);
    assert!(!report.steps[1].ok);
    assert!(report.steps[1].detail.contains("out of range"));
    assert_eq!(report.stopped_at, None);
    assert_eq!(report.contents, vec![json!("a"), json!("b")]);
}

#[test]
fn replay_stop_on_error_halts() {
    let ops = vec![
        Operation::Pop,
        Operation::Insert {
            index: 3,
            value: json!(true),
        },
        Operation::Push { value: json!(9) },
    ];

    let report = replay::replay(&ops, true);
    assert_eq!(report.stopped_at, Some(1));
    assert_eq!(report.steps.len(), 2);
    assert!(report.contents.is_empty());
}

#[test]
fn replay_execute_writes_report() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("ops.json");
    let out_path = td.path().join("report.json");

    let input = r#"[
      {"op": "reserve", "capacity": 8},
      {"op": "push", "value": {"k": 1}},
      {"op": "push", "value": {"k": 2}},
      {"op": "pop"},
      {"op": "clear"}
    ]"#;
    write_file(&in_path, input);

    replay::execute(
        in_path.to_str().unwrap(),
        Some(out_path.to_str().unwrap()),
        /*stop_on_error*/ false,
    )
    .unwrap();

    let written = fs::read_to_string(&out_path).unwrap();
    let report: ReplayReport = serde_json::from_str(&written).unwrap();
    assert_eq!(report.steps.len(), 5);
    assert_eq!(report.len, 0);
    assert_eq!(report.capacity, 8);
    assert_eq!(report.stats.allocations, 1);
}

#[test]
fn replay_execute_fails_when_stopped() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("ops.json");
    write_file(&in_path, r#"[{"op": "erase", "index": 0}]"#);

    let err = replay::execute(in_path.to_str().unwrap(), None, true).unwrap_err();
    assert!(err.to_string().contains("step 0"));
}

#[test]
fn replay_rejects_malformed_script() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("bad.json");
    write_file(&in_path, r#"[{"op": "teleport"}]"#);

    assert!(replay::load_operations(in_path.to_str().unwrap()).is_err());
    assert!(replay::load_operations(td.path().join("missing.json").to_str().unwrap()).is_err());
}
