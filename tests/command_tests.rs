use goroutine_stats::commands::{execute_analyze, execute_inspect, AnalyzeArgs, InspectArgs, InspectTarget};
use goroutine_stats::output::read_report;
use goroutine_stats::report::SortKey;
use std::fs;
use tempfile::TempDir;

const LOG: &str = r#"{"events": [
    {"type": "go-create", "ts": 0, "g": 0, "args": [1]},
    {"type": "go-start", "ts": 10, "g": 1, "stack": [{"pc": 32, "fn": "main.loop"}]},
    {"type": "go-block-recv", "ts": 40, "g": 1},
    {"type": "go-unblock", "ts": 70, "g": 0, "args": [1]},
    {"type": "go-start", "ts": 75, "g": 1},
    {"type": "go-end", "ts": 100, "g": 1}
]}"#;

fn setup() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("trace.json");
    fs::write(&input, LOG).unwrap();
    (temp_dir, input)
}

#[test]
fn test_analyze_writes_report() {
    let (temp_dir, input) = setup();
    let output = temp_dir.path().join("report.json");

    let args = AnalyzeArgs {
        input,
        output_json: Some(output.clone()),
        sort_key: SortKey::SyncBlock,
        top_groups: 5,
        print_summary: false,
    };
    execute_analyze(args).unwrap();

    let report = read_report(&output).unwrap();
    assert_eq!(report.event_count, 6);
    assert_eq!(report.sort_key, "block");
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].name, "main.loop");

    let g = &report.goroutines[0];
    assert_eq!(g.stat.block_time.total, 30);
    assert_eq!(g.stat.exec_time.total, 55);
    assert_eq!(g.stat.sched_wait_time.total, 15);
    assert_eq!(g.unknown_time, 0);
}

#[test]
fn test_analyze_fails_on_inconsistent_log() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("trace.json");
    fs::write(&input, r#"[{"type": "go-end", "ts": 5, "g": 3}]"#).unwrap();

    let args = AnalyzeArgs {
        input,
        output_json: None,
        ..Default::default()
    };
    assert!(execute_analyze(args).is_err());
}

#[test]
fn test_inspect_regions_of_goroutine() {
    let (_temp_dir, input) = setup();

    let out = execute_inspect(&InspectArgs {
        input,
        target: InspectTarget::Regions { goroutine: 1 },
    })
    .unwrap();

    assert!(out.contains("main.loop"));
    assert!(out.contains("has no regions"));
}

#[test]
fn test_inspect_related() {
    let (_temp_dir, input) = setup();

    let out = execute_inspect(&InspectArgs {
        input,
        target: InspectTarget::Related { goroutine: 1 },
    })
    .unwrap();

    assert_eq!(out, "Related to goroutine 1: 0 1");
}
