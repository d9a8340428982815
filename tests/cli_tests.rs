use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn netbalance(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_netbalance"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_generate_inspect_run_pipeline() {
    let dir = TempDir::new().unwrap();
    let workload = dir.path().join("workload.txt");
    let trajectory = dir.path().join("trajectory.csv");
    let summary = dir.path().join("summary.json");

    let out = netbalance(&[
        "generate",
        "--groups",
        "12",
        "--buckets",
        "4",
        "--seed",
        "7",
        "--out",
        path_str(&workload),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(workload.exists());

    let out = netbalance(&["inspect", "--workload", path_str(&workload)]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Fitness lower bound"));
    assert!(stdout.contains("Greedy distribution"));

    let out = netbalance(&[
        "run",
        "--workload",
        path_str(&workload),
        "--strategy",
        "crossover",
        "--generations",
        "30",
        "--population-size",
        "6",
        "--trials",
        "2",
        "--seed",
        "7",
        "--trajectory",
        path_str(&trajectory),
        "--summary",
        path_str(&summary),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(trajectory.exists());
    assert!(summary.exists());
}

#[test]
fn test_run_requires_a_strategy() {
    let out = netbalance(&["run", "--generations", "5"]);
    assert!(!out.status.success());
}

#[test]
fn test_run_without_workload_generates_one() {
    let out = netbalance(&[
        "run",
        "--strategy",
        "two-random",
        "--groups",
        "10",
        "--buckets",
        "3",
        "--generations",
        "10",
        "--seed",
        "1",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("TRIALS"));
}

#[test]
fn test_missing_workload_file_fails() {
    let out = netbalance(&["inspect", "--workload", "/no/such/workload.txt"]);
    assert!(!out.status.success());
}
