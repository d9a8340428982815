mod common;

use common::random_workload;
use netbalance::optimizer::Distribution;
use netbalance::workload::{loader, Workload};
use netbalance::BalanceError;
use rstest::rstest;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const SAMPLE: &str = "2 3
SEPARATOR FOR TOPICorders
PARTITION SEPARATOR0 40
1 10
2 25
SEPARATOR FOR TOPICclicks
PARTITION SEPARATOR0 7
1 7
2 9
";

#[test]
fn test_parse_text_sample() {
    let w = loader::parse_text(SAMPLE).unwrap();
    assert_eq!(w.group_count(), 2);
    assert_eq!(w.bucket_count(), 3);
    assert_eq!(w.group(0).name, "orders");
    assert_eq!(w.load(0, 0), 10);
    assert_eq!(w.group(0).units[0].index, 1);
    assert_eq!(w.load(0, 2), 40);
    assert_eq!(w.total_load(), 98);
}

#[rstest]
#[case("")]
#[case("two three\n")]
#[case("2\n")]
#[case("1 2\nSEPARATOR FOR TOPIC t\n0 1\n1 2\n")]
#[case("1 2\nSEPARATOR FOR TOPIC t\nPARTITION SEPARATOR0 1\n1\n")]
#[case("1 2\nSEPARATOR FOR TOPIC t\nPARTITION SEPARATOR0 1\n1 x\n")]
#[case("2 2\nSEPARATOR FOR TOPIC t\nPARTITION SEPARATOR0 1\n1 2\n")]
#[case("1 3\nSEPARATOR FOR TOPIC t\nPARTITION SEPARATOR0 1\n1 2\n")]
fn test_malformed_text_is_rejected(#[case] content: &str) {
    assert!(matches!(
        loader::parse_text(content),
        Err(BalanceError::Validation(_))
    ));
}

#[rstest]
#[case("2 2\nSEPARATOR FOR TOPICa\nPARTITION SEPARATOR0 18446744073709551615\n1 1\nSEPARATOR FOR TOPICb\nPARTITION SEPARATOR0 0\n1 0\n")]
#[case("2 1\nSEPARATOR FOR TOPICa\nPARTITION SEPARATOR0 9223372036854775808\nSEPARATOR FOR TOPICb\nPARTITION SEPARATOR0 9223372036854775808\n")]
fn test_total_load_past_u64_is_rejected(#[case] content: &str) {
    assert!(matches!(
        loader::parse_text(content),
        Err(BalanceError::Config(_))
    ));
}

#[test]
fn test_total_load_at_u64_max_is_accepted() {
    let content = "1 2\nSEPARATOR FOR TOPICa\nPARTITION SEPARATOR0 18446744073709551614\n1 1\n";
    let w = loader::parse_text(content).unwrap();
    assert_eq!(w.total_load(), u64::MAX);

    let greedy = Distribution::greedy(Arc::new(w));
    greedy.verify().unwrap();
    assert_eq!(greedy.fitness(), u64::MAX - 2);
}

#[rstest]
#[case("workload.txt")]
#[case("workload.json")]
fn test_save_then_load_preserves_workload(#[case] file_name: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    let original = random_workload(9, 4, 77);

    loader::save_to_file(&original, &path).unwrap();
    let loaded = loader::load_from_file(&path).unwrap();
    assert_eq!(&loaded, original.as_ref());
}

#[test]
fn test_json_format_is_an_array_of_groups() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("w.json");
    fs::write(
        &path,
        r#"[{"name":"a","units":[{"index":0,"value":3},{"index":1,"value":1}]}]"#,
    )
    .unwrap();

    let w: Workload = loader::load_from_file(&path).unwrap();
    assert_eq!(w.bucket_count(), 2);
    assert_eq!(w.load(0, 0), 1);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        loader::load_from_file(dir.path().join("nope.txt")),
        Err(BalanceError::Io(_))
    ));
}
