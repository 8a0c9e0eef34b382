use rust_data_aggregation::ingestion::json::{ingest_json_from_path, ingest_json_from_str};
use rust_data_aggregation::types::Value;

#[test]
fn ingest_json_array_from_path_happy_path() {
    let records = ingest_json_from_path("tests/fixtures/placements.json").unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].value("_id"), &Value::Int64(1));
    assert_eq!(records[0].value("revenue"), &Value::Float64(12.25));
    assert_eq!(records[1].value("revenue"), &Value::from("4.50"));
    assert!(!records[2].contains("website"));
}

#[test]
fn ingest_json_ndjson_happy_path() {
    let input = r#"
{"source":"admeta","revenue":1}
{"source":"adx","revenue":2.5,"note":null}
"#;
    let records = ingest_json_from_str(input).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("note"), Some(&Value::Null));
}

#[test]
fn ingest_json_errors_on_nested_field() {
    let input = r#"[{"source":"admeta","user":{"name":"Ada"}}]"#;
    let err = ingest_json_from_str(input).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("field 'user'"));
}

#[test]
fn ingest_json_errors_on_invalid_ndjson_line() {
    let input = "{\"source\":\"a\"}\n{not json}\n";
    let err = ingest_json_from_str(input).unwrap_err();
    assert!(err.to_string().contains("invalid ndjson at line 2"));
}

#[test]
fn ingest_json_errors_on_missing_file() {
    let err = ingest_json_from_path("tests/fixtures/does_not_exist.json").unwrap_err();
    assert!(err.to_string().contains("io error"));
}
