use hardmon_protocol::*;
use pretty_assertions::assert_eq;

fn sample_record() -> MetricRecord {
    let mut record = MetricRecord::new(1704067200);
    record.insert("cpu0_clk", "3400.000");
    record.insert("cpu_temp", 41.5);
    record.insert("cpu_load", "0.52");
    record.insert("mem_available", 8_000_000i64);
    record.insert("mem_used", 8_000_000i64);
    record.insert("gpu_load", "12 %");
    record
}

#[test]
fn record_serializes_as_flat_object() {
    let line = sample_record().to_json().unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "time": 1704067200,
            "cpu0_clk": "3400.000",
            "cpu_temp": 41.5,
            "cpu_load": "0.52",
            "mem_available": 8000000,
            "mem_used": 8000000,
            "gpu_load": "12 %",
        })
    );
}

#[test]
fn record_parses_emitted_line() {
    let line = r#"{"time":1704067200,"cpu_temp":41.5,"cpu_load":"0.52","mem_used":8000000}"#;
    let record = MetricRecord::from_json(line).unwrap();

    assert_eq!(record.time, 1704067200);
    assert_eq!(record.get("cpu_temp"), Some(&MetricValue::Float(41.5)));
    assert_eq!(record.get("cpu_load"), Some(&MetricValue::from("0.52")));
    assert_eq!(record.get("mem_used"), Some(&MetricValue::Int(8_000_000)));
    assert!(!record.contains_key("time"));
}

#[test]
fn record_without_time_is_rejected() {
    assert!(MetricRecord::from_json(r#"{"cpu_load":"0.52"}"#).is_err());
}

#[test]
fn emitted_line_is_single_line() {
    let line = sample_record().to_json().unwrap();
    assert!(!line.contains('\n'));
}
