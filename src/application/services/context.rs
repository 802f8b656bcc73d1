//! Rendering of retrieved records into the grounding context for generation.

use crate::domain::LogRecord;

/// Separator line terminating each record fragment.
const FRAGMENT_SEPARATOR: &str = "---";

/// Render `records` into the textual context block handed to the generation
/// model.
///
/// Fragments keep the order they were retrieved in; nothing is re-sorted,
/// deduplicated, or truncated here. An empty slice yields an empty block.
pub fn assemble_context(records: &[LogRecord]) -> String {
    let fragments: Vec<String> = records.iter().map(render_record).collect();
    fragments.join("\n")
}

fn render_record(record: &LogRecord) -> String {
    format!(
        "Timestamp: {}\n\
         Error: {}\n\
         Service: {}\n\
         Error Code: {}\n\
         Vehicle: {} (State: {})\n\
         Sensor Readings: {}\n\
         Diagnostic Info: {}\n\
         {}",
        record.timestamp,
        record.message,
        record.service,
        record.error_code,
        record.vehicle_id,
        record.vehicle_state,
        pretty(&record.sensor_readings),
        pretty(&record.diagnostic_info),
        FRAGMENT_SEPARATOR,
    )
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(message: &str, error_code: &str) -> LogRecord {
        LogRecord {
            score: 0.9,
            timestamp: "2024-05-01T10:00:00Z".into(),
            message: message.into(),
            service: "battery-monitor".into(),
            error_code: error_code.into(),
            vehicle_id: "VH-1042".into(),
            vehicle_state: "PARKED".into(),
            sensor_readings: json!({ "battery_voltage": 11.2 }),
            diagnostic_info: json!({}),
        }
    }

    #[test]
    fn empty_records_yield_empty_block() {
        assert_eq!(assemble_context(&[]), "");
    }

    #[test]
    fn fragment_carries_all_fields() {
        let block = assemble_context(&[record("battery voltage below threshold", "BAT_LOW")]);

        assert!(block.contains("Timestamp: 2024-05-01T10:00:00Z"));
        assert!(block.contains("Error: battery voltage below threshold"));
        assert!(block.contains("Service: battery-monitor"));
        assert!(block.contains("Error Code: BAT_LOW"));
        assert!(block.contains("Vehicle: VH-1042 (State: PARKED)"));
        assert!(block.contains("battery_voltage"));
        assert!(block.ends_with(FRAGMENT_SEPARATOR));
    }

    #[test]
    fn fragments_keep_retrieval_order() {
        let block = assemble_context(&[record("first", "E1"), record("second", "E2")]);
        let first = block.find("Error: first").expect("first fragment");
        let second = block.find("Error: second").expect("second fragment");
        assert!(first < second);
    }
}
