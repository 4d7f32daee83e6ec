//! Built-in dummy analysis steps
//!
//! Stand-ins for real models, useful for demos and integration tests:
//! - `asset_detection` always reports a fixed asset count;
//! - `defect_analysis` reports a defect roughly every ten seconds of wall
//!   clock and carries an alert rule that fires whenever the count is
//!   positive.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use super::{ResultFields, StepRegistry};
use crate::source::Frame;

/// Register the built-in steps into `registry`
pub fn register_builtins(registry: &mut StepRegistry) {
    registry.register("asset_detection", |_: &Frame| {
        let mut fields = ResultFields::new();
        fields.insert("assets".to_string(), json!(3));
        Ok(fields)
    });

    registry.register_with_alert(
        "defect_analysis",
        |_: &Frame| {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let defects = if secs % 10 == 0 { 1 } else { 0 };

            let mut fields = ResultFields::new();
            fields.insert("defects".to_string(), json!(defects));
            Ok(fields)
        },
        |stream_id: &str, fields: &ResultFields| {
            let defects = fields.get("defects").and_then(Value::as_i64).unwrap_or(0);
            (defects > 0).then(|| format!("Defect detected in {}!", stream_id))
        },
    );
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builtins_are_registered() {
        let registry = StepRegistry::with_builtins();
        assert!(registry.contains("asset_detection"));
        assert!(registry.contains("defect_analysis"));
    }

    #[test]
    fn test_asset_detection_reports_fixed_count() {
        let registry = StepRegistry::with_builtins();
        let frame = Frame::new(0, Bytes::from_static(b"frame"));

        let fields = registry.evaluate("asset_detection", &frame);
        assert_eq!(fields["assets"], json!(3));
    }

    #[test]
    fn test_defect_alert_fires_only_on_positive_count() {
        let registry = StepRegistry::with_builtins();

        let mut clean = ResultFields::new();
        clean.insert("defects".to_string(), json!(0));
        assert!(registry.check_alert("defect_analysis", "cam1", &clean).is_none());

        let mut dirty = ResultFields::new();
        dirty.insert("defects".to_string(), json!(1));
        assert_eq!(
            registry
                .check_alert("defect_analysis", "cam1", &dirty)
                .as_deref(),
            Some("Defect detected in cam1!")
        );
    }
}
