//! Analysis step registry
//!
//! Steps are named, pluggable functions computing structured output from one
//! frame. Workers resolve each configured step name against a [`StepRegistry`]
//! on every iteration; a step may also carry an alert rule that inspects its
//! output and emits a human-readable alert string.
//!
//! Two degradation policies are deliberate and identical in shape:
//! - an unknown step name evaluates to an empty result (logged, never fatal);
//! - a step returning an error evaluates to an empty result (logged), and the
//!   rest of the pipeline still runs.

pub mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::source::Frame;

/// One step's output: field name to value (e.g. counts)
pub type ResultFields = HashMap<String, Value>;

/// One stream's latest output: step name to that step's fields
///
/// Replaced wholesale on every worker iteration, never merged.
pub type ResultRecord = HashMap<String, ResultFields>;

/// A named analysis step: frame in, structured fields out
pub type StepFn = Arc<dyn Fn(&Frame) -> Result<ResultFields, StepError> + Send + Sync>;

/// Per-step alert predicate: inspects a step's output for one stream and
/// optionally emits a formatted alert naming that stream
pub type AlertRule = Arc<dyn Fn(&str, &ResultFields) -> Option<String> + Send + Sync>;

/// Error returned by a failing analysis step
#[derive(Debug, Clone)]
pub struct StepError {
    message: String,
}

impl StepError {
    /// Create a new step error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StepError {}

struct StepEntry {
    run: StepFn,
    alert: Option<AlertRule>,
}

/// Registry of named analysis steps and their alert rules
///
/// Built once at startup and shared (`Arc`) across all workers; immutable
/// after construction, so lookups need no locking.
#[derive(Default)]
pub struct StepRegistry {
    steps: HashMap<String, StepEntry>,
}

impl StepRegistry {
    /// Create an empty registry (every step name is a miss)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with the built-in dummy models
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Register a step without an alert rule
    pub fn register<F>(&mut self, name: impl Into<String>, step: F)
    where
        F: Fn(&Frame) -> Result<ResultFields, StepError> + Send + Sync + 'static,
    {
        self.steps.insert(
            name.into(),
            StepEntry {
                run: Arc::new(step),
                alert: None,
            },
        );
    }

    /// Register a step together with its alert rule
    pub fn register_with_alert<F, A>(&mut self, name: impl Into<String>, step: F, alert: A)
    where
        F: Fn(&Frame) -> Result<ResultFields, StepError> + Send + Sync + 'static,
        A: Fn(&str, &ResultFields) -> Option<String> + Send + Sync + 'static,
    {
        self.steps.insert(
            name.into(),
            StepEntry {
                run: Arc::new(step),
                alert: Some(Arc::new(alert)),
            },
        );
    }

    /// Whether a step name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Registered step names, in no particular order
    pub fn names(&self) -> Vec<&str> {
        self.steps.keys().map(String::as_str).collect()
    }

    /// Evaluate one step against one frame
    ///
    /// Registry misses and step errors both degrade to an empty result so a
    /// misconfigured pipeline keeps the stream alive.
    pub fn evaluate(&self, name: &str, frame: &Frame) -> ResultFields {
        match self.steps.get(name) {
            Some(entry) => match (entry.run)(frame) {
                Ok(fields) => fields,
                Err(e) => {
                    tracing::warn!(step = name, error = %e, "Analysis step failed");
                    ResultFields::new()
                }
            },
            None => {
                tracing::warn!(step = name, "Unknown analysis step, producing empty result");
                ResultFields::new()
            }
        }
    }

    /// Run the step's alert rule, if it has one
    pub fn check_alert(&self, name: &str, stream_id: &str, fields: &ResultFields) -> Option<String> {
        self.steps
            .get(name)
            .and_then(|entry| entry.alert.as_ref())
            .and_then(|rule| rule(stream_id, fields))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    fn frame() -> Frame {
        Frame::new(0, Bytes::from_static(b"frame"))
    }

    #[test]
    fn test_registered_step_runs() {
        let mut registry = StepRegistry::new();
        registry.register("count", |f: &Frame| {
            let mut fields = ResultFields::new();
            fields.insert("index".to_string(), json!(f.index));
            Ok(fields)
        });

        let fields = registry.evaluate("count", &frame());
        assert_eq!(fields["index"], json!(0));
    }

    #[test]
    fn test_unknown_step_degrades_to_empty() {
        let registry = StepRegistry::new();
        let fields = registry.evaluate("nope", &frame());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_failing_step_degrades_to_empty() {
        let mut registry = StepRegistry::new();
        registry.register("broken", |_: &Frame| Err(StepError::new("model crashed")));

        let fields = registry.evaluate("broken", &frame());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_alert_rule_fires_on_match() {
        let mut registry = StepRegistry::new();
        registry.register_with_alert(
            "hits",
            |_: &Frame| {
                let mut fields = ResultFields::new();
                fields.insert("hits".to_string(), json!(2));
                Ok(fields)
            },
            |stream_id: &str, fields: &ResultFields| {
                let hits = fields.get("hits").and_then(Value::as_i64).unwrap_or(0);
                (hits > 0).then(|| format!("Hits detected in {}!", stream_id))
            },
        );

        let fields = registry.evaluate("hits", &frame());
        let alert = registry.check_alert("hits", "cam1", &fields);
        assert_eq!(alert.as_deref(), Some("Hits detected in cam1!"));
    }

    #[test]
    fn test_no_alert_rule_means_no_alert() {
        let mut registry = StepRegistry::new();
        registry.register("silent", |_: &Frame| Ok(ResultFields::new()));

        let fields = registry.evaluate("silent", &frame());
        assert!(registry.check_alert("silent", "cam1", &fields).is_none());
    }
}
