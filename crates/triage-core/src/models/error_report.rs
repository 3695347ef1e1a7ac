use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{TriageResult, ValidationError};
use crate::identity::{fingerprint_of, identity_of, Fingerprint, Identity};

/// Arbitrary structured key/value data attached to a report.
pub type JsonMap = serde_json::Map<String, Value>;

/// One backtrace frame, as reported by the client library.
pub type Frame = JsonMap;

/// A raw error report as sent by an instrumented application.
/// Ephemeral: consumed by ingest, never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub project: String,
    pub language: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    /// Seconds since the epoch; sub-second precision is kept.
    pub timestamp: f64,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: JsonMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub backtrace: Vec<Frame>,
}

/// Clients always send `context`/`backtrace`, sometimes as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

type FieldCheck = fn(&Value) -> bool;

const REQUIRED_FIELDS: [(&str, &str, FieldCheck); 5] = [
    ("project", "a string", Value::is_string),
    ("language", "a string", Value::is_string),
    ("type", "a string", Value::is_string),
    ("message", "a string", Value::is_string),
    ("timestamp", "a number", Value::is_number),
];

impl ErrorReport {
    pub fn new(
        project: impl Into<String>,
        language: impl Into<String>,
        error_type: impl Into<String>,
        message: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Self {
            project: project.into(),
            language: language.into(),
            error_type: error_type.into(),
            message: message.into(),
            timestamp,
            file: None,
            line: None,
            context: JsonMap::new(),
            backtrace: Vec::new(),
        }
    }

    pub fn with_location(mut self, file: impl Into<String>, line: i64) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_context(mut self, context: JsonMap) -> Self {
        self.context = context;
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.backtrace.push(frame);
        self
    }

    /// Parse and validate a report from its JSON wire form.
    pub fn from_json(value: Value) -> TriageResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ValidationError::Malformed("report must be a JSON object".to_string()))?;

        for (field, expected, check) in REQUIRED_FIELDS {
            match obj.get(field) {
                None | Some(Value::Null) => {
                    return Err(ValidationError::MissingField { field }.into());
                }
                Some(v) if !check(v) => {
                    return Err(ValidationError::InvalidField {
                        field,
                        reason: format!("expected {expected}"),
                    }
                    .into());
                }
                Some(_) => {}
            }
        }

        let report: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        report.validate()?;
        Ok(report)
    }

    /// Check field constraints. Runs before any store mutation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("project", &self.project),
            ("language", &self.language),
            ("type", &self.error_type),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if !self.timestamp.is_finite() {
            return Err(ValidationError::InvalidField {
                field: "timestamp",
                reason: "must be a finite number".to_string(),
            });
        }
        if let Some(line) = self.line {
            if line < 0 {
                return Err(ValidationError::InvalidField {
                    field: "line",
                    reason: format!("must not be negative, got {line}"),
                });
            }
        }
        Ok(())
    }

    pub fn identity(&self) -> Identity {
        identity_of(&self.project, &self.language, &self.error_type, &self.message)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint_of(&self.identity())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::TriageError;

    fn wire() -> Value {
        json!({
            "project": "p1",
            "language": "py",
            "type": "ValueError",
            "message": "invalid literal '42'",
            "timestamp": 1_700_000_000.25,
            "file": "app.py",
            "line": 10,
            "context": {"user": 7},
            "backtrace": [{"function": "main", "line": 3}]
        })
    }

    #[test]
    fn parses_full_report() {
        let report = ErrorReport::from_json(wire()).unwrap();
        assert_eq!(report.error_type, "ValueError");
        assert_eq!(report.timestamp, 1_700_000_000.25);
        assert_eq!(report.line, Some(10));
        assert_eq!(report.backtrace.len(), 1);
        assert_eq!(report.context["user"], json!(7));
    }

    #[test]
    fn optional_fields_default() {
        let report = ErrorReport::from_json(json!({
            "project": "p1", "language": "py", "type": "E", "message": "", "timestamp": 1
        }))
        .unwrap();
        assert!(report.file.is_none());
        assert!(report.context.is_empty());
        assert!(report.backtrace.is_empty());
    }

    #[test]
    fn null_context_and_backtrace_read_as_empty() {
        let report = ErrorReport::from_json(json!({
            "project": "p1", "language": "py", "type": "E", "message": "m", "timestamp": 1,
            "file": null, "line": null, "context": null, "backtrace": null
        }))
        .unwrap();
        assert!(report.file.is_none());
        assert!(report.line.is_none());
        assert!(report.context.is_empty());
        assert!(report.backtrace.is_empty());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        for field in ["project", "language", "type", "message", "timestamp"] {
            let mut value = wire();
            value.as_object_mut().unwrap().remove(field);
            match ErrorReport::from_json(value) {
                Err(TriageError::Validation(ValidationError::MissingField { field: f })) => {
                    assert_eq!(f, field)
                }
                other => panic!("expected MissingField for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn mistyped_field_is_rejected() {
        let mut value = wire();
        value["timestamp"] = json!("yesterday");
        assert!(matches!(
            ErrorReport::from_json(value),
            Err(TriageError::Validation(ValidationError::InvalidField { field: "timestamp", .. }))
        ));
    }

    #[test]
    fn blank_identity_component_is_rejected() {
        let report = ErrorReport::new("p1", " ", "E", "m", 1.0);
        assert!(matches!(
            report.validate(),
            Err(ValidationError::InvalidField { field: "language", .. })
        ));
    }

    #[test]
    fn negative_line_is_rejected() {
        let report = ErrorReport::new("p1", "py", "E", "m", 1.0).with_location("a.py", -1);
        assert!(report.validate().is_err());
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(
            ErrorReport::from_json(json!([1, 2])),
            Err(TriageError::Validation(ValidationError::Malformed(_)))
        ));
    }
}
