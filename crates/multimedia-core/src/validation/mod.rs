//! Validation error types
//!
//! Every failed field is reported, in declaration order, so callers can render
//! all problems at once instead of fixing them one request at a time.

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// A single field that failed validation, with every reason it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub reasons: Vec<String>,
}

/// One or more field violations reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, thiserror::Error)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Build from `validator` output. `field_order` fixes the reporting order;
    /// fields not listed are appended alphabetically. `renames` maps struct field
    /// names to the names exposed to callers.
    pub fn from_validator(
        errors: &validator::ValidationErrors,
        field_order: &[&str],
        renames: &[(&str, &str)],
    ) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let field = field.to_string();
                let field = renames
                    .iter()
                    .find(|(from, _)| *from == field)
                    .map(|(_, to)| to.to_string())
                    .unwrap_or(field);
                let reasons = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                FieldViolation { field, reasons }
            })
            .collect();

        violations.sort_by(|a, b| {
            let rank = |f: &str| {
                field_order
                    .iter()
                    .position(|o| *o == f)
                    .unwrap_or(field_order.len())
            };
            rank(&a.field)
                .cmp(&rank(&b.field))
                .then_with(|| a.field.cmp(&b.field))
        });

        Self { violations }
    }

    /// Names of the failed fields, in reporting order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.reasons.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_field() {
        let err = ValidationError::new(vec![
            FieldViolation {
                field: "bucket".to_string(),
                reasons: vec!["required".to_string(), "url".to_string()],
            },
            FieldViolation {
                field: "type".to_string(),
                reasons: vec!["unsupported".to_string()],
            },
        ]);
        assert_eq!(err.to_string(), "bucket: required, url; type: unsupported");
        assert_eq!(err.fields(), vec!["bucket", "type"]);
        assert!(err.has_field("type"));
        assert!(!err.has_field("filename"));
        assert_eq!(err.len(), 2);
    }
}
