//! Parameter verification.
//!
//! Unlike [`crate::resolver::resolve`], which stops at the first problem,
//! the verifier inspects a whole parameter set and reports everything wrong
//! with it. It does not consult a registry and never contacts AWS.

use serde::Serialize;

use crate::models::{KinesisConfiguration, Parameters};
use crate::resolver::options;

/// Options that must be present for a parameter set to verify.
pub const REQUIRED_OPTIONS: &[&str] = &["accessKey", "secretKey", "region"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationErrorCode {
    MissingParameter,
    UnknownParameter,
    IllegalParameterValue,
}

impl std::fmt::Display for VerificationErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationErrorCode::MissingParameter => write!(f, "MISSING_PARAMETER"),
            VerificationErrorCode::UnknownParameter => write!(f, "UNKNOWN_PARAMETER"),
            VerificationErrorCode::IllegalParameterValue => write!(f, "ILLEGAL_PARAMETER_VALUE"),
        }
    }
}

/// One problem found in a parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationError {
    pub code: VerificationErrorCode,
    pub parameter: String,
    pub description: String,
}

/// Everything found while verifying a parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub errors: Vec<VerificationError>,
}

impl VerificationResult {
    fn from_errors(errors: Vec<VerificationError>) -> Self {
        let status = if errors.is_empty() {
            VerificationStatus::Ok
        } else {
            VerificationStatus::Error
        };
        Self { status, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.status == VerificationStatus::Ok
    }

    /// Errors carrying `code`, in report order.
    pub fn with_code(
        &self,
        code: VerificationErrorCode,
    ) -> impl Iterator<Item = &VerificationError> {
        self.errors.iter().filter(move |e| e.code == code)
    }
}

/// Verify `params` against the option schema.
pub fn verify_parameters(params: &Parameters) -> VerificationResult {
    let mut errors = Vec::new();

    for required in REQUIRED_OPTIONS {
        let present = params
            .get(*required)
            .is_some_and(|value| !is_blank(value));
        if !present {
            errors.push(VerificationError {
                code: VerificationErrorCode::MissingParameter,
                parameter: (*required).to_string(),
                description: format!("{required} should be set"),
            });
        }
    }

    let mut scratch = KinesisConfiguration::default();
    for (key, value) in params {
        let Some(option) = options::lookup(key) else {
            errors.push(VerificationError {
                code: VerificationErrorCode::UnknownParameter,
                parameter: key.clone(),
                description: format!("{key} is not a supported option"),
            });
            continue;
        };
        if let Err(reason) = option.apply(&mut scratch, value) {
            errors.push(VerificationError {
                code: VerificationErrorCode::IllegalParameterValue,
                parameter: key.clone(),
                description: format!("{key}: {reason}"),
            });
        }
    }

    let has_sequence_number = scratch
        .sequence_number
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());
    if scratch.iterator_type.requires_sequence_number() && !has_sequence_number {
        errors.push(VerificationError {
            code: VerificationErrorCode::MissingParameter,
            parameter: "sequenceNumber".to_string(),
            description: format!(
                "sequenceNumber should be set when iteratorType is {}",
                scratch.iterator_type
            ),
        });
    }

    VerificationResult::from_errors(errors)
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
