//! Mapping of free-text failure reasons reported by the backend to user messages.
//!
//! Rules are evaluated in order and match on a case-insensitive substring of the
//! reason. The first match wins; otherwise the fallback applies. An empty pattern
//! matches every reason, including a missing one, so an empty table or a single
//! catch-all rule gives the "any failure is generic" behaviour.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ContentPolicy,
    ComputationFault,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRule {
    pub pattern: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FailureRule {
    pub fn new(pattern: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            message: message.into(),
        }
    }

    fn matches(&self, reason: Option<&str>) -> bool {
        let pattern = self.pattern.trim();
        if pattern.is_empty() {
            return true;
        }
        reason
            .map(|reason| reason.to_lowercase().contains(&pattern.to_lowercase()))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureClassification {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReasonTable {
    rules: Vec<FailureRule>,
    fallback_message: String,
}

pub const CONTENT_POLICY_MESSAGE: &str =
    "The letter did not pass content filtering. Please edit it and try again.";
pub const COMPUTATION_FAULT_MESSAGE: &str =
    "Video generation hit an internal error. Please try again.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Video generation failed. Please try again.";

impl FailureReasonTable {
    pub fn new(rules: Vec<FailureRule>, fallback_message: impl Into<String>) -> Self {
        Self {
            rules,
            fallback_message: fallback_message.into(),
        }
    }

    /// Every failure maps to the fallback message.
    pub fn generic_only(fallback_message: impl Into<String>) -> Self {
        Self::new(Vec::new(), fallback_message)
    }

    pub fn rules(&self) -> &[FailureRule] {
        &self.rules
    }

    pub fn classify(&self, reason: Option<&str>) -> FailureClassification {
        self.rules
            .iter()
            .find(|rule| rule.matches(reason))
            .map(|rule| FailureClassification {
                kind: rule.kind,
                message: rule.message.clone(),
            })
            .unwrap_or_else(|| FailureClassification {
                kind: FailureKind::Generic,
                message: self.fallback_message.clone(),
            })
    }
}

impl Default for FailureReasonTable {
    fn default() -> Self {
        Self::new(
            vec![
                FailureRule::new(
                    "не прошло фильтрацию",
                    FailureKind::ContentPolicy,
                    CONTENT_POLICY_MESSAGE,
                ),
                FailureRule::new(
                    "content rejected",
                    FailureKind::ContentPolicy,
                    CONTENT_POLICY_MESSAGE,
                ),
                FailureRule::new(
                    "division by zero",
                    FailureKind::ComputationFault,
                    COMPUTATION_FAULT_MESSAGE,
                ),
            ],
            GENERIC_FAILURE_MESSAGE,
        )
    }
}
