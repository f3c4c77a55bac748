//! Health verdict returned by a check that ran to completion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a single check run.
///
/// `reason` and `detail` exist only on the unhealthy variant, so a healthy result can never
/// carry an explanation and an unhealthy one can never lack it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireResult", into = "WireResult")]
pub enum CheckResult {
    Healthy,
    Unhealthy {
        /// Machine-readable classification, e.g. `StatefulSetUnhealthy`
        reason: String,
        /// Human-readable explanation
        detail: String,
    },
}

/// A reason/detail pair that cannot form a [`CheckResult`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCheckResult {
    #[error("healthy result must not carry a reason or detail")]
    HealthyWithExplanation,

    #[error("unhealthy result requires both a reason and a detail")]
    MissingExplanation,
}

impl CheckResult {
    /// Build an unhealthy result; both `reason` and `detail` must be non-empty.
    pub fn unhealthy(
        reason: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<Self, InvalidCheckResult> {
        let reason = reason.into();
        let detail = detail.into();
        if reason.trim().is_empty() || detail.trim().is_empty() {
            return Err(InvalidCheckResult::MissingExplanation);
        }
        Ok(Self::Unhealthy { reason, detail })
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Healthy => None,
            Self::Unhealthy { reason, .. } => Some(reason),
        }
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Healthy => None,
            Self::Unhealthy { detail, .. } => Some(detail),
        }
    }
}

/// Flat shape consumed by the surrounding framework
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    is_healthy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<CheckResult> for WireResult {
    fn from(result: CheckResult) -> Self {
        match result {
            CheckResult::Healthy => Self {
                is_healthy: true,
                detail: None,
                reason: None,
            },
            CheckResult::Unhealthy { reason, detail } => Self {
                is_healthy: false,
                detail: Some(detail),
                reason: Some(reason),
            },
        }
    }
}

impl TryFrom<WireResult> for CheckResult {
    type Error = InvalidCheckResult;

    fn try_from(wire: WireResult) -> Result<Self, Self::Error> {
        if wire.is_healthy {
            let explained = wire.reason.is_some_and(|r| !r.is_empty())
                || wire.detail.is_some_and(|d| !d.is_empty());
            if explained {
                return Err(InvalidCheckResult::HealthyWithExplanation);
            }
            return Ok(Self::Healthy);
        }
        Self::unhealthy(wire.reason.unwrap_or_default(), wire.detail.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn healthy_serializes_without_explanation() {
        let value = serde_json::to_value(CheckResult::Healthy).unwrap();
        assert_eq!(value, json!({ "isHealthy": true }));
    }

    #[test]
    fn unhealthy_serializes_reason_and_detail() {
        let result =
            CheckResult::unhealthy("StatefulSetUnhealthy", "not enough ready replicas (1/3)").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "isHealthy": false,
                "detail": "not enough ready replicas (1/3)",
                "reason": "StatefulSetUnhealthy"
            })
        );
        assert_eq!(result.reason(), Some("StatefulSetUnhealthy"));
        assert!(!result.is_healthy());
    }

    #[test]
    fn unhealthy_requires_reason_and_detail() {
        assert_eq!(
            CheckResult::unhealthy("", ""),
            Err(InvalidCheckResult::MissingExplanation)
        );
        assert_eq!(
            CheckResult::unhealthy("StatefulSetUnhealthy", ""),
            Err(InvalidCheckResult::MissingExplanation)
        );
        assert_eq!(
            CheckResult::unhealthy("  ", "not enough ready replicas (0/1)"),
            Err(InvalidCheckResult::MissingExplanation)
        );
    }

    #[test]
    fn unhealthy_result_survives_serialization() {
        let result = CheckResult::unhealthy("StatefulSetUnhealthy", "status not yet reported").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(serde_json::from_value::<CheckResult>(value).unwrap(), result);
    }

    #[test]
    fn rejects_inconsistent_payloads() {
        let healthy_with_detail = json!({ "isHealthy": true, "detail": "oops" });
        assert!(serde_json::from_value::<CheckResult>(healthy_with_detail).is_err());

        let unhealthy_without_reason = json!({ "isHealthy": false, "detail": "broken" });
        assert!(serde_json::from_value::<CheckResult>(unhealthy_without_reason).is_err());

        let unhealthy_empty_reason = json!({ "isHealthy": false, "detail": "broken", "reason": "" });
        assert!(serde_json::from_value::<CheckResult>(unhealthy_empty_reason).is_err());
    }
}
