//! Health status mapping
//!
//! Both lookups are total: codes and labels outside the known set resolve to
//! the "unknown" sentinel instead of failing.

use serde::Serialize;

/// Label for codes outside {0, 1, 2}
pub const UNKNOWN_LABEL: &str = "unknown";
/// Badge for labels outside {normal, warning, critical}
pub const UNKNOWN_BADGE: &str = "❓ UNKNOWN";

/// Health status derived from a classification result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Normal,
    Warning,
    Critical,
    Unknown,
}

impl HealthStatus {
    pub fn from_code(code: i64) -> Self {
        Self::from_label(label_for_code(code))
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "normal" => HealthStatus::Normal,
            "warning" => HealthStatus::Warning,
            "critical" => HealthStatus::Critical,
            _ => HealthStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Normal => "normal",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
            HealthStatus::Unknown => UNKNOWN_LABEL,
        }
    }

    /// Display string with severity glyph
    pub fn badge(self) -> &'static str {
        badge_for_label(self.label())
    }
}

/// {0 → normal, 1 → warning, 2 → critical}, anything else → "unknown"
pub fn label_for_code(code: i64) -> &'static str {
    match code {
        0 => "normal",
        1 => "warning",
        2 => "critical",
        _ => UNKNOWN_LABEL,
    }
}

/// Severity badge for a status label, "❓ UNKNOWN" when unrecognised
pub fn badge_for_label(label: &str) -> &'static str {
    match label {
        "normal" => "🟢 NORMAL",
        "warning" => "🟡 WARNING",
        "critical" => "🔴 CRITICAL",
        _ => UNKNOWN_BADGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(label_for_code(0), "normal");
        assert_eq!(label_for_code(1), "warning");
        assert_eq!(label_for_code(2), "critical");
        assert_eq!(HealthStatus::from_code(2).badge(), "🔴 CRITICAL");
        assert_eq!(HealthStatus::from_code(1).badge(), "🟡 WARNING");
        assert_eq!(HealthStatus::from_code(0).badge(), "🟢 NORMAL");
    }

    #[test]
    fn test_every_code_resolves() {
        for code in [-1, 3, 42, i64::MIN, i64::MAX] {
            assert_eq!(label_for_code(code), "unknown");
            assert_eq!(HealthStatus::from_code(code), HealthStatus::Unknown);
            assert_eq!(HealthStatus::from_code(code).badge(), "❓ UNKNOWN");
        }
    }

    #[test]
    fn test_unrecognised_label_resolves() {
        assert_eq!(badge_for_label("degraded"), "❓ UNKNOWN");
        assert_eq!(badge_for_label(""), "❓ UNKNOWN");
        assert_eq!(badge_for_label("NORMAL"), "❓ UNKNOWN");
    }

    #[test]
    fn test_label_round_trip() {
        for status in [
            HealthStatus::Normal,
            HealthStatus::Warning,
            HealthStatus::Critical,
            HealthStatus::Unknown,
        ] {
            assert_eq!(HealthStatus::from_label(status.label()), status);
        }
    }
}
