//! Scanning status models
//!
//! [`ScanCheck`] is the outcome of querying a scanning subsystem. It keeps
//! "the endpoint says scanning is off" apart from "the call failed and was
//! downgraded", while [`ScanStatus`] is the flattened value shown in reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// GitHub Advanced Security scanning subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Code,
    Secret,
}

impl ScanKind {
    /// Path segment of the alerts endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            ScanKind::Code => "code-scanning",
            ScanKind::Secret => "secret-scanning",
        }
    }

    /// Capitalized name used at the start of status messages
    pub fn title(self) -> &'static str {
        match self {
            ScanKind::Code => "Code",
            ScanKind::Secret => "Secret",
        }
    }

    /// Lower-case name used inside status messages
    pub fn label(self) -> &'static str {
        match self {
            ScanKind::Code => "code",
            ScanKind::Secret => "secret",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a single scan-status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanCheck {
    /// Scanning is on; `alerts` open alerts were returned
    Enabled { alerts: usize },
    /// The endpoint answered 404: the feature is off for this repository
    Disabled,
    /// The query failed and was downgraded to "not enabled"
    Failed { cause: String },
}

impl ScanCheck {
    /// Flatten into the report-facing status for `kind`
    pub fn status(&self, kind: ScanKind) -> ScanStatus {
        match self {
            ScanCheck::Enabled { alerts } => ScanStatus {
                enabled: true,
                alerts_count: *alerts,
                message: format!("{} scanning is enabled with {} alerts", kind.title(), alerts),
            },
            ScanCheck::Disabled => ScanStatus {
                enabled: false,
                alerts_count: 0,
                message: format!("{} scanning is not enabled", kind.title()),
            },
            ScanCheck::Failed { cause } => ScanStatus {
                enabled: false,
                alerts_count: 0,
                message: format!("Error checking {} scanning status: {}", kind.label(), cause),
            },
        }
    }
}

/// Report-facing scanning status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatus {
    pub enabled: bool,
    pub alerts_count: usize,
    pub message: String,
}

impl ScanStatus {
    /// Badge text: enabled statuses also spell out the alert count
    pub fn display_text(&self) -> String {
        if self.enabled {
            format!("{} ({} alerts)", self.message, self.alerts_count)
        } else {
            self.message.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_status_for_each_kind() {
        for kind in [ScanKind::Code, ScanKind::Secret] {
            let status = ScanCheck::Disabled.status(kind);
            assert!(!status.enabled);
            assert_eq!(status.alerts_count, 0);
        }
        assert_eq!(
            ScanCheck::Disabled.status(ScanKind::Code).message,
            "Code scanning is not enabled"
        );
        assert_eq!(
            ScanCheck::Disabled.status(ScanKind::Secret).message,
            "Secret scanning is not enabled"
        );
    }

    #[test]
    fn test_enabled_status_counts_alerts() {
        let status = ScanCheck::Enabled { alerts: 2 }.status(ScanKind::Secret);
        assert!(status.enabled);
        assert_eq!(status.alerts_count, 2);
        assert_eq!(status.message, "Secret scanning is enabled with 2 alerts");
        assert_eq!(
            status.display_text(),
            "Secret scanning is enabled with 2 alerts (2 alerts)"
        );
    }

    #[test]
    fn test_failed_status_keeps_cause() {
        let check = ScanCheck::Failed {
            cause: "Server error: boom".to_string(),
        };
        let status = check.status(ScanKind::Code);

        assert!(!status.enabled);
        assert_eq!(status.alerts_count, 0);
        assert_eq!(
            status.message,
            "Error checking code scanning status: Server error: boom"
        );
        assert_eq!(status.display_text(), status.message);
    }

    #[test]
    fn test_endpoint_segments() {
        assert_eq!(ScanKind::Code.endpoint(), "code-scanning");
        assert_eq!(ScanKind::Secret.endpoint(), "secret-scanning");
    }
}
