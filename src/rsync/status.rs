//! Outcome types for probe and fetch operations

use std::fmt;

/// Reason given when the daemon refused the connection
pub const REASON_CONNECTION_REFUSED: &str = "connection refused";
/// Reason given when the target host name could not be resolved
pub const REASON_HOST_NOT_RESOLVED: &str = "host not resolved";

/// Why a single probe or fetch did not succeed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The command ran (or failed to start) and reported a failure status
    ExecutionFailure,
    /// The command exceeded its configured timeout and was killed
    Timeout,
}

impl FailureKind {
    /// Returns the text representation of this kind
    pub fn text(&self) -> &str {
        match self {
            FailureKind::ExecutionFailure => "execution failure",
            FailureKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A non-fatal failure of one probe or fetch, with a short reason
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn execution(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::ExecutionFailure,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }

    /// The target itself could not be reached, as opposed to one path missing
    pub fn is_unreachable(&self) -> bool {
        self.kind == FailureKind::ExecutionFailure
            && matches!(
                self.message.as_str(),
                REASON_CONNECTION_REFUSED | REASON_HOST_NOT_RESOLVED
            )
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of probing one candidate path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The listing succeeded with non-empty output
    Found(String),
    /// The listing succeeded but printed nothing
    NotFound,
    /// The listing failed or timed out; counts as not found
    Failed(Failure),
}

/// Result of fetching one found path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The transfer completed; carries where the data landed
    Fetched(String),
    Failed(Failure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display_includes_kind() {
        let failure = Failure::timeout("no response after 2.0s");
        assert!(failure.is_timeout());
        assert_eq!(failure.to_string(), "timeout: no response after 2.0s");

        let failure = Failure::execution("unknown module");
        assert!(!failure.is_timeout());
        assert_eq!(failure.to_string(), "execution failure: unknown module");
    }

    #[test]
    fn test_unreachable_only_for_connection_level_reasons() {
        assert!(Failure::execution(REASON_CONNECTION_REFUSED).is_unreachable());
        assert!(Failure::execution(REASON_HOST_NOT_RESOLVED).is_unreachable());
        assert!(!Failure::execution("no such path").is_unreachable());
        assert!(!Failure::execution("unknown module").is_unreachable());
        assert!(!Failure::timeout(REASON_CONNECTION_REFUSED).is_unreachable());
    }
}
