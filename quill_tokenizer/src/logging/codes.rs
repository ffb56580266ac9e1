//! Consolidated log codes and classification system
//!
//! Single source of truth for all log codes, their metadata, and
//! classification functions. Error codes cover resource-limit faults;
//! warning codes cover structural recovery events, which never halt
//! tokenization.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning, and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a log code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl CodeMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Resource-limit error codes; the only fatal faults tokenization can raise
pub mod limits {
    use super::Code;

    pub const SOURCE_TOO_LARGE: Code = Code::new("E001");
    pub const TOO_MANY_TOKENS: Code = Code::new("E002");
}

/// Structural recovery warning codes; every one of these leaves an
/// unresolved annotation instead of failing
pub mod recovery {
    use super::Code;

    pub const UNMATCHED_OPENER: Code = Code::new("W010");
    pub const STRAY_CLOSER: Code = Code::new("W011");
    pub const UNTERMINATED_ATTRIBUTE: Code = Code::new("W012");
    pub const UNTERMINATED_SCOPE: Code = Code::new("W013");
    pub const VERSION_GATED_CAST: Code = Code::new("W014");
    pub const STREAM_INCONSISTENCY: Code = Code::new("W015");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const STREAM_VALIDATION_PASSED: Code = Code::new("I021");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        registry.insert(
            "ERR001",
            CodeMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the source that triggered it",
            ),
        );
        registry.insert(
            "ERR002",
            CodeMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Logging or configuration initialization failure",
                "Check configuration values and environment variables",
            ),
        );

        registry.insert(
            "E001",
            CodeMetadata::new(
                "E001",
                "Limits",
                Severity::Medium,
                false,
                true,
                "Source exceeds the maximum input size",
                "Split the source or raise the compile-time limit",
            ),
        );
        registry.insert(
            "E002",
            CodeMetadata::new(
                "E002",
                "Limits",
                Severity::Medium,
                false,
                true,
                "Source produced more tokens than the configured cap",
                "Split the source or raise the compile-time limit",
            ),
        );

        registry.insert(
            "W010",
            CodeMetadata::new(
                "W010",
                "Recovery",
                Severity::Low,
                true,
                false,
                "Opening delimiter never matched before end of input",
                "The closer link stays unresolved; no action required",
            ),
        );
        registry.insert(
            "W011",
            CodeMetadata::new(
                "W011",
                "Recovery",
                Severity::Low,
                true,
                false,
                "Closing delimiter with no matching opener",
                "The opener link stays unresolved; no action required",
            ),
        );
        registry.insert(
            "W012",
            CodeMetadata::new(
                "W012",
                "Recovery",
                Severity::Low,
                true,
                false,
                "Attribute still open at end of input",
                "The attribute closer stays unresolved; no action required",
            ),
        );
        registry.insert(
            "W013",
            CodeMetadata::new(
                "W013",
                "Recovery",
                Severity::Low,
                true,
                false,
                "Scope still open at end of input",
                "The scope closer stays unresolved; no action required",
            ),
        );
        registry.insert(
            "W014",
            CodeMetadata::new(
                "W014",
                "Recovery",
                Severity::Low,
                true,
                false,
                "Cast keyword gated off by the active language version",
                "Tokens kept as constituent units; raise the version if intended",
            ),
        );
        registry.insert(
            "W015",
            CodeMetadata::new(
                "W015",
                "Recovery",
                Severity::Medium,
                true,
                false,
                "Stream consistency check reported a violation",
                "Inspect the reported positions",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map(|m| m.severity).unwrap_or(Severity::Low)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("Unknown")
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map(|m| m.recoverable).unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_metadata(code).map(|m| m.requires_halt).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(limits::TOO_MANY_TOKENS.as_str(), "E002");
        assert_eq!(format!("{}", recovery::UNMATCHED_OPENER), "W010");
    }

    #[test]
    fn test_limit_codes_halt() {
        assert!(requires_halt("E001"));
        assert!(requires_halt("E002"));
        assert!(!is_recoverable("E002"));
    }

    #[test]
    fn test_recovery_codes_never_halt() {
        for code in ["W010", "W011", "W012", "W013", "W014", "W015"] {
            assert!(is_recoverable(code), "{code} must be recoverable");
            assert!(!requires_halt(code), "{code} must not halt");
            assert_eq!(get_category(code), "Recovery");
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert!(!requires_halt("E999"));
    }
}
