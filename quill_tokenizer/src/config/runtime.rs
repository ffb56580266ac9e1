// RUNTIME PREFERENCES (User Experience)

use crate::config::version::LanguageVersion;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerPreferences {
    /// Language version to tokenize against
    pub language_version: LanguageVersion,

    /// Whether to collect detailed token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to include whitespace and comments in token counts
    pub include_all_tokens_in_counts: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for ScannerPreferences {
    fn default() -> Self {
        Self {
            language_version: env::var("QUILL_LANGUAGE_VERSION")
                .ok()
                .and_then(|v| LanguageVersion::parse(&v))
                .unwrap_or_default(),
            collect_detailed_metrics: env::var("QUILL_SCANNER_DETAILED_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_all_tokens_in_counts: env::var("QUILL_SCANNER_INCLUDE_ALL_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            include_position_in_errors: env::var("QUILL_SCANNER_INCLUDE_POSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructurePreferences {
    /// Whether to log every resolved delimiter pair (very verbose)
    pub log_pair_resolution: bool,

    /// Whether to log unresolved annotations left at end of input
    pub log_unresolved_annotations: bool,

    /// Whether to run stream consistency checks after tokenization
    pub validate_after_build: bool,
}

impl Default for StructurePreferences {
    fn default() -> Self {
        Self {
            log_pair_resolution: env::var("QUILL_STRUCTURE_LOG_PAIRS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_unresolved_annotations: env::var("QUILL_STRUCTURE_LOG_UNRESOLVED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            validate_after_build: env::var("QUILL_STRUCTURE_VALIDATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to include performance metrics in logs
    pub log_performance_events: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("QUILL_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("QUILL_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("QUILL_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env::var("QUILL_LOGGING_LOG_PERFORMANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub scanner: ScannerPreferences,
    pub structure: StructurePreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML document, falling back to env-backed
    /// defaults for anything not mentioned
    pub fn from_toml_str(document: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(document)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Scanner
    pub const LANGUAGE_VERSION: &str = "QUILL_LANGUAGE_VERSION";
    pub const SCANNER_DETAILED_METRICS: &str = "QUILL_SCANNER_DETAILED_METRICS";
    pub const SCANNER_INCLUDE_ALL_TOKENS: &str = "QUILL_SCANNER_INCLUDE_ALL_TOKENS";
    pub const SCANNER_INCLUDE_POSITIONS: &str = "QUILL_SCANNER_INCLUDE_POSITIONS";

    // Structure
    pub const STRUCTURE_LOG_PAIRS: &str = "QUILL_STRUCTURE_LOG_PAIRS";
    pub const STRUCTURE_LOG_UNRESOLVED: &str = "QUILL_STRUCTURE_LOG_UNRESOLVED";
    pub const STRUCTURE_VALIDATE: &str = "QUILL_STRUCTURE_VALIDATE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "QUILL_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "QUILL_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "QUILL_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "QUILL_LOGGING_LOG_PERFORMANCE";
}
