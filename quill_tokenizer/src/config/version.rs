//! Language version gating
//!
//! The cast table is data, not scanner logic. Each cast keyword names the
//! version that introduced it; tokenizing against an older version leaves a
//! gated-off keyword as plain constituent tokens instead of a cast.
use crate::tokens::TokenKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quill language versions, oldest first so `Ord` means "at least"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageVersion {
    V1,
    #[default]
    V2,
}

impl LanguageVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" | "v1" | "V1" => Some(Self::V1),
            "2" | "v2" | "V2" => Some(Self::V2),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_str())
    }
}

/// One cast table entry: keyword, produced kind, canonical spelling,
/// introducing version
#[derive(Debug, Clone, Copy)]
pub struct CastEntry {
    pub keyword: &'static str,
    pub kind: TokenKind,
    pub canonical: &'static str,
    pub since: LanguageVersion,
}

/// The full cast keyword table. Synonyms share a kind and a canonical
/// spelling.
pub const CAST_TABLE: &[CastEntry] = &[
    CastEntry { keyword: "bool", kind: TokenKind::BoolCast, canonical: "bool", since: LanguageVersion::V1 },
    CastEntry { keyword: "boolean", kind: TokenKind::BoolCast, canonical: "bool", since: LanguageVersion::V1 },
    CastEntry { keyword: "int", kind: TokenKind::IntCast, canonical: "int", since: LanguageVersion::V1 },
    CastEntry { keyword: "integer", kind: TokenKind::IntCast, canonical: "int", since: LanguageVersion::V1 },
    CastEntry { keyword: "float", kind: TokenKind::FloatCast, canonical: "float", since: LanguageVersion::V1 },
    CastEntry { keyword: "double", kind: TokenKind::FloatCast, canonical: "float", since: LanguageVersion::V1 },
    CastEntry { keyword: "real", kind: TokenKind::FloatCast, canonical: "float", since: LanguageVersion::V1 },
    CastEntry { keyword: "string", kind: TokenKind::StringCast, canonical: "string", since: LanguageVersion::V1 },
    CastEntry { keyword: "binary", kind: TokenKind::BinaryCast, canonical: "binary", since: LanguageVersion::V1 },
    CastEntry { keyword: "array", kind: TokenKind::ArrayCast, canonical: "array", since: LanguageVersion::V1 },
    CastEntry { keyword: "object", kind: TokenKind::ObjectCast, canonical: "object", since: LanguageVersion::V1 },
    CastEntry { keyword: "unset", kind: TokenKind::UnsetCast, canonical: "unset", since: LanguageVersion::V1 },
    CastEntry { keyword: "void", kind: TokenKind::VoidCast, canonical: "void", since: LanguageVersion::V2 },
];

/// Outcome of looking up a parenthesized keyword in the cast table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastLookup {
    /// Keyword is a cast under the active version
    Cast { kind: TokenKind, canonical: &'static str },
    /// Keyword is in the table but gated off by the active version
    GatedOff,
    /// Keyword is not a cast keyword at all
    NotACast,
}

/// Look up a keyword (already lower-cased by the caller) against the
/// active language version
pub fn lookup_cast(keyword: &str, version: LanguageVersion) -> CastLookup {
    match CAST_TABLE.iter().find(|entry| entry.keyword == keyword) {
        Some(entry) if version >= entry.since => CastLookup::Cast {
            kind: entry.kind,
            canonical: entry.canonical,
        },
        Some(_) => CastLookup::GatedOff,
        None => CastLookup::NotACast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_share_kind_and_canonical() {
        let bool_lookup = lookup_cast("bool", LanguageVersion::V2);
        let boolean_lookup = lookup_cast("boolean", LanguageVersion::V2);
        assert_eq!(bool_lookup, boolean_lookup);
        assert_eq!(
            lookup_cast("double", LanguageVersion::V1),
            CastLookup::Cast { kind: TokenKind::FloatCast, canonical: "float" }
        );
    }

    #[test]
    fn test_void_gated_to_v2() {
        assert_eq!(lookup_cast("void", LanguageVersion::V1), CastLookup::GatedOff);
        assert_eq!(
            lookup_cast("void", LanguageVersion::V2),
            CastLookup::Cast { kind: TokenKind::VoidCast, canonical: "void" }
        );
    }

    #[test]
    fn test_non_cast_keyword() {
        assert_eq!(lookup_cast("if", LanguageVersion::V2), CastLookup::NotACast);
        assert_eq!(lookup_cast("quux", LanguageVersion::V2), CastLookup::NotACast);
    }

    #[test]
    fn test_version_ordering_and_parse() {
        assert!(LanguageVersion::V2 > LanguageVersion::V1);
        assert_eq!(LanguageVersion::parse("1"), Some(LanguageVersion::V1));
        assert_eq!(LanguageVersion::parse("v2"), Some(LanguageVersion::V2));
        assert_eq!(LanguageVersion::parse("latest"), None);
    }
}
