//! Token records and structural annotations
//!
//! A token is immutable once its tokenization pass completes. Structural
//! annotations distinguish three states explicitly: a field that does not
//! apply to a token at all, a field that applies but could not be resolved
//! before end of input (the "live coding" recovery state), and a resolved
//! position. Conflating the first two loses exactly the information rule
//! checks need to detect incomplete constructs.
use crate::tokens::kind::TokenKind;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structural cross-reference to another token position.
///
/// `None` means the annotation does not apply to this token. `Unresolved`
/// means the annotation applies but the counterpart was never found before
/// end of input. `To` is a resolved position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Link {
    /// Not applicable to this token
    #[default]
    None,
    /// Applicable, but unresolved before end of input (parse error recovery)
    Unresolved,
    /// Resolved to a token position
    To(usize),
}

impl Link {
    /// Get the resolved position, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::To(pos) => Some(*pos),
            _ => None,
        }
    }

    /// Check if this link resolved to a position
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::To(_))
    }

    /// Check if this link applies but never resolved
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Check if this link applies to the token at all
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "-"),
            Self::Unresolved => write!(f, "?"),
            Self::To(pos) => write!(f, "{}", pos),
        }
    }
}

/// Ordered mapping of enclosing scope positions to their kinds,
/// outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    entries: Vec<(usize, TokenKind)>,
}

impl Conditions {
    /// Create an empty condition set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an outermost-first snapshot of the condition stack
    pub fn from_stack(stack: &[(usize, TokenKind)]) -> Self {
        Self {
            entries: stack.to_vec(),
        }
    }

    /// Number of enclosing scopes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the token sits inside no scope at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate enclosing scopes, outermost first
    pub fn iter(&self) -> impl Iterator<Item = &(usize, TokenKind)> {
        self.entries.iter()
    }

    /// Check whether the scope owned by `position` encloses the token
    pub fn contains(&self, position: usize) -> bool {
        self.entries.iter().any(|(pos, _)| *pos == position)
    }

    /// Get the kind of the enclosing scope owned by `position`
    pub fn kind_of(&self, position: usize) -> Option<TokenKind> {
        self.entries
            .iter()
            .find(|(pos, _)| *pos == position)
            .map(|(_, kind)| *kind)
    }

    /// Check whether any enclosing scope has the given kind
    pub fn has_kind(&self, kind: TokenKind) -> bool {
        self.entries.iter().any(|(_, k)| *k == kind)
    }

    /// The nearest enclosing scope, if any
    pub fn innermost(&self) -> Option<(usize, TokenKind)> {
        self.entries.last().copied()
    }

    /// The outermost enclosing scope, if any
    pub fn outermost(&self) -> Option<(usize, TokenKind)> {
        self.entries.first().copied()
    }
}

/// A classified, positioned token with structural annotations.
///
/// Positions are dense, zero-based indices into the owning stream and never
/// change after assignment. Annotation fields default to `Link::None` and are
/// only ever moved forward: `None` to `Unresolved` when a construct opens,
/// `Unresolved` to `To` when its counterpart is found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Sequence position in the stream (stable for the stream's lifetime)
    pub position: usize,
    /// Canonical classification
    pub kind: TokenKind,
    /// Exact source substring, including internal spacing for casts
    pub content: String,
    /// Canonical lower-cased form, kept only where it differs from `content`
    /// (case-insensitive keywords and cast keywords)
    pub normalized: Option<String>,
    /// Source location
    pub span: Span,

    // === STRUCTURAL ANNOTATIONS ===
    /// Position of the matching open parenthesis
    pub paren_opener: Link,
    /// Position of the matching close parenthesis
    pub paren_closer: Link,
    /// Position of the keyword owning this parenthesis pair
    pub paren_owner: Link,
    /// Position of the matching opening brace/square bracket
    pub bracket_opener: Link,
    /// Position of the matching closing brace/square bracket
    pub bracket_closer: Link,
    /// Position of the keyword opening the enclosing scope
    pub scope_condition: Link,
    /// Position of the scope's opening delimiter (on the owning keyword
    /// and on both delimiters)
    pub scope_opener: Link,
    /// Position of the scope's closing delimiter
    pub scope_closer: Link,
    /// Position of the `#[` opening the enclosing attribute
    pub attribute_opener: Link,
    /// Position of the `]` closing this attribute; `Unresolved` marks an
    /// unterminated attribute (parse error), distinct from `None`
    pub attribute_closer: Link,
    /// Every enclosing scope, outermost first
    pub conditions: Conditions,
}

impl Token {
    /// Create a token with no structural annotations yet
    pub fn new(position: usize, kind: TokenKind, content: impl Into<String>, span: Span) -> Self {
        Self {
            position,
            kind,
            content: content.into(),
            normalized: None,
            span,
            paren_opener: Link::None,
            paren_closer: Link::None,
            paren_owner: Link::None,
            bracket_opener: Link::None,
            bracket_closer: Link::None,
            scope_condition: Link::None,
            scope_opener: Link::None,
            scope_closer: Link::None,
            attribute_opener: Link::None,
            attribute_closer: Link::None,
            conditions: Conditions::new(),
        }
    }

    /// Attach the canonical lower-cased form where it differs from the
    /// literal content
    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        let normalized = normalized.into();
        if normalized != self.content {
            self.normalized = Some(normalized);
        }
        self
    }

    /// The form used for case-insensitive comparison: the normalized
    /// content when present, the literal content otherwise
    pub fn comparable_content(&self) -> &str {
        self.normalized.as_deref().unwrap_or(&self.content)
    }

    /// Check if this token participates in structural analysis
    pub fn is_significant(&self) -> bool {
        self.kind.is_significant()
    }

    /// Check if this token opens a scope body (resolved or still pending
    /// a closer)
    pub fn opens_scope(&self) -> bool {
        self.scope_opener.is_resolved() && self.scope_opener.position() == Some(self.position)
    }

    /// Check whether the scope owned by `position` encloses this token
    pub fn inside_scope_of(&self, position: usize) -> bool {
        self.conditions.contains(position)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}({:?})", self.kind.label(), self.position, self.content)
    }
}
