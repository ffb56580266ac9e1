//! Canonical token kinds for the Quill tokenizer
//!
//! Every lexical unit the scanner or classifier can produce is one of these
//! kinds. Rule checks and the structure builders agree on this enumeration
//! directly; there is no late-bound name lookup anywhere in the system.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete enumeration of Quill token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // === STRUCTURAL KEYWORDS ===
    If,
    ElseIf,
    Else,
    For,
    Foreach,
    While,
    Do,
    Switch,
    Function,
    Class,
    Try,
    Catch,
    Finally,
    Return,
    Break,
    Continue,

    // === LITERAL KEYWORDS ===
    True,
    False,
    Null,

    // === TYPE CASTS ===
    BoolCast,
    IntCast,
    FloatCast,
    StringCast,
    BinaryCast,
    ArrayCast,
    ObjectCast,
    UnsetCast,
    VoidCast,

    // === NAMES AND LITERALS ===
    Identifier,
    Variable,
    IntLiteral,
    FloatLiteral,
    SingleQuotedString,
    DoubleQuotedString,
    HeredocStart,
    HeredocBody,
    HeredocEnd,

    // === DELIMITERS ===
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenSquare,
    CloseSquare,
    Semicolon,
    Comma,
    Colon,
    Question,
    Dot,

    // === ATTRIBUTES ===
    /// The `#[` marker opening an attribute construct
    Attribute,
    /// The `]` closing an attribute construct
    AttributeEnd,

    // === OPERATORS ===
    Assign,
    Equal,
    Identical,
    NotEqual,
    NotIdentical,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Not,
    BooleanAnd,
    BooleanOr,
    Arrow,
    DoubleArrow,

    // === WHITESPACE AND STRUCTURE ===
    /// Run of horizontal whitespace (spaces and tabs)
    Whitespace,
    /// Single line break (CRLF collapses to one token)
    Newline,
    /// Any comment form (`//`, `#`, `/* */`)
    Comment,
    /// A byte the scanner does not recognize (never an error)
    Unknown,
    /// End of file marker
    Eof,
}

/// Token classification for consumers that group kinds coarsely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Structural tokens (keywords)
    Structural,
    /// Type cast tokens
    Cast,
    /// Operator symbols
    Operator,
    /// Literal values
    Literal,
    /// Identifiers and variables
    Name,
    /// Delimiters and punctuation
    Delimiter,
    /// Whitespace and formatting
    Whitespace,
    /// Special tokens (comments, unknown bytes, EOF)
    Special,
}

impl TokenKind {
    /// Check if this kind is a structural keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::If
                | Self::ElseIf
                | Self::Else
                | Self::For
                | Self::Foreach
                | Self::While
                | Self::Do
                | Self::Switch
                | Self::Function
                | Self::Class
                | Self::Try
                | Self::Catch
                | Self::Finally
                | Self::Return
                | Self::Break
                | Self::Continue
        )
    }

    /// Check if this keyword introduces a scope (owns a block or an implicit
    /// single-statement body)
    pub fn is_scope_keyword(&self) -> bool {
        matches!(
            self,
            Self::If
                | Self::ElseIf
                | Self::Else
                | Self::For
                | Self::Foreach
                | Self::While
                | Self::Do
                | Self::Switch
                | Self::Function
                | Self::Class
                | Self::Try
                | Self::Catch
                | Self::Finally
        )
    }

    /// Check if this scope keyword takes controlling parentheses.
    /// `else`, `do`, `try` and `finally` go straight to their body.
    pub fn takes_condition(&self) -> bool {
        self.is_scope_keyword() && !matches!(self, Self::Else | Self::Do | Self::Try | Self::Finally)
    }

    /// Check if this kind is a type cast
    pub fn is_cast(&self) -> bool {
        matches!(
            self,
            Self::BoolCast
                | Self::IntCast
                | Self::FloatCast
                | Self::StringCast
                | Self::BinaryCast
                | Self::ArrayCast
                | Self::ObjectCast
                | Self::UnsetCast
                | Self::VoidCast
        )
    }

    /// Check if this kind is an operator symbol
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::Equal
                | Self::Identical
                | Self::NotEqual
                | Self::NotIdentical
                | Self::LessThan
                | Self::GreaterThan
                | Self::LessThanOrEqual
                | Self::GreaterThanOrEqual
                | Self::Plus
                | Self::Minus
                | Self::Multiply
                | Self::Divide
                | Self::Modulus
                | Self::Not
                | Self::BooleanAnd
                | Self::BooleanOr
                | Self::Arrow
                | Self::DoubleArrow
        )
    }

    /// Check if this kind is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::True
                | Self::False
                | Self::Null
                | Self::IntLiteral
                | Self::FloatLiteral
                | Self::SingleQuotedString
                | Self::DoubleQuotedString
                | Self::HeredocStart
                | Self::HeredocBody
                | Self::HeredocEnd
        )
    }

    /// Check if this kind is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline)
    }

    /// Check if this kind should be ignored by significant-token scans
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::Comment)
    }

    /// Check if this kind participates in structural analysis
    pub fn is_significant(&self) -> bool {
        !self.is_ignorable()
    }

    /// Get the coarse classification of this kind
    pub fn token_class(&self) -> TokenClass {
        if self.is_keyword() {
            TokenClass::Structural
        } else if self.is_cast() {
            TokenClass::Cast
        } else if self.is_operator() {
            TokenClass::Operator
        } else if self.is_literal() {
            TokenClass::Literal
        } else {
            match self {
                Self::Identifier | Self::Variable => TokenClass::Name,
                Self::OpenParen
                | Self::CloseParen
                | Self::OpenBrace
                | Self::CloseBrace
                | Self::OpenSquare
                | Self::CloseSquare
                | Self::Semicolon
                | Self::Comma
                | Self::Colon
                | Self::Question
                | Self::Dot
                | Self::Attribute
                | Self::AttributeEnd => TokenClass::Delimiter,
                Self::Whitespace | Self::Newline => TokenClass::Whitespace,
                _ => TokenClass::Special,
            }
        }
    }

    /// Stable human-readable label for this kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::If => "if-keyword",
            Self::ElseIf => "elseif-keyword",
            Self::Else => "else-keyword",
            Self::For => "for-keyword",
            Self::Foreach => "foreach-keyword",
            Self::While => "while-keyword",
            Self::Do => "do-keyword",
            Self::Switch => "switch-keyword",
            Self::Function => "function-keyword",
            Self::Class => "class-keyword",
            Self::Try => "try-keyword",
            Self::Catch => "catch-keyword",
            Self::Finally => "finally-keyword",
            Self::Return => "return-keyword",
            Self::Break => "break-keyword",
            Self::Continue => "continue-keyword",
            Self::True => "true-literal",
            Self::False => "false-literal",
            Self::Null => "null-literal",
            Self::BoolCast => "bool-cast",
            Self::IntCast => "int-cast",
            Self::FloatCast => "float-cast",
            Self::StringCast => "string-cast",
            Self::BinaryCast => "binary-cast",
            Self::ArrayCast => "array-cast",
            Self::ObjectCast => "object-cast",
            Self::UnsetCast => "unset-cast",
            Self::VoidCast => "void-cast",
            Self::Identifier => "identifier",
            Self::Variable => "variable",
            Self::IntLiteral => "int-literal",
            Self::FloatLiteral => "float-literal",
            Self::SingleQuotedString => "single-quoted-string",
            Self::DoubleQuotedString => "double-quoted-string",
            Self::HeredocStart => "heredoc-start",
            Self::HeredocBody => "heredoc-body",
            Self::HeredocEnd => "heredoc-end",
            Self::OpenParen => "open-parenthesis",
            Self::CloseParen => "close-parenthesis",
            Self::OpenBrace => "open-brace",
            Self::CloseBrace => "close-brace",
            Self::OpenSquare => "open-square-bracket",
            Self::CloseSquare => "close-square-bracket",
            Self::Semicolon => "semicolon",
            Self::Comma => "comma",
            Self::Colon => "colon",
            Self::Question => "question-mark",
            Self::Dot => "dot",
            Self::Attribute => "attribute",
            Self::AttributeEnd => "attribute-end",
            Self::Assign => "assign",
            Self::Equal => "equal",
            Self::Identical => "identical",
            Self::NotEqual => "not-equal",
            Self::NotIdentical => "not-identical",
            Self::LessThan => "less-than",
            Self::GreaterThan => "greater-than",
            Self::LessThanOrEqual => "less-than-or-equal",
            Self::GreaterThanOrEqual => "greater-than-or-equal",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulus => "modulus",
            Self::Not => "not",
            Self::BooleanAnd => "boolean-and",
            Self::BooleanOr => "boolean-or",
            Self::Arrow => "arrow",
            Self::DoubleArrow => "double-arrow",
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::Comment => "comment",
            Self::Unknown => "unknown",
            Self::Eof => "end-of-file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify a scanned word as keyword or identifier (case-insensitive)
pub fn classify_word(word: &str) -> TokenKind {
    match word.to_ascii_lowercase().as_str() {
        "if" => TokenKind::If,
        "elseif" => TokenKind::ElseIf,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "foreach" => TokenKind::Foreach,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "switch" => TokenKind::Switch,
        "function" => TokenKind::Function,
        "class" => TokenKind::Class,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => TokenKind::Identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word_keywords() {
        assert_eq!(classify_word("if"), TokenKind::If);
        assert_eq!(classify_word("IF"), TokenKind::If);
        assert_eq!(classify_word("Foreach"), TokenKind::Foreach);
        assert_eq!(classify_word("finally"), TokenKind::Finally);
    }

    #[test]
    fn test_classify_word_identifiers() {
        assert_eq!(classify_word("iff"), TokenKind::Identifier);
        assert_eq!(classify_word("NOT_A_TYPECAST"), TokenKind::Identifier);
        // Cast keywords are plain identifiers outside a cast context
        assert_eq!(classify_word("bool"), TokenKind::Identifier);
        assert_eq!(classify_word("void"), TokenKind::Identifier);
    }

    #[test]
    fn test_scope_keyword_predicates() {
        assert!(TokenKind::If.is_scope_keyword());
        assert!(TokenKind::If.takes_condition());
        assert!(TokenKind::Else.is_scope_keyword());
        assert!(!TokenKind::Else.takes_condition());
        assert!(!TokenKind::Return.is_scope_keyword());
        assert!(TokenKind::Do.is_scope_keyword());
        assert!(!TokenKind::Do.takes_condition());
    }

    #[test]
    fn test_significance() {
        assert!(!TokenKind::Whitespace.is_significant());
        assert!(!TokenKind::Newline.is_significant());
        assert!(!TokenKind::Comment.is_significant());
        assert!(TokenKind::Identifier.is_significant());
        assert!(TokenKind::Eof.is_significant());

        assert!(TokenKind::Newline.is_whitespace());
        assert!(!TokenKind::Comment.is_whitespace());
        assert!(TokenKind::Comment.is_ignorable());
    }

    #[test]
    fn test_token_class() {
        assert_eq!(TokenKind::If.token_class(), TokenClass::Structural);
        assert_eq!(TokenKind::BoolCast.token_class(), TokenClass::Cast);
        assert_eq!(TokenKind::Plus.token_class(), TokenClass::Operator);
        assert_eq!(TokenKind::Variable.token_class(), TokenClass::Name);
        assert_eq!(TokenKind::OpenParen.token_class(), TokenClass::Delimiter);
        assert_eq!(TokenKind::Comment.token_class(), TokenClass::Special);
    }
}
