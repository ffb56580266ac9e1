//! Token stream container and structural queries
use crate::tokens::kind::TokenKind;
use crate::tokens::token::{Link, Token};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stream-level consistency errors reported by [`validation`]
#[derive(Debug, Error, PartialEq)]
pub enum StreamError {
    #[error("Token at index {index} carries position {position}")]
    PositionMismatch { index: usize, position: usize },

    #[error("Token {position} links to out-of-range position {target}")]
    DanglingLink { position: usize, target: usize },

    #[error("Parenthesis pair {opener}/{closer} is not reciprocal")]
    BrokenParenPair { opener: usize, closer: usize },

    #[error("Bracket pair {opener}/{closer} is not reciprocal")]
    BrokenBracketPair { opener: usize, closer: usize },

    #[error("Token {position} names condition {condition} which is not a scope keyword")]
    InvalidCondition { position: usize, condition: usize },

    #[error("Stream does not end with an end-of-input token")]
    MissingEof,
}

/// An immutable sequence of classified tokens with structural annotations.
///
/// Positions are dense and zero-based, so `tokens[i].position == i` always
/// holds for a stream produced by the tokenizer. The final token is always
/// end-of-input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Iterate only tokens that participate in structural analysis
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_significant())
    }

    /// Positions of significant tokens, in stream order
    pub fn significant_positions(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .filter(|t| t.is_significant())
            .map(|t| t.position)
            .collect()
    }

    /// The next significant token at or after `position`
    pub fn next_significant(&self, position: usize) -> Option<&Token> {
        self.tokens[position.min(self.tokens.len())..]
            .iter()
            .find(|t| t.is_significant())
    }

    /// The previous significant token at or before `position`
    pub fn prev_significant(&self, position: usize) -> Option<&Token> {
        let end = (position + 1).min(self.tokens.len());
        self.tokens[..end].iter().rev().find(|t| t.is_significant())
    }

    /// First token of the given kind, in stream order
    pub fn find_kind(&self, kind: TokenKind) -> Option<&Token> {
        self.tokens.iter().find(|t| t.kind == kind)
    }

    /// All tokens of the given kind, in stream order
    pub fn all_of_kind(&self, kind: TokenKind) -> Vec<&Token> {
        self.tokens.iter().filter(|t| t.kind == kind).collect()
    }

    /// Tokens enclosed by the scope owned by the keyword at `condition`,
    /// in stream order
    pub fn tokens_in_scope(&self, condition: usize) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|t| t.conditions.contains(condition))
            .collect()
    }

    /// Serialize the full annotated stream as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Structural consistency checks over a finished stream.
///
/// The tokenizer establishes these properties by construction; the checks
/// exist for diagnostics and for tests that build streams by hand.
pub mod validation {
    use super::*;

    /// Run every check, collecting all failures
    pub fn validate(stream: &TokenStream) -> Vec<StreamError> {
        let mut errors = Vec::new();
        check_positions(stream, &mut errors);
        check_link_ranges(stream, &mut errors);
        check_paren_pairs(stream, &mut errors);
        check_bracket_pairs(stream, &mut errors);
        check_conditions(stream, &mut errors);
        check_eof(stream, &mut errors);
        errors
    }

    fn check_positions(stream: &TokenStream, errors: &mut Vec<StreamError>) {
        for (index, token) in stream.iter().enumerate() {
            if token.position != index {
                errors.push(StreamError::PositionMismatch {
                    index,
                    position: token.position,
                });
            }
        }
    }

    fn check_link_ranges(stream: &TokenStream, errors: &mut Vec<StreamError>) {
        let len = stream.len();
        for token in stream.iter() {
            let links = [
                token.paren_opener,
                token.paren_closer,
                token.paren_owner,
                token.bracket_opener,
                token.bracket_closer,
                token.scope_condition,
                token.scope_opener,
                token.scope_closer,
                token.attribute_opener,
                token.attribute_closer,
            ];
            for link in links {
                if let Link::To(target) = link {
                    if target >= len {
                        errors.push(StreamError::DanglingLink {
                            position: token.position,
                            target,
                        });
                    }
                }
            }
        }
    }

    fn check_paren_pairs(stream: &TokenStream, errors: &mut Vec<StreamError>) {
        for token in stream.iter() {
            if token.kind != TokenKind::OpenParen {
                continue;
            }
            if let Some(closer) = token.paren_closer.position() {
                let reciprocal = stream
                    .get(closer)
                    .map(|c| c.paren_opener == Link::To(token.position))
                    .unwrap_or(false);
                if !reciprocal {
                    errors.push(StreamError::BrokenParenPair {
                        opener: token.position,
                        closer,
                    });
                }
            }
        }
    }

    fn check_bracket_pairs(stream: &TokenStream, errors: &mut Vec<StreamError>) {
        for token in stream.iter() {
            if !matches!(token.kind, TokenKind::OpenBrace | TokenKind::OpenSquare) {
                continue;
            }
            if let Some(closer) = token.bracket_closer.position() {
                let reciprocal = stream
                    .get(closer)
                    .map(|c| c.bracket_opener == Link::To(token.position))
                    .unwrap_or(false);
                if !reciprocal {
                    errors.push(StreamError::BrokenBracketPair {
                        opener: token.position,
                        closer,
                    });
                }
            }
        }
    }

    fn check_conditions(stream: &TokenStream, errors: &mut Vec<StreamError>) {
        for token in stream.iter() {
            for (condition, _) in token.conditions.iter() {
                let valid = stream
                    .get(*condition)
                    .map(|owner| owner.kind.is_scope_keyword())
                    .unwrap_or(false);
                if !valid {
                    errors.push(StreamError::InvalidCondition {
                        position: token.position,
                        condition: *condition,
                    });
                }
            }
        }
    }

    fn check_eof(stream: &TokenStream, errors: &mut Vec<StreamError>) {
        let ends_with_eof = stream
            .tokens()
            .last()
            .map(|t| t.kind == TokenKind::Eof)
            .unwrap_or(false);
        if !ends_with_eof {
            errors.push(StreamError::MissingEof);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::token::Conditions;
    use crate::utils::Span;

    fn token(position: usize, kind: TokenKind, content: &str) -> Token {
        Token::new(position, kind, content, Span::dummy())
    }

    fn stream_with_eof(mut tokens: Vec<Token>) -> TokenStream {
        let position = tokens.len();
        tokens.push(token(position, TokenKind::Eof, ""));
        TokenStream::new(tokens)
    }

    #[test]
    fn test_significant_skips_whitespace_and_comments() {
        let stream = stream_with_eof(vec![
            token(0, TokenKind::If, "if"),
            token(1, TokenKind::Whitespace, " "),
            token(2, TokenKind::Comment, "// note"),
            token(3, TokenKind::OpenParen, "("),
        ]);
        let positions = stream.significant_positions();
        assert_eq!(positions, vec![0, 3, 4]);

        let kinds: Vec<TokenKind> = stream.significant().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::If, TokenKind::OpenParen, TokenKind::Eof]);
    }

    #[test]
    fn test_next_and_prev_significant() {
        let stream = stream_with_eof(vec![
            token(0, TokenKind::If, "if"),
            token(1, TokenKind::Whitespace, " "),
            token(2, TokenKind::OpenParen, "("),
        ]);
        assert_eq!(stream.next_significant(1).map(|t| t.position), Some(2));
        assert_eq!(stream.prev_significant(1).map(|t| t.position), Some(0));
        assert_eq!(stream.prev_significant(0).map(|t| t.position), Some(0));
    }

    #[test]
    fn test_kind_queries() {
        let stream = stream_with_eof(vec![
            token(0, TokenKind::If, "if"),
            token(1, TokenKind::OpenParen, "("),
            token(2, TokenKind::Variable, "$x"),
            token(3, TokenKind::CloseParen, ")"),
            token(4, TokenKind::OpenParen, "("),
            token(5, TokenKind::CloseParen, ")"),
        ]);
        assert_eq!(stream.find_kind(TokenKind::OpenParen).map(|t| t.position), Some(1));
        assert_eq!(stream.find_kind(TokenKind::OpenBrace), None);
        assert_eq!(stream.all_of_kind(TokenKind::OpenParen).len(), 2);
    }

    #[test]
    fn test_tokens_in_scope() {
        let mut body = token(1, TokenKind::Return, "return");
        body.conditions = Conditions::from_stack(&[(0, TokenKind::If)]);
        let stream = stream_with_eof(vec![token(0, TokenKind::If, "if"), body]);

        let members = stream.tokens_in_scope(0);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].position, 1);
        assert!(stream.tokens_in_scope(5).is_empty());
    }

    #[test]
    fn test_validation_accepts_reciprocal_pairs() {
        let mut opener = token(0, TokenKind::OpenParen, "(");
        opener.paren_opener = Link::To(0);
        opener.paren_closer = Link::To(1);
        let mut closer = token(1, TokenKind::CloseParen, ")");
        closer.paren_opener = Link::To(0);
        closer.paren_closer = Link::To(1);
        let stream = stream_with_eof(vec![opener, closer]);
        assert!(validation::validate(&stream).is_empty());
    }

    #[test]
    fn test_validation_flags_broken_pair() {
        let mut opener = token(0, TokenKind::OpenParen, "(");
        opener.paren_closer = Link::To(1);
        let closer = token(1, TokenKind::CloseParen, ")");
        let stream = stream_with_eof(vec![opener, closer]);
        let errors = validation::validate(&stream);
        assert!(errors.contains(&StreamError::BrokenParenPair { opener: 0, closer: 1 }));
    }

    #[test]
    fn test_validation_flags_dangling_link() {
        let mut lone = token(0, TokenKind::OpenParen, "(");
        lone.paren_closer = Link::To(99);
        let stream = stream_with_eof(vec![lone]);
        let errors = validation::validate(&stream);
        assert!(errors
            .iter()
            .any(|e| matches!(e, StreamError::DanglingLink { target: 99, .. })));
    }

    #[test]
    fn test_validation_requires_eof() {
        let stream = TokenStream::new(vec![token(0, TokenKind::If, "if")]);
        let errors = validation::validate(&stream);
        assert!(errors.contains(&StreamError::MissingEof));
    }

    #[test]
    fn test_json_round_trip_preserves_links() {
        let mut opener = token(0, TokenKind::OpenParen, "(");
        opener.paren_closer = Link::Unresolved;
        let stream = stream_with_eof(vec![opener]);
        let json = stream.to_json().unwrap();
        let parsed = TokenStream::from_json(&json).unwrap();
        assert_eq!(parsed.get(0).unwrap().paren_closer, Link::Unresolved);
    }
}
