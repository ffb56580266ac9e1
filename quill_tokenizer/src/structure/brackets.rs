//! Delimiter pairing
//!
//! One stack per delimiter family, classic matching discipline. Every opener
//! marks its own pairing links the moment it is pushed: the opener link
//! resolves to itself and the closer link is recorded as unresolved. Finding
//! the matching closer upgrades both sides to resolved positions, so an
//! opener that never matches keeps its unresolved closer without any end-of-
//! input fixup pass.
use crate::tokens::{Link, Token};

/// Tracks parenthesis, brace, and square bracket pairing during the
/// structural pass
#[derive(Debug, Default)]
pub struct BracketTracker {
    paren_stack: Vec<usize>,
    brace_stack: Vec<usize>,
    square_stack: Vec<usize>,
}

impl BracketTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combined parenthesis and square bracket depth, used for statement
    /// boundary decisions
    pub fn nesting_depth(&self) -> usize {
        self.paren_stack.len() + self.square_stack.len()
    }

    pub fn square_depth(&self) -> usize {
        self.square_stack.len()
    }

    pub fn open_paren(&mut self, tokens: &mut [Token], position: usize) {
        tokens[position].paren_opener = Link::To(position);
        tokens[position].paren_closer = Link::Unresolved;
        self.paren_stack.push(position);
    }

    /// Close a parenthesis pair, returning the opener position. A stray
    /// closer keeps an unresolved opener link and returns `None`.
    pub fn close_paren(&mut self, tokens: &mut [Token], position: usize) -> Option<usize> {
        match self.paren_stack.pop() {
            Some(opener) => {
                tokens[opener].paren_closer = Link::To(position);
                tokens[position].paren_opener = Link::To(opener);
                tokens[position].paren_closer = Link::To(position);
                // Ownership recorded on the opener propagates to the closer
                tokens[position].paren_owner = tokens[opener].paren_owner;
                Some(opener)
            }
            None => {
                tokens[position].paren_opener = Link::Unresolved;
                tokens[position].paren_closer = Link::To(position);
                None
            }
        }
    }

    pub fn open_brace(&mut self, tokens: &mut [Token], position: usize) {
        tokens[position].bracket_opener = Link::To(position);
        tokens[position].bracket_closer = Link::Unresolved;
        self.brace_stack.push(position);
    }

    pub fn close_brace(&mut self, tokens: &mut [Token], position: usize) -> Option<usize> {
        match self.brace_stack.pop() {
            Some(opener) => {
                tokens[opener].bracket_closer = Link::To(position);
                tokens[position].bracket_opener = Link::To(opener);
                tokens[position].bracket_closer = Link::To(position);
                Some(opener)
            }
            None => {
                tokens[position].bracket_opener = Link::Unresolved;
                tokens[position].bracket_closer = Link::To(position);
                None
            }
        }
    }

    pub fn open_square(&mut self, tokens: &mut [Token], position: usize) {
        tokens[position].bracket_opener = Link::To(position);
        tokens[position].bracket_closer = Link::Unresolved;
        self.square_stack.push(position);
    }

    pub fn close_square(&mut self, tokens: &mut [Token], position: usize) -> Option<usize> {
        match self.square_stack.pop() {
            Some(opener) => {
                tokens[opener].bracket_closer = Link::To(position);
                tokens[position].bracket_opener = Link::To(opener);
                tokens[position].bracket_closer = Link::To(position);
                Some(opener)
            }
            None => {
                tokens[position].bracket_opener = Link::Unresolved;
                tokens[position].bracket_closer = Link::To(position);
                None
            }
        }
    }

    /// Count of openers never matched before end of input
    pub fn unresolved_count(&self) -> usize {
        self.paren_stack.len() + self.brace_stack.len() + self.square_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use crate::utils::Span;

    fn token(position: usize, kind: TokenKind, content: &str) -> Token {
        Token::new(position, kind, content, Span::dummy())
    }

    #[test]
    fn test_paren_pairing_is_mutual() {
        let mut tokens = vec![
            token(0, TokenKind::OpenParen, "("),
            token(1, TokenKind::Identifier, "x"),
            token(2, TokenKind::CloseParen, ")"),
        ];
        let mut tracker = BracketTracker::new();
        tracker.open_paren(&mut tokens, 0);
        assert_eq!(tokens[0].paren_closer, Link::Unresolved);
        let opener = tracker.close_paren(&mut tokens, 2);
        assert_eq!(opener, Some(0));
        assert_eq!(tokens[0].paren_closer, Link::To(2));
        assert_eq!(tokens[2].paren_opener, Link::To(0));
        assert_eq!(tracker.unresolved_count(), 0);
    }

    #[test]
    fn test_unmatched_opener_stays_unresolved() {
        let mut tokens = vec![token(0, TokenKind::OpenParen, "(")];
        let mut tracker = BracketTracker::new();
        tracker.open_paren(&mut tokens, 0);
        assert_eq!(tokens[0].paren_opener, Link::To(0));
        assert_eq!(tokens[0].paren_closer, Link::Unresolved);
        assert_eq!(tracker.unresolved_count(), 1);
    }

    #[test]
    fn test_stray_closer_gets_unresolved_opener() {
        let mut tokens = vec![token(0, TokenKind::CloseParen, ")")];
        let mut tracker = BracketTracker::new();
        assert_eq!(tracker.close_paren(&mut tokens, 0), None);
        assert_eq!(tokens[0].paren_opener, Link::Unresolved);
    }

    #[test]
    fn test_nested_pairs_match_inside_out() {
        let mut tokens = vec![
            token(0, TokenKind::OpenParen, "("),
            token(1, TokenKind::OpenParen, "("),
            token(2, TokenKind::CloseParen, ")"),
            token(3, TokenKind::CloseParen, ")"),
        ];
        let mut tracker = BracketTracker::new();
        tracker.open_paren(&mut tokens, 0);
        tracker.open_paren(&mut tokens, 1);
        assert_eq!(tracker.nesting_depth(), 2);
        assert_eq!(tracker.close_paren(&mut tokens, 2), Some(1));
        assert_eq!(tracker.close_paren(&mut tokens, 3), Some(0));
        assert_eq!(tokens[1].paren_closer, Link::To(2));
        assert_eq!(tokens[0].paren_closer, Link::To(3));
    }

    #[test]
    fn test_square_and_brace_families_are_independent() {
        let mut tokens = vec![
            token(0, TokenKind::OpenBrace, "{"),
            token(1, TokenKind::OpenSquare, "["),
            token(2, TokenKind::CloseSquare, "]"),
            token(3, TokenKind::CloseBrace, "}"),
        ];
        let mut tracker = BracketTracker::new();
        tracker.open_brace(&mut tokens, 0);
        tracker.open_square(&mut tokens, 1);
        assert_eq!(tracker.close_square(&mut tokens, 2), Some(1));
        assert_eq!(tracker.close_brace(&mut tokens, 3), Some(0));
        assert_eq!(tokens[1].bracket_closer, Link::To(2));
        assert_eq!(tokens[0].bracket_closer, Link::To(3));
    }
}
