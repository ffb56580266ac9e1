//! Scope construction
//!
//! A scope-owning keyword goes through a small state machine: it first waits
//! for its controlling parentheses (keywords like `else` skip this stage),
//! then for its body. A body starting with `{` opens an explicit scope that
//! closes at the matching `}`. Any other body token opens an implicit
//! single-statement scope that closes at the first `;` at the keyword's own
//! parenthesis and square bracket depth, or, when the body is itself a
//! scope-owning keyword, wherever that nested scope closes.
//!
//! The condition stack mirrors the currently open scopes, outermost first.
//! Every token gets a snapshot of the stack as its conditions; delimiters
//! take the snapshot from outside the scope they delimit. Scopes still open
//! at end of input keep unresolved closer links. Nothing here is fatal.
use crate::tokens::{Conditions, Link, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingStage {
    /// Waiting for the controlling `(` after the keyword
    AwaitCondition,
    /// Condition complete (or not applicable), waiting for the body
    AwaitOpener,
}

#[derive(Debug)]
struct PendingScope {
    keyword: usize,
    stage: PendingStage,
    condition_opener: Option<usize>,
    /// Position of the controlling `)`; that token belongs to the
    /// condition, never to the body
    condition_closer: Option<usize>,
}

#[derive(Debug)]
struct OpenScope {
    condition: usize,
    opener: usize,
    explicit: bool,
    base_depth: usize,
    /// Set when an implicit body starts with a nested scope keyword; the
    /// implicit scope then closes where the nested scope closes
    body_keyword: Option<usize>,
}

/// Tracks scope conditions and openers during the structural pass
#[derive(Debug, Default)]
pub struct ScopeTracker {
    condition_stack: Vec<(usize, TokenKind)>,
    open_scopes: Vec<OpenScope>,
    pending: Option<PendingScope>,
    scopes_opened: usize,
    implicit_scopes: usize,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scopes_opened(&self) -> usize {
        self.scopes_opened
    }

    pub fn implicit_scopes(&self) -> usize {
        self.implicit_scopes
    }

    /// Scopes and pending keywords never closed before end of input
    pub fn unresolved_count(&self) -> usize {
        self.open_scopes.len() + usize::from(self.pending.is_some())
    }

    /// Snapshot the condition stack onto a token. Runs after closings and
    /// before openings, so delimiters see only the scopes outside their own.
    pub fn annotate(&self, tokens: &mut [Token], position: usize) {
        tokens[position].conditions = Conditions::from_stack(&self.condition_stack);
        if tokens[position].scope_condition == Link::None {
            if let Some((condition, _)) = self.condition_stack.last() {
                tokens[position].scope_condition = Link::To(*condition);
            }
        }
    }

    /// Ownership claim for a just-opened parenthesis
    pub fn on_paren_opened(&mut self, tokens: &mut [Token], position: usize) {
        if let Some(pending) = &mut self.pending {
            if pending.stage == PendingStage::AwaitCondition && pending.condition_opener.is_none() {
                pending.condition_opener = Some(position);
                tokens[position].paren_owner = Link::To(pending.keyword);
                // The keyword records itself as the owner of its parentheses
                tokens[pending.keyword].paren_owner = Link::To(pending.keyword);
                tokens[pending.keyword].paren_opener = Link::To(position);
                tokens[pending.keyword].paren_closer = Link::Unresolved;
            }
        }
    }

    /// Stage transition when the controlling parenthesis pair closes
    pub fn on_paren_closed(&mut self, tokens: &mut [Token], opener: usize, closer: usize) {
        if let Some(pending) = &mut self.pending {
            if pending.stage == PendingStage::AwaitCondition
                && pending.condition_opener == Some(opener)
            {
                tokens[pending.keyword].paren_closer = Link::To(closer);
                pending.condition_closer = Some(closer);
                pending.stage = PendingStage::AwaitOpener;
            }
        }
    }

    /// Statement boundary handling; runs in the closing phase
    pub fn on_semicolon(&mut self, tokens: &mut [Token], position: usize, depth: usize) {
        // A semicolon arriving where the body should start is an empty
        // statement: the implicit scope opens and closes on it
        if let Some(pending) = &self.pending {
            if pending.stage == PendingStage::AwaitOpener {
                let keyword = pending.keyword;
                tokens[keyword].scope_opener = Link::To(position);
                tokens[keyword].scope_closer = Link::To(position);
                tokens[position].scope_condition = Link::To(keyword);
                tokens[position].scope_opener = Link::To(position);
                tokens[position].scope_closer = Link::To(position);
                self.scopes_opened += 1;
                self.implicit_scopes += 1;
                self.pending = None;
            }
        }
        while self
            .open_scopes
            .last()
            .map(|top| !top.explicit && top.base_depth == depth)
            .unwrap_or(false)
        {
            if let Some(scope) = self.open_scopes.pop() {
                self.close_scope(tokens, scope, position);
            }
        }
    }

    /// Scope closing when a brace pair resolves; runs in the closing phase
    pub fn on_brace_closed(&mut self, tokens: &mut [Token], opener: usize, closer: usize) {
        let top_matches = self
            .open_scopes
            .last()
            .map(|top| top.explicit && top.opener == opener)
            .unwrap_or(false);
        if !top_matches {
            return;
        }
        if let Some(scope) = self.open_scopes.pop() {
            let mut closed_condition = scope.condition;
            self.close_scope(tokens, scope, closer);
            // An implicit scope whose body was the scope just closed closes
            // with it, cascading outward
            while self
                .open_scopes
                .last()
                .map(|top| !top.explicit && top.body_keyword == Some(closed_condition))
                .unwrap_or(false)
            {
                if let Some(outer) = self.open_scopes.pop() {
                    closed_condition = outer.condition;
                    self.close_scope(tokens, outer, closer);
                }
            }
        }
    }

    /// Body decisions and keyword pickup; runs in the opening phase, after
    /// annotation
    pub fn on_significant(&mut self, tokens: &mut [Token], position: usize, depth: usize) {
        let kind = tokens[position].kind;

        // A keyword still waiting for `(` stays pending while the
        // parenthesis handler claims the opener; any other significant
        // token means the condition never materialized and the body
        // starts here
        if let Some(pending) = &mut self.pending {
            // The controlling `)` closes the condition; the body starts
            // at the next significant token
            if pending.condition_closer == Some(position) {
                return;
            }
            if pending.stage == PendingStage::AwaitCondition {
                if pending.condition_opener.is_some() || kind == TokenKind::OpenParen {
                    return;
                }
                pending.stage = PendingStage::AwaitOpener;
            }
        }

        let awaiting_body = self
            .pending
            .as_ref()
            .map(|pending| pending.stage == PendingStage::AwaitOpener)
            .unwrap_or(false);
        if awaiting_body {
            if let Some(pending) = self.pending.take() {
                self.open_body(tokens, pending.keyword, position, depth);
            }
        }

        if kind.is_scope_keyword() {
            tokens[position].scope_condition = Link::To(position);
            tokens[position].scope_opener = Link::Unresolved;
            tokens[position].scope_closer = Link::Unresolved;
            let stage = if kind.takes_condition() {
                PendingStage::AwaitCondition
            } else {
                PendingStage::AwaitOpener
            };
            self.pending = Some(PendingScope {
                keyword: position,
                stage,
                condition_opener: None,
                condition_closer: None,
            });
        }
    }

    fn open_body(&mut self, tokens: &mut [Token], keyword: usize, opener: usize, depth: usize) {
        let explicit = tokens[opener].kind == TokenKind::OpenBrace;
        tokens[keyword].scope_opener = Link::To(opener);
        tokens[opener].scope_condition = Link::To(keyword);
        tokens[opener].scope_opener = Link::To(opener);
        tokens[opener].scope_closer = Link::Unresolved;

        let body_keyword = if !explicit && tokens[opener].kind.is_scope_keyword() {
            Some(opener)
        } else {
            None
        };
        self.open_scopes.push(OpenScope {
            condition: keyword,
            opener,
            explicit,
            base_depth: depth,
            body_keyword,
        });
        self.condition_stack.push((keyword, tokens[keyword].kind));
        self.scopes_opened += 1;
        if !explicit {
            self.implicit_scopes += 1;
        }
    }

    fn close_scope(&mut self, tokens: &mut [Token], scope: OpenScope, closer: usize) {
        self.condition_stack.pop();
        tokens[scope.condition].scope_closer = Link::To(closer);
        tokens[scope.opener].scope_closer = Link::To(closer);
        // The closer token itself records the innermost scope it closes
        if tokens[closer].scope_condition == Link::None {
            tokens[closer].scope_condition = Link::To(scope.condition);
            tokens[closer].scope_opener = Link::To(scope.opener);
            tokens[closer].scope_closer = Link::To(closer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::brackets::BracketTracker;
    use crate::utils::Span;

    fn token(position: usize, kind: TokenKind, content: &str) -> Token {
        Token::new(position, kind, content, Span::dummy())
    }

    /// Drive the trackers over a token sequence in the same order the
    /// orchestrator uses
    fn run(tokens: &mut [Token]) -> ScopeTracker {
        let mut brackets = BracketTracker::new();
        let mut scopes = ScopeTracker::new();
        for position in 0..tokens.len() {
            match tokens[position].kind {
                TokenKind::CloseParen => {
                    if let Some(opener) = brackets.close_paren(tokens, position) {
                        scopes.on_paren_closed(tokens, opener, position);
                    }
                }
                TokenKind::CloseBrace => {
                    if let Some(opener) = brackets.close_brace(tokens, position) {
                        scopes.on_brace_closed(tokens, opener, position);
                    }
                }
                TokenKind::Semicolon => {
                    scopes.on_semicolon(tokens, position, brackets.nesting_depth());
                }
                _ => {}
            }
            scopes.annotate(tokens, position);
            if tokens[position].is_significant() {
                scopes.on_significant(tokens, position, brackets.nesting_depth());
            }
            match tokens[position].kind {
                TokenKind::OpenParen => {
                    brackets.open_paren(tokens, position);
                    scopes.on_paren_opened(tokens, position);
                }
                TokenKind::OpenBrace => brackets.open_brace(tokens, position),
                TokenKind::OpenSquare => brackets.open_square(tokens, position),
                _ => {}
            }
        }
        scopes
    }

    fn sequence(kinds: &[(TokenKind, &str)]) -> Vec<Token> {
        kinds
            .iter()
            .enumerate()
            .map(|(position, (kind, content))| token(position, *kind, content))
            .collect()
    }

    #[test]
    fn test_explicit_scope() {
        // if ( true ) { return ; }
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::True, "true"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::OpenBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::CloseBrace, "}"),
        ]);
        run(&mut tokens);

        assert_eq!(tokens[0].scope_condition, Link::To(0));
        assert_eq!(tokens[0].scope_opener, Link::To(4));
        assert_eq!(tokens[0].scope_closer, Link::To(7));
        assert_eq!(tokens[0].paren_opener, Link::To(1));
        assert_eq!(tokens[0].paren_closer, Link::To(3));
        assert_eq!(tokens[0].paren_owner, Link::To(0));
        assert_eq!(tokens[1].paren_owner, Link::To(0));
        assert_eq!(tokens[3].paren_owner, Link::To(0));
        assert_eq!(tokens[4].scope_condition, Link::To(0));
        assert_eq!(tokens[7].scope_condition, Link::To(0));
        assert_eq!(tokens[7].scope_opener, Link::To(4));
        // Body tokens carry the enclosing condition
        assert!(tokens[5].conditions.contains(0));
        assert_eq!(tokens[5].scope_condition, Link::To(0));
        // Delimiters take conditions from outside the scope they delimit
        assert!(!tokens[4].conditions.contains(0));
        assert!(!tokens[7].conditions.contains(0));
    }

    #[test]
    fn test_implicit_scope_closes_at_statement_boundary() {
        // if ( $x ) return ;
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$x"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Return, "return"),
            (TokenKind::Semicolon, ";"),
        ]);
        let scopes = run(&mut tokens);

        assert_eq!(tokens[0].scope_opener, Link::To(4));
        assert_eq!(tokens[0].scope_closer, Link::To(5));
        assert_eq!(tokens[4].scope_condition, Link::To(0));
        assert_eq!(tokens[5].scope_condition, Link::To(0));
        assert_eq!(scopes.implicit_scopes(), 1);
    }

    #[test]
    fn test_implicit_scope_ignores_semicolons_inside_parens() {
        // if ( $x ) $y = call ( 1 ; 2 ) ;  -- malformed call, but the inner
        // semicolon sits at depth 1 and must not end the statement
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$x"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Variable, "$y"),
            (TokenKind::Assign, "="),
            (TokenKind::Identifier, "call"),
            (TokenKind::OpenParen, "("),
            (TokenKind::IntLiteral, "1"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::IntLiteral, "2"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Semicolon, ";"),
        ]);
        run(&mut tokens);

        assert_eq!(tokens[0].scope_closer, Link::To(12));
    }

    #[test]
    fn test_nested_implicit_scopes_share_a_closer() {
        // if ( $a ) if ( $b ) return ;
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$a"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$b"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Return, "return"),
            (TokenKind::Semicolon, ";"),
        ]);
        run(&mut tokens);

        assert_eq!(tokens[0].scope_opener, Link::To(4));
        assert_eq!(tokens[0].scope_closer, Link::To(9));
        assert_eq!(tokens[4].scope_opener, Link::To(8));
        assert_eq!(tokens[4].scope_closer, Link::To(9));
        // Tokens in the inner condition sit inside the outer scope; each
        // scope's opener delimiter carries only the conditions outside it
        assert!(tokens[6].conditions.contains(0));
        assert!(!tokens[4].conditions.contains(0));
        assert!(tokens[8].conditions.contains(0));
        assert!(!tokens[8].conditions.contains(4));
    }

    #[test]
    fn test_implicit_scope_cascades_with_nested_explicit_scope() {
        // if ( $a ) while ( $b ) { work ( ) ; }
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$a"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::While, "while"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$b"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::OpenBrace, "{"),
            (TokenKind::Identifier, "work"),
            (TokenKind::OpenParen, "("),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::CloseBrace, "}"),
        ]);
        run(&mut tokens);

        // The while closes at the brace, and the outer if closes with it
        assert_eq!(tokens[4].scope_closer, Link::To(13));
        assert_eq!(tokens[0].scope_closer, Link::To(13));
        assert_eq!(tokens[0].scope_opener, Link::To(4));
    }

    #[test]
    fn test_unterminated_scope_keeps_unresolved_closer() {
        // if ( $x ) { return ;
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$x"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::OpenBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::Semicolon, ";"),
        ]);
        let scopes = run(&mut tokens);

        assert_eq!(tokens[0].scope_opener, Link::To(4));
        assert_eq!(tokens[0].scope_closer, Link::Unresolved);
        assert_eq!(tokens[4].scope_closer, Link::Unresolved);
        assert_eq!(scopes.unresolved_count(), 1);
    }

    #[test]
    fn test_condition_closer_is_not_a_body() {
        // while ( $x ) $y ;
        let mut tokens = sequence(&[
            (TokenKind::While, "while"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$x"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Variable, "$y"),
            (TokenKind::Semicolon, ";"),
        ]);
        run(&mut tokens);

        // The body anchors on the first token after the controlling `)`
        assert_eq!(tokens[0].scope_opener, Link::To(4));
        assert_eq!(tokens[0].scope_closer, Link::To(5));
        assert_eq!(tokens[4].scope_condition, Link::To(0));
    }

    #[test]
    fn test_condition_without_body_stays_pending() {
        // if ( $x ) <end of input>
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$x"),
            (TokenKind::CloseParen, ")"),
        ]);
        let scopes = run(&mut tokens);

        assert_eq!(tokens[0].paren_closer, Link::To(3));
        assert_eq!(tokens[0].scope_opener, Link::Unresolved);
        assert_eq!(tokens[0].scope_closer, Link::Unresolved);
        assert_eq!(scopes.unresolved_count(), 1);
    }

    #[test]
    fn test_keyword_without_condition_goes_straight_to_body() {
        // else { return ; }
        let mut tokens = sequence(&[
            (TokenKind::Else, "else"),
            (TokenKind::OpenBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::CloseBrace, "}"),
        ]);
        run(&mut tokens);

        assert_eq!(tokens[0].scope_opener, Link::To(1));
        assert_eq!(tokens[0].scope_closer, Link::To(4));
        assert_eq!(tokens[0].paren_opener, Link::None);
    }

    #[test]
    fn test_empty_statement_body() {
        // while ( $x ) ;
        let mut tokens = sequence(&[
            (TokenKind::While, "while"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$x"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Semicolon, ";"),
        ]);
        run(&mut tokens);

        assert_eq!(tokens[0].scope_opener, Link::To(4));
        assert_eq!(tokens[0].scope_closer, Link::To(4));
        assert_eq!(tokens[4].scope_condition, Link::To(0));
    }

    #[test]
    fn test_nested_function_call_in_condition_keeps_ownership() {
        // if ( check ( $x ) ) { }
        let mut tokens = sequence(&[
            (TokenKind::If, "if"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Identifier, "check"),
            (TokenKind::OpenParen, "("),
            (TokenKind::Variable, "$x"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::CloseParen, ")"),
            (TokenKind::OpenBrace, "{"),
            (TokenKind::CloseBrace, "}"),
        ]);
        run(&mut tokens);

        // Only the outer pair is owned
        assert_eq!(tokens[1].paren_owner, Link::To(0));
        assert_eq!(tokens[3].paren_owner, Link::None);
        assert_eq!(tokens[5].paren_owner, Link::None);
        assert_eq!(tokens[0].paren_closer, Link::To(6));
        assert_eq!(tokens[0].scope_opener, Link::To(7));
    }
}
