//! Raw lexical scanning
//!
//! The scanner performs a single forward pass over the source and produces
//! raw units with spans. It recognizes every lexical surface form of Quill
//! but makes no structural decisions: cast recombination happens in the
//! classifier, delimiter pairing in the structure builders.
//!
//! The scanner never fails on input text. Bytes it does not recognize become
//! `Unknown` units and unterminated strings, comments and heredocs run to end
//! of input.
use crate::tokens::kind::{classify_word, TokenKind};
use crate::utils::{Position, Span};

/// A raw lexical unit before cast recombination
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    pub kind: TokenKind,
    /// Exact source substring
    pub content: String,
    /// Canonical lower-cased form, kept only where it differs from `content`
    pub normalized: Option<String>,
    pub span: Span,
}

impl RawToken {
    fn new(kind: TokenKind, content: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            content: content.into(),
            normalized: None,
            span,
        }
    }

    fn with_normalized(mut self, normalized: String) -> Self {
        if normalized != self.content {
            self.normalized = Some(normalized);
        }
        self
    }
}

/// Single-pass scanner over Quill source text
pub struct Scanner<'a> {
    source: &'a str,
    pos: Position,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: Position::start(),
        }
    }

    /// Scan the entire source into raw units. End-of-input is not
    /// represented here; the orchestrator appends the final marker.
    pub fn scan(mut self) -> Vec<RawToken> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' => self.scan_horizontal_whitespace(&mut tokens),
                '\r' | '\n' => self.scan_newline(&mut tokens),
                '/' if self.peek_ahead(1) == Some('/') => self.scan_line_comment(&mut tokens),
                '/' if self.peek_ahead(1) == Some('*') => self.scan_block_comment(&mut tokens),
                '#' if self.peek_ahead(1) == Some('[') => {
                    let start = self.pos;
                    self.bump();
                    self.bump();
                    tokens.push(RawToken::new(
                        TokenKind::Attribute,
                        "#[",
                        Span::new(start, self.pos),
                    ));
                }
                '#' => self.scan_line_comment(&mut tokens),
                '\'' | '"' => self.scan_quoted_string(ch, &mut tokens),
                '<' if self.is_heredoc_start() => self.scan_heredoc(&mut tokens),
                '$' => self.scan_variable(&mut tokens),
                c if c.is_ascii_digit() => self.scan_number(&mut tokens),
                c if is_identifier_start(c) => self.scan_word(&mut tokens),
                _ => self.scan_symbol(&mut tokens),
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos.offset..].chars().next()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.source[self.pos.offset..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    fn slice_from(&self, start: Position) -> &'a str {
        &self.source[start.offset..self.pos.offset]
    }

    fn push(&self, tokens: &mut Vec<RawToken>, kind: TokenKind, start: Position) {
        tokens.push(RawToken::new(
            kind,
            self.slice_from(start),
            Span::new(start, self.pos),
        ));
    }

    fn scan_horizontal_whitespace(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
        self.push(tokens, TokenKind::Whitespace, start);
    }

    /// One newline unit per line break; a CRLF pair collapses into a single
    /// unit
    fn scan_newline(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        if self.peek() == Some('\r') {
            self.bump();
        }
        if self.peek() == Some('\n') {
            self.bump();
        }
        self.push(tokens, TokenKind::Newline, start);
    }

    fn scan_line_comment(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.bump();
        }
        self.push(tokens, TokenKind::Comment, start);
    }

    fn scan_block_comment(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        self.bump();
        self.bump();
        // Unterminated block comment runs to end of input
        while let Some(ch) = self.bump() {
            if ch == '*' && self.peek() == Some('/') {
                self.bump();
                break;
            }
        }
        self.push(tokens, TokenKind::Comment, start);
    }

    fn scan_quoted_string(&mut self, quote: char, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        self.bump();
        // Unterminated string runs to end of input
        while let Some(ch) = self.bump() {
            if ch == '\\' {
                self.bump();
            } else if ch == quote {
                break;
            }
        }
        let kind = if quote == '\'' {
            TokenKind::SingleQuotedString
        } else {
            TokenKind::DoubleQuotedString
        };
        self.push(tokens, kind, start);
    }

    fn is_heredoc_start(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("<<<")
            && rest[3..]
                .chars()
                .next()
                .map(is_identifier_start)
                .unwrap_or(false)
    }

    fn scan_heredoc(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        self.bump();
        self.bump();
        self.bump();
        let tag_start = self.pos;
        while self.peek().map(is_identifier_char).unwrap_or(false) {
            self.bump();
        }
        let tag = self.slice_from(tag_start).to_string();
        self.push(tokens, TokenKind::HeredocStart, start);

        if matches!(self.peek(), Some('\r' | '\n')) {
            self.scan_newline(tokens);
        }

        // Body runs until a line that starts with the closing tag at a word
        // boundary; unterminated bodies run to end of input with no end unit
        let body_start = self.pos;
        let mut end_of_body = None;
        let mut line_start = true;
        let mut probe = self.pos;
        while probe.offset < self.source.len() {
            if line_start && closing_tag_at(&self.source[probe.offset..], &tag) {
                end_of_body = Some(probe);
                break;
            }
            let ch = match self.source[probe.offset..].chars().next() {
                Some(ch) => ch,
                None => break,
            };
            line_start = ch == '\n';
            probe = probe.advance(ch);
        }

        match end_of_body {
            Some(tag_line) => {
                while self.pos.offset < tag_line.offset {
                    self.bump();
                }
                if self.pos.offset > body_start.offset {
                    self.push(tokens, TokenKind::HeredocBody, body_start);
                }
                let end_start = self.pos;
                for _ in 0..tag.chars().count() {
                    self.bump();
                }
                self.push(tokens, TokenKind::HeredocEnd, end_start);
            }
            None => {
                while self.bump().is_some() {}
                if self.pos.offset > body_start.offset {
                    self.push(tokens, TokenKind::HeredocBody, body_start);
                }
            }
        }
    }

    fn scan_variable(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        self.bump();
        if self.peek().map(is_identifier_start).unwrap_or(false) {
            while self.peek().map(is_identifier_char).unwrap_or(false) {
                self.bump();
            }
            self.push(tokens, TokenKind::Variable, start);
        } else {
            // A lone dollar sign is not a variable
            self.push(tokens, TokenKind::Unknown, start);
        }
    }

    fn scan_number(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.bump();
        }
        // A float needs digits on both sides of the dot; "1." stays an
        // integer followed by a dot unit
        let is_float = self.peek() == Some('.')
            && self
                .peek_ahead(1)
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false);
        if is_float {
            self.bump();
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.bump();
            }
            self.push(tokens, TokenKind::FloatLiteral, start);
        } else {
            self.push(tokens, TokenKind::IntLiteral, start);
        }
    }

    fn scan_word(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        while self.peek().map(is_identifier_char).unwrap_or(false) {
            self.bump();
        }
        let word = self.slice_from(start);
        let kind = classify_word(word);
        let mut token = RawToken::new(kind, word, Span::new(start, self.pos));
        if kind != TokenKind::Identifier {
            token = token.with_normalized(word.to_ascii_lowercase());
        }
        tokens.push(token);
    }

    fn scan_symbol(&mut self, tokens: &mut Vec<RawToken>) {
        let start = self.pos;
        // Longest match first
        let kind = if self.eat_str("===") {
            TokenKind::Identical
        } else if self.eat_str("!==") {
            TokenKind::NotIdentical
        } else if self.eat_str("==") {
            TokenKind::Equal
        } else if self.eat_str("!=") {
            TokenKind::NotEqual
        } else if self.eat_str("<=") {
            TokenKind::LessThanOrEqual
        } else if self.eat_str(">=") {
            TokenKind::GreaterThanOrEqual
        } else if self.eat_str("&&") {
            TokenKind::BooleanAnd
        } else if self.eat_str("||") {
            TokenKind::BooleanOr
        } else if self.eat_str("->") {
            TokenKind::Arrow
        } else if self.eat_str("=>") {
            TokenKind::DoubleArrow
        } else {
            match self.bump() {
                Some('(') => TokenKind::OpenParen,
                Some(')') => TokenKind::CloseParen,
                Some('{') => TokenKind::OpenBrace,
                Some('}') => TokenKind::CloseBrace,
                Some('[') => TokenKind::OpenSquare,
                Some(']') => TokenKind::CloseSquare,
                Some(';') => TokenKind::Semicolon,
                Some(',') => TokenKind::Comma,
                Some(':') => TokenKind::Colon,
                Some('?') => TokenKind::Question,
                Some('.') => TokenKind::Dot,
                Some('=') => TokenKind::Assign,
                Some('<') => TokenKind::LessThan,
                Some('>') => TokenKind::GreaterThan,
                Some('+') => TokenKind::Plus,
                Some('-') => TokenKind::Minus,
                Some('*') => TokenKind::Multiply,
                Some('/') => TokenKind::Divide,
                Some('%') => TokenKind::Modulus,
                Some('!') => TokenKind::Not,
                Some(_) => TokenKind::Unknown,
                None => return,
            }
        };
        self.push(tokens, kind, start);
    }

    fn eat_str(&mut self, symbol: &str) -> bool {
        if self.rest().starts_with(symbol) {
            for _ in 0..symbol.chars().count() {
                self.bump();
            }
            true
        } else {
            false
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Check whether `rest` begins with `tag` at a word boundary
fn closing_tag_at(rest: &str, tag: &str) -> bool {
    if !rest.starts_with(tag) {
        return false;
    }
    rest[tag.len()..]
        .chars()
        .next()
        .map(|ch| !is_identifier_char(ch))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source).scan().into_iter().map(|t| t.kind).collect()
    }

    fn contents(source: &str) -> Vec<String> {
        Scanner::new(source).scan().into_iter().map(|t| t.content).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("if value"),
            vec![TokenKind::If, TokenKind::Whitespace, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_keyword_case_normalization() {
        let tokens = Scanner::new("IF").scan();
        assert_eq!(tokens[0].kind, TokenKind::If);
        assert_eq!(tokens[0].content, "IF");
        assert_eq!(tokens[0].normalized.as_deref(), Some("if"));

        let tokens = Scanner::new("if").scan();
        assert_eq!(tokens[0].normalized, None);
    }

    #[test]
    fn test_variables() {
        assert_eq!(kinds("$value"), vec![TokenKind::Variable]);
        assert_eq!(contents("$value"), vec!["$value"]);
        assert_eq!(kinds("$ x"), vec![TokenKind::Unknown, TokenKind::Whitespace, TokenKind::Identifier]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42"), vec![TokenKind::IntLiteral]);
        assert_eq!(kinds("3.14"), vec![TokenKind::FloatLiteral]);
        assert_eq!(kinds("1."), vec![TokenKind::IntLiteral, TokenKind::Dot]);
    }

    #[test]
    fn test_strings_run_to_eof_when_unterminated() {
        assert_eq!(kinds("'done'"), vec![TokenKind::SingleQuotedString]);
        assert_eq!(kinds("\"a \\\" b\""), vec![TokenKind::DoubleQuotedString]);
        assert_eq!(kinds("'open"), vec![TokenKind::SingleQuotedString]);
        assert_eq!(contents("'open"), vec!["'open"]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("// note\nx"),
            vec![TokenKind::Comment, TokenKind::Newline, TokenKind::Identifier]
        );
        assert_eq!(
            kinds("# note\nx"),
            vec![TokenKind::Comment, TokenKind::Newline, TokenKind::Identifier]
        );
        assert_eq!(kinds("/* a\nb */x"), vec![TokenKind::Comment, TokenKind::Identifier]);
        // Unterminated block comment runs to end of input
        assert_eq!(kinds("/* open"), vec![TokenKind::Comment]);
    }

    #[test]
    fn test_attribute_marker_beats_hash_comment() {
        assert_eq!(
            kinds("#[Check]"),
            vec![TokenKind::Attribute, TokenKind::Identifier, TokenKind::CloseSquare]
        );
    }

    #[test]
    fn test_crlf_is_one_newline_unit() {
        assert_eq!(kinds("a\r\nb"), vec![TokenKind::Identifier, TokenKind::Newline, TokenKind::Identifier]);
        let tokens = Scanner::new("a\r\nb").scan();
        assert_eq!(tokens[1].content, "\r\n");
        assert_eq!(tokens[2].span.start.line, 2);
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(kinds("==="), vec![TokenKind::Identical]);
        assert_eq!(kinds("!=="), vec![TokenKind::NotIdentical]);
        assert_eq!(kinds("=>"), vec![TokenKind::DoubleArrow]);
        assert_eq!(kinds("->"), vec![TokenKind::Arrow]);
        assert_eq!(
            kinds("a<=b"),
            vec![TokenKind::Identifier, TokenKind::LessThanOrEqual, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_unknown_bytes_are_tokens_not_errors() {
        assert_eq!(kinds("@"), vec![TokenKind::Unknown]);
        assert_eq!(kinds("a @ b").len(), 5);
    }

    #[test]
    fn test_heredoc() {
        let source = "<<<EOT\nline one\nline two\nEOT;";
        let tokens = Scanner::new(source).scan();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::HeredocStart,
                TokenKind::Newline,
                TokenKind::HeredocBody,
                TokenKind::HeredocEnd,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(tokens[0].content, "<<<EOT");
        assert_eq!(tokens[2].content, "line one\nline two\n");
        assert_eq!(tokens[3].content, "EOT");
    }

    #[test]
    fn test_unterminated_heredoc_runs_to_eof() {
        let source = "<<<EOT\nno closer here";
        let kinds: Vec<TokenKind> = Scanner::new(source).scan().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::HeredocStart, TokenKind::Newline, TokenKind::HeredocBody]
        );
    }

    #[test]
    fn test_heredoc_tag_must_be_at_line_start() {
        let source = "<<<EOT\nnot EOT here\nEOT\n";
        let tokens = Scanner::new(source).scan();
        assert_eq!(tokens[2].kind, TokenKind::HeredocBody);
        assert_eq!(tokens[2].content, "not EOT here\n");
        assert_eq!(tokens[3].kind, TokenKind::HeredocEnd);
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let tokens = Scanner::new("if\n  $x").scan();
        assert_eq!(tokens[0].span.start.line, 1);
        assert_eq!(tokens[0].span.start.column, 1);
        let var = tokens.last().unwrap();
        assert_eq!(var.span.start.line, 2);
        assert_eq!(var.span.start.column, 3);
    }
}
