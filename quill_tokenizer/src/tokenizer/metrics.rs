//! Tokenization metrics with runtime preferences

use std::collections::HashMap;

use crate::config::runtime::ScannerPreferences;
use crate::log_success;
use crate::logging::codes;
use crate::tokens::{Token, TokenClass};

/// Essential tokenization metrics with runtime preferences
#[derive(Debug, Default, Clone)]
pub struct TokenizerMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub name_tokens: usize,
    pub operator_tokens: usize,
    pub literal_tokens: usize,
    pub cast_tokens: usize,
    pub delimiter_tokens: usize,
    pub comment_count: usize,
    pub max_comment_length: usize,
    pub casts_recombined: usize,
    pub version_gated_fallbacks: usize,
    pub scopes_opened: usize,
    pub implicit_scopes: usize,
    pub unresolved_annotations: usize,
    pub max_nesting_depth: usize,

    // Runtime preference-controlled metrics
    pub whitespace_tokens: usize,
    pub keyword_usage_patterns: HashMap<String, usize>,
}

impl TokenizerMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &ScannerPreferences) {
        self.total_tokens += 1;

        match token.kind.token_class() {
            TokenClass::Structural => {
                self.keyword_tokens += 1;

                // Track keyword patterns if enabled
                if preferences.collect_detailed_metrics {
                    *self
                        .keyword_usage_patterns
                        .entry(token.kind.label().to_string())
                        .or_insert(0) += 1;
                }
            }
            TokenClass::Name => self.name_tokens += 1,
            TokenClass::Operator => self.operator_tokens += 1,
            TokenClass::Literal => self.literal_tokens += 1,
            TokenClass::Cast => self.cast_tokens += 1,
            TokenClass::Delimiter => self.delimiter_tokens += 1,
            TokenClass::Whitespace => {
                if preferences.include_all_tokens_in_counts {
                    self.whitespace_tokens += 1;
                }
            }
            TokenClass::Special => {
                if token.kind == crate::tokens::TokenKind::Comment {
                    self.comment_count += 1;
                    self.max_comment_length = self.max_comment_length.max(token.content.len());
                }
            }
        }
    }

    pub(crate) fn record_nesting_depth(&mut self, depth: usize) {
        self.max_nesting_depth = self.max_nesting_depth.max(depth);
    }

    /// Emit a summary event through the global logger
    pub fn log_summary(&self) {
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "total_tokens" => self.total_tokens,
            "keywords" => self.keyword_tokens,
            "cast_tokens" => self.cast_tokens,
            "casts_recombined" => self.casts_recombined,
            "version_gated_fallbacks" => self.version_gated_fallbacks,
            "scopes_opened" => self.scopes_opened,
            "implicit_scopes" => self.implicit_scopes,
            "unresolved_annotations" => self.unresolved_annotations,
            "max_nesting_depth" => self.max_nesting_depth
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use crate::utils::span::Span;

    fn token(kind: TokenKind, content: &str) -> Token {
        Token::new(0, kind, content.to_string(), Span::dummy())
    }

    #[test]
    fn test_record_token_classes() {
        let prefs = ScannerPreferences::default();
        let mut metrics = TokenizerMetrics::default();

        metrics.record_token(&token(TokenKind::If, "if"), &prefs);
        metrics.record_token(&token(TokenKind::Variable, "$a"), &prefs);
        metrics.record_token(&token(TokenKind::Plus, "+"), &prefs);
        metrics.record_token(&token(TokenKind::IntLiteral, "1"), &prefs);
        metrics.record_token(&token(TokenKind::Semicolon, ";"), &prefs);
        metrics.record_token(&token(TokenKind::IntCast, "(int)"), &prefs);

        assert_eq!(metrics.total_tokens, 6);
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.name_tokens, 1);
        assert_eq!(metrics.operator_tokens, 1);
        assert_eq!(metrics.literal_tokens, 1);
        assert_eq!(metrics.delimiter_tokens, 1);
        // Casts count in their own bucket, not as literals
        assert_eq!(metrics.cast_tokens, 1);
    }

    #[test]
    fn test_whitespace_counting_preference() {
        let mut prefs = ScannerPreferences::default();
        prefs.include_all_tokens_in_counts = false;

        let mut metrics = TokenizerMetrics::default();
        metrics.record_token(&token(TokenKind::Whitespace, " "), &prefs);
        assert_eq!(metrics.whitespace_tokens, 0);

        prefs.include_all_tokens_in_counts = true;
        metrics.record_token(&token(TokenKind::Whitespace, " "), &prefs);
        assert_eq!(metrics.whitespace_tokens, 1);
    }

    #[test]
    fn test_keyword_pattern_tracking() {
        let mut prefs = ScannerPreferences::default();
        prefs.collect_detailed_metrics = true;

        let mut metrics = TokenizerMetrics::default();
        metrics.record_token(&token(TokenKind::If, "if"), &prefs);
        metrics.record_token(&token(TokenKind::If, "IF"), &prefs);
        metrics.record_token(&token(TokenKind::While, "while"), &prefs);

        assert_eq!(metrics.keyword_usage_patterns.get("if-keyword"), Some(&2));
        assert_eq!(metrics.keyword_usage_patterns.get("while-keyword"), Some(&1));
    }

    #[test]
    fn test_comment_length_tracking() {
        let prefs = ScannerPreferences::default();
        let mut metrics = TokenizerMetrics::default();

        metrics.record_token(&token(TokenKind::Comment, "// a"), &prefs);
        metrics.record_token(&token(TokenKind::Comment, "/* longer */"), &prefs);

        assert_eq!(metrics.comment_count, 2);
        assert_eq!(metrics.max_comment_length, 12);
    }
}
