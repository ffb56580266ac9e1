//! Tokenization orchestrator
//!
//! Drives the full pipeline: raw scanning, cast classification, then a
//! single structural pass that resolves delimiter pairs, attributes and
//! scopes. The per-token order inside the structural pass is load-bearing:
//! closings run first, then the condition snapshot, then body decisions and
//! keyword pickup, then openings. Delimiter tokens therefore carry the
//! conditions from outside the region they delimit.
//!
//! Malformed input never fails tokenization; only resource limits do.

pub mod metrics;

use std::time::Instant;

use thiserror::Error;

use crate::config::compile_time::scanner::{MAX_SOURCE_SIZE, MAX_TOKEN_COUNT};
use crate::config::runtime::RuntimeConfig;
use crate::lexical::{classify, Scanner};
use crate::logging::codes;
use crate::structure::{AttributeTracker, BracketTracker, ScopeTracker};
use crate::tokens::{validation, Token, TokenKind, TokenStream};
use crate::utils::{Position, SourceMap, Span};
use crate::{log_debug, log_error, log_performance, log_recovery, log_success};

use metrics::TokenizerMetrics;

/// Fatal tokenization faults. Structural problems in the source are never
/// fatal; only resource limits are.
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("source is {size} bytes, exceeding the {limit} byte limit")]
    SourceTooLarge { size: usize, limit: usize },

    #[error("source produced {count} tokens, exceeding the {limit} token limit")]
    TooManyTokens { count: usize, limit: usize },
}

/// The Quill tokenizer
pub struct Tokenizer {
    config: RuntimeConfig,
    metrics: TokenizerMetrics,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            metrics: TokenizerMetrics::default(),
        }
    }

    /// Metrics from the most recent `tokenize` call
    pub fn metrics(&self) -> &TokenizerMetrics {
        &self.metrics
    }

    /// Tokenize a complete source text into an annotated stream
    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, TokenizerError> {
        let started = Instant::now();
        self.metrics = TokenizerMetrics::default();

        if source.len() > MAX_SOURCE_SIZE {
            log_error!(codes::limits::SOURCE_TOO_LARGE, "Source exceeds maximum input size",
                "size" => source.len(),
                "limit" => MAX_SOURCE_SIZE
            );
            return Err(TokenizerError::SourceTooLarge {
                size: source.len(),
                limit: MAX_SOURCE_SIZE,
            });
        }

        let raw = Scanner::new(source).scan();
        let classification = classify(raw, self.config.scanner.language_version);

        if classification.tokens.len() > MAX_TOKEN_COUNT {
            log_error!(codes::limits::TOO_MANY_TOKENS, "Source exceeds maximum token count",
                "count" => classification.tokens.len(),
                "limit" => MAX_TOKEN_COUNT
            );
            return Err(TokenizerError::TooManyTokens {
                count: classification.tokens.len(),
                limit: MAX_TOKEN_COUNT,
            });
        }

        self.metrics.casts_recombined = classification.casts_recombined;
        self.metrics.version_gated_fallbacks = classification.version_gated_fallbacks;
        if classification.version_gated_fallbacks > 0 {
            log_recovery!(codes::recovery::VERSION_GATED_CAST,
                "Cast keywords gated off by the active language version",
                "count" => classification.version_gated_fallbacks,
                "version" => self.config.scanner.language_version.as_str()
            );
        }

        // Source context rendering for recovery reports is opt-out; the
        // map is only built when the reports would carry it
        let source_map = (self.config.scanner.include_position_in_errors
            && self.config.structure.log_unresolved_annotations)
            .then(|| SourceMap::new(source.to_string()));

        let mut tokens = self.materialize(classification.tokens);
        self.build_structure(&mut tokens, source_map.as_ref());

        for token in &tokens {
            self.metrics.record_token(token, &self.config.scanner);
        }

        let stream = TokenStream::new(tokens);

        if self.config.structure.validate_after_build {
            let violations = validation::validate(&stream);
            if violations.is_empty() {
                log_success!(
                    codes::success::STREAM_VALIDATION_PASSED,
                    "Stream consistency checks passed"
                );
            } else {
                for violation in &violations {
                    log_recovery!(codes::recovery::STREAM_INCONSISTENCY,
                        "Stream consistency check failed",
                        "violation" => violation
                    );
                }
            }
        }

        if self.config.logging.log_performance_events {
            log_performance!(codes::success::TOKENIZATION_COMPLETE,
                "Tokenization finished",
                duration = started.elapsed(),
                "tokens" => stream.len()
            );
        }
        self.metrics.log_summary();

        Ok(stream)
    }

    /// Assign dense positions and append the end-of-input marker
    fn materialize(&self, raw: Vec<crate::lexical::RawToken>) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(raw.len() + 1);
        for (position, unit) in raw.into_iter().enumerate() {
            let mut token = Token::new(position, unit.kind, unit.content, unit.span);
            if let Some(normalized) = unit.normalized {
                token = token.with_normalized(normalized);
            }
            tokens.push(token);
        }

        let end = tokens
            .last()
            .map(|token| token.span.end)
            .unwrap_or_else(Position::start);
        tokens.push(Token::new(
            tokens.len(),
            TokenKind::Eof,
            "",
            Span::new(end, end),
        ));
        tokens
    }

    /// The structural pass. Per token: closings, condition snapshot, body
    /// decisions and keyword pickup, openings.
    fn build_structure(&mut self, tokens: &mut [Token], source_map: Option<&SourceMap>) {
        let mut brackets = BracketTracker::new();
        let mut attributes = AttributeTracker::new();
        let mut scopes = ScopeTracker::new();

        for position in 0..tokens.len() {
            let kind = tokens[position].kind;

            match kind {
                TokenKind::CloseParen => match brackets.close_paren(tokens, position) {
                    Some(opener) => {
                        scopes.on_paren_closed(tokens, opener, position);
                        if self.config.structure.log_pair_resolution {
                            log_debug!("Parenthesis pair resolved",
                                "opener" => opener,
                                "closer" => position
                            );
                        }
                    }
                    None => self.report_stray_closer(tokens, position, source_map),
                },
                TokenKind::CloseBrace => match brackets.close_brace(tokens, position) {
                    Some(opener) => {
                        scopes.on_brace_closed(tokens, opener, position);
                        if self.config.structure.log_pair_resolution {
                            log_debug!("Brace pair resolved",
                                "opener" => opener,
                                "closer" => position
                            );
                        }
                    }
                    None => self.report_stray_closer(tokens, position, source_map),
                },
                TokenKind::CloseSquare => {
                    // An open attribute at this square depth claims the
                    // bracket; otherwise it pairs as an ordinary square
                    if attributes
                        .try_close(tokens, position, brackets.square_depth())
                        .is_none()
                        && brackets.close_square(tokens, position).is_none()
                    {
                        self.report_stray_closer(tokens, position, source_map);
                    }
                }
                TokenKind::Semicolon => {
                    scopes.on_semicolon(tokens, position, brackets.nesting_depth());
                }
                _ => {}
            }

            scopes.annotate(tokens, position);
            if tokens[position].is_significant() && kind != TokenKind::Eof {
                scopes.on_significant(tokens, position, brackets.nesting_depth());
            }

            match kind {
                TokenKind::OpenParen => {
                    brackets.open_paren(tokens, position);
                    scopes.on_paren_opened(tokens, position);
                }
                TokenKind::OpenBrace => brackets.open_brace(tokens, position),
                TokenKind::OpenSquare => brackets.open_square(tokens, position),
                TokenKind::Attribute => {
                    attributes.open(tokens, position, brackets.square_depth())
                }
                _ => {}
            }

            self.metrics.record_nesting_depth(brackets.nesting_depth());
        }

        self.metrics.scopes_opened = scopes.scopes_opened();
        self.metrics.implicit_scopes = scopes.implicit_scopes();
        // Stray closers were already counted as they were reported
        self.metrics.unresolved_annotations += brackets.unresolved_count()
            + attributes.unresolved_count()
            + scopes.unresolved_count();

        if self.config.structure.log_unresolved_annotations {
            if brackets.unresolved_count() > 0 {
                log_recovery!(codes::recovery::UNMATCHED_OPENER,
                    "Delimiters still open at end of input",
                    "count" => brackets.unresolved_count()
                );
            }
            if attributes.unresolved_count() > 0 {
                log_recovery!(codes::recovery::UNTERMINATED_ATTRIBUTE,
                    "Attributes still open at end of input",
                    "count" => attributes.unresolved_count()
                );
            }
            if scopes.unresolved_count() > 0 {
                log_recovery!(codes::recovery::UNTERMINATED_SCOPE,
                    "Scopes still open at end of input",
                    "count" => scopes.unresolved_count()
                );
            }
        }
    }

    fn report_stray_closer(
        &mut self,
        tokens: &[Token],
        position: usize,
        source_map: Option<&SourceMap>,
    ) {
        self.metrics.unresolved_annotations += 1;
        if !self.config.structure.log_unresolved_annotations {
            return;
        }
        match source_map {
            Some(map) => {
                let rendered =
                    map.format_error(&tokens[position].span, "closing delimiter with no matching opener");
                log_recovery!(codes::recovery::STRAY_CLOSER,
                    "Closing delimiter with no matching opener",
                    span = tokens[position].span,
                    "position" => position,
                    "content" => tokens[position].content,
                    "source_context" => rendered
                );
            }
            None => {
                log_recovery!(codes::recovery::STRAY_CLOSER,
                    "Closing delimiter with no matching opener",
                    span = tokens[position].span,
                    "position" => position,
                    "content" => tokens[position].content
                );
            }
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
