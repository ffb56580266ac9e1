//! Cast recombination over raw units
//!
//! A parenthesized type keyword such as `(int)` or `( BOOL )` is one cast
//! token, not three units. The classifier walks the raw unit buffer once and
//! recombines each window that matches the shape
//!
//!   open parenthesis, optional horizontal whitespace, known type keyword,
//!   optional horizontal whitespace, close parenthesis
//!
//! Keyword matching is case-insensitive. A newline or comment anywhere inside
//! the window disqualifies it, as does end of input before the close
//! parenthesis; those windows fall back to their constituent units unchanged.
//! The cast token keeps the literal source text as its content and carries
//! the canonical lower-cased keyword as its normalized form.
use crate::config::version::{lookup_cast, CastLookup, LanguageVersion};
use crate::lexical::scanner::RawToken;
use crate::tokens::TokenKind;

/// Result of the classification pass
#[derive(Debug)]
pub struct Classification {
    pub tokens: Vec<RawToken>,
    /// Cast windows recombined into a single token
    pub casts_recombined: usize,
    /// Cast windows whose keyword is gated off by the active language
    /// version and therefore left as constituent units
    pub version_gated_fallbacks: usize,
}

/// A matched cast window: keyword unit index, close paren index, table hit
struct CastWindow {
    closer: usize,
    kind: TokenKind,
    canonical: &'static str,
}

pub fn classify(raw: Vec<RawToken>, version: LanguageVersion) -> Classification {
    let mut tokens = Vec::with_capacity(raw.len());
    let mut casts_recombined = 0;
    let mut version_gated_fallbacks = 0;

    let mut index = 0;
    while index < raw.len() {
        if raw[index].kind == TokenKind::OpenParen {
            match match_cast_window(&raw, index, version) {
                Ok(Some(window)) => {
                    tokens.push(recombine(&raw[index..=window.closer], window.kind, window.canonical));
                    casts_recombined += 1;
                    index = window.closer + 1;
                    continue;
                }
                Ok(None) => {}
                Err(GatedOff) => {
                    version_gated_fallbacks += 1;
                }
            }
        }
        tokens.push(raw[index].clone());
        index += 1;
    }

    Classification {
        tokens,
        casts_recombined,
        version_gated_fallbacks,
    }
}

struct GatedOff;

/// Try to match a cast window starting at the open parenthesis `opener`.
/// `Ok(None)` means the shape does not match; `Err(GatedOff)` means the shape
/// matches but the keyword needs a newer language version.
fn match_cast_window(
    raw: &[RawToken],
    opener: usize,
    version: LanguageVersion,
) -> Result<Option<CastWindow>, GatedOff> {
    // Only horizontal whitespace may pad the window
    let keyword = match skip_padding(raw, opener + 1) {
        Some(index) if raw[index].kind == TokenKind::Identifier => index,
        _ => return Ok(None),
    };
    let closer = match skip_padding(raw, keyword + 1) {
        Some(index) if raw[index].kind == TokenKind::CloseParen => index,
        _ => return Ok(None),
    };

    let lowered = raw[keyword].content.to_ascii_lowercase();
    match lookup_cast(&lowered, version) {
        CastLookup::Cast { kind, canonical } => Ok(Some(CastWindow {
            closer,
            kind,
            canonical,
        })),
        CastLookup::GatedOff => Err(GatedOff),
        CastLookup::NotACast => Ok(None),
    }
}

/// Advance past horizontal whitespace units. Newline and comment units stop
/// the scan, which disqualifies the window.
fn skip_padding(raw: &[RawToken], mut index: usize) -> Option<usize> {
    while raw.get(index)?.kind == TokenKind::Whitespace {
        index += 1;
    }
    Some(index)
}

fn recombine(window: &[RawToken], kind: TokenKind, canonical: &'static str) -> RawToken {
    let content: String = window.iter().map(|t| t.content.as_str()).collect();
    let span = window
        .iter()
        .skip(1)
        .fold(window[0].span, |acc, t| acc.merge(t.span));
    RawToken {
        kind,
        content,
        normalized: Some(canonical.to_string()),
        span,
    }
}
