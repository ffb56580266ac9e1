//! Attribute construct tracking
//!
//! A `#[` marker opens an attribute that runs to its matching `]`. Square
//! brackets may nest inside the attribute body, so a `]` belongs to the
//! attribute only when every square bracket opened after the marker has
//! already closed. An attribute still open at end of input keeps an
//! unresolved closer link on its marker; that is a recoverable state, not a
//! fault.
use crate::tokens::{Link, Token, TokenKind};

#[derive(Debug)]
struct OpenAttribute {
    opener: usize,
    /// Square bracket depth at the moment the marker was seen
    square_depth: usize,
}

/// Tracks open `#[` constructs during the structural pass
#[derive(Debug, Default)]
pub struct AttributeTracker {
    stack: Vec<OpenAttribute>,
}

impl AttributeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, tokens: &mut [Token], position: usize, square_depth: usize) {
        tokens[position].attribute_opener = Link::To(position);
        tokens[position].attribute_closer = Link::Unresolved;
        self.stack.push(OpenAttribute {
            opener: position,
            square_depth,
        });
    }

    /// Claim a `]` for the innermost open attribute if the square bracket
    /// depth is back at the marker's level. Returns the opener position when
    /// the bracket closed an attribute; the caller retokenizes nothing else,
    /// the kind change happens here.
    pub fn try_close(
        &mut self,
        tokens: &mut [Token],
        position: usize,
        square_depth: usize,
    ) -> Option<usize> {
        let claims = self
            .stack
            .last()
            .map(|open| open.square_depth == square_depth)
            .unwrap_or(false);
        if !claims {
            return None;
        }
        let open = self.stack.pop()?;
        tokens[position].kind = TokenKind::AttributeEnd;
        tokens[open.opener].attribute_closer = Link::To(position);
        tokens[position].attribute_opener = Link::To(open.opener);
        tokens[position].attribute_closer = Link::To(position);
        Some(open.opener)
    }

    /// Attributes never closed before end of input
    pub fn unresolved_count(&self) -> usize {
        self.stack.len()
    }
}
