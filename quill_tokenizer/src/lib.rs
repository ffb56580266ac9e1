//! Quill tokenizer
//!
//! Single-pass tokenization of Quill source text into a stream of annotated
//! tokens: delimiter pairing, condition ownership, attribute extents, and
//! scope construction, with deterministic recovery on malformed input.

// Internal modules
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod structure;
pub mod tokenizer;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use config::runtime::RuntimeConfig;
pub use config::version::LanguageVersion;
pub use tokenizer::{Tokenizer, TokenizerError};
pub use tokens::{Link, Token, TokenKind, TokenStream};
pub use utils::span::{Position, Span};
