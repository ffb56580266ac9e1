//! Shared utility types for the tokenizer

pub mod span;

pub use span::{Position, SourceMap, Span};
