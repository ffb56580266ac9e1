//! Lexical analysis: raw scanning and cast classification

pub mod classifier;
pub mod scanner;

pub use classifier::{classify, Classification};
pub use scanner::{RawToken, Scanner};
