pub mod kind;
pub mod stream;
pub mod token;

pub use kind::{classify_word, TokenClass, TokenKind};
pub use stream::{validation, StreamError, TokenStream};
pub use token::{Conditions, Link, Token};
