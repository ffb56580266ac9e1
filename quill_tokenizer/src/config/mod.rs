//! Configuration module for the Quill tokenizer
//!
//! Compile-time resource limits live in [`constants`], user preferences in
//! [`runtime`], and the version-gated cast table in [`version`].

pub mod constants;
pub mod runtime;
pub mod version;

pub use constants::compile_time;

pub use runtime::RuntimeConfig;
pub use version::{lookup_cast, CastEntry, CastLookup, LanguageVersion, CAST_TABLE};
