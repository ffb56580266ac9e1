//! Structural analysis: delimiter pairing, scope construction, attributes

pub mod attributes;
pub mod brackets;
pub mod scopes;

pub use attributes::AttributeTracker;
pub use brackets::BracketTracker;
pub use scopes::ScopeTracker;
