//! Domain layer types and invariants.

pub mod contact;
pub mod navigation;
pub mod sources;
pub mod templates;
