//! Application services layer.

pub mod contact;
pub mod error;
pub mod preview;
pub mod site;
pub mod status;
