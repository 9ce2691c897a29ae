//! Data models for the application
//!
//! Assets are the core entity; page options reference them.

mod asset;
mod page_option;

pub use asset::*;
pub use page_option::*;
