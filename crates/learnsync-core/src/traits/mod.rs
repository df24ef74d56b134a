//! Core traits for learnsync collaborators.

mod blob;
mod cache;
mod provider;

pub use blob::*;
pub use cache::*;
pub use provider::*;
