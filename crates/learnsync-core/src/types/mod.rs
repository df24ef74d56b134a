//! Core types for learnsync.

mod course;
mod document;
mod study;
mod user;

pub use course::*;
pub use document::*;
pub use study::*;
pub use user::*;

pub use learnsync_extractors::MediaKind;
