//! Core types for recap.

mod message;
mod summary;

pub use message::*;
pub use summary::*;
