//! Core traits for recap providers.

mod llm;
mod video;

pub use llm::*;
pub use video::*;
