//! Conversation memory and LLM payload parsing.

mod conversation;
mod json_parser;

pub use conversation::{ConversationMemory, Exchange};
pub use json_parser::{extract_json, parse_json_object, remove_code_blocks};
