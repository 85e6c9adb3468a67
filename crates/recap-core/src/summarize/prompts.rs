//! Prompt templates for summarization.

/// System prompt for content summaries.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant that analyzes text, summarizes it \
and extracts its key information. Write concise, accurate summaries that someone unfamiliar with \
the source can follow, and call out the most important points and insights. Use bullet points or \
numbered lists where they help, and explain technical jargon in plain terms.";

/// System prompt for quiz summaries.
pub const QUIZ_SYSTEM_PROMPT: &str = "You process quiz content and write detailed, structured \
summaries of it. Cover the questions, the answers given and any explanations, organized into \
clear paragraphs that keep the intent and emphasis of the original material.";

/// Placeholder used when a structured reply carries no summary.
pub const NO_SUMMARY_AVAILABLE: &str = "No summary available.";

/// Build the user message asking for a summary of `text`.
pub fn summary_request(text: &str) -> String {
    format!("Please summarize the following text:\n\n{}", text)
}

/// Build the user message asking for a summary of quiz content.
pub fn quiz_request(content: &str) -> String {
    format!(
        "Please summarize the following quiz content in detail. Give an overview of the \
questions, the answers and any explanations, in clear paragraphs. Finish with a short profile \
of the user and the kinds of content they seem to prefer.\n\n{}",
        content
    )
}
