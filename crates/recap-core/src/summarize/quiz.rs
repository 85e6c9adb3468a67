//! Quiz summaries.

use std::sync::Arc;

use tracing::debug;

use crate::error::{RecapError, RecapResult};
use crate::summarize::log_usage;
use crate::summarize::prompts::{quiz_request, QUIZ_SYSTEM_PROMPT};
use crate::traits::{GenerationOptions, Llm};
use crate::types::Message;

/// Summarizes question/answer pairs. Does not use conversation memory.
#[derive(Clone)]
pub struct QuizSummarizer {
    llm: Arc<dyn Llm>,
    system_prompt: String,
    options: Option<GenerationOptions>,
}

impl QuizSummarizer {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self {
            llm,
            system_prompt: QUIZ_SYSTEM_PROMPT.to_string(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Pair questions with answers as `Q:`/`A:` lines. Extra entries on either side are dropped.
    pub fn format_pairs(questions: &[String], answers: &[String]) -> String {
        questions
            .iter()
            .zip(answers)
            .map(|(q, a)| format!("Q: {}\nA: {}", q, a))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Summarize a quiz, returning the trimmed summary text.
    pub async fn summarize(&self, questions: &[String], answers: &[String]) -> RecapResult<String> {
        let content = Self::format_pairs(questions, answers);
        if content.is_empty() {
            return Err(RecapError::validation("Quiz has no question/answer pairs"));
        }

        let messages = [
            Message::system(&self.system_prompt),
            Message::user(quiz_request(&content)),
        ];
        debug!(
            model = self.llm.model_name(),
            pairs = questions.len().min(answers.len()),
            "Requesting quiz summary"
        );

        let response = self
            .llm
            .generate(&messages, self.options.clone())
            .await
            .map_err(|e| RecapError::summarization_from("Language model call failed", e))?;
        log_usage(self.llm.model_name(), &response);

        let summary = response.content_or_empty().trim();
        if summary.is_empty() {
            return Err(RecapError::summarization("Model returned an empty quiz summary"));
        }

        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{LlmResponse, Tool, ToolChoice};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoLlm {
        seen: Mutex<Vec<Message>>,
        reply: &'static str,
    }

    #[async_trait]
    impl Llm for EchoLlm {
        async fn generate(
            &self,
            messages: &[Message],
            _options: Option<GenerationOptions>,
        ) -> RecapResult<LlmResponse> {
            *self.seen.lock().unwrap() = messages.to_vec();
            Ok(LlmResponse {
                content: Some(self.reply.to_string()),
                ..Default::default()
            })
        }

        async fn generate_with_tools(
            &self,
            _messages: &[Message],
            _tools: &[Tool],
            _tool_choice: ToolChoice,
            _options: Option<GenerationOptions>,
        ) -> RecapResult<LlmResponse> {
            unimplemented!()
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_pairs() {
        let formatted = QuizSummarizer::format_pairs(
            &strings(&["What is 2+2?", "Capital of France?", "unanswered"]),
            &strings(&["4", "Paris"]),
        );
        assert_eq!(formatted, "Q: What is 2+2?\nA: 4\nQ: Capital of France?\nA: Paris");
    }

    #[tokio::test]
    async fn test_summary_trimmed() {
        let llm = Arc::new(EchoLlm {
            seen: Mutex::new(vec![]),
            reply: "\n  The user knows arithmetic.  \n",
        });
        let quiz = QuizSummarizer::new(llm.clone());

        let summary = quiz
            .summarize(&strings(&["What is 2+2?"]), &strings(&["4"]))
            .await
            .unwrap();
        assert_eq!(summary, "The user knows arithmetic.");

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].content.ends_with("Q: What is 2+2?\nA: 4"));
    }

    #[tokio::test]
    async fn test_empty_quiz_rejected_before_llm_call() {
        let llm = Arc::new(EchoLlm {
            seen: Mutex::new(vec![]),
            reply: "unused",
        });
        let quiz = QuizSummarizer::new(llm.clone());

        let result = quiz.summarize(&[], &[]).await;
        assert!(matches!(result, Err(RecapError::Validation { .. })));
        // Unpaired questions are still an empty quiz.
        let result = quiz.summarize(&strings(&["orphan?"]), &[]).await;
        assert!(matches!(result, Err(RecapError::Validation { .. })));
        assert!(llm.seen.lock().unwrap().is_empty());
    }
}
