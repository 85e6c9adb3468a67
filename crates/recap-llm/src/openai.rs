//! OpenAI LLM provider implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use recap_core::error::{RecapError, RecapResult};
use recap_core::traits::{
    GenerationOptions, Llm, LlmConfig, LlmResponse, Tool, ToolCall, ToolChoice, TokenUsage,
};
use recap_core::types::{Message, MessageRole};

#[cfg(feature = "openai")]
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionNamedToolChoice,
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, ChatCompletionTool, ChatCompletionToolArgs,
        ChatCompletionToolChoiceOption, ChatCompletionToolType, CreateChatCompletionRequest,
        FunctionName, FunctionObjectArgs,
    },
    Client,
};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI LLM provider.
pub struct OpenAIProvider {
    #[cfg(feature = "openai")]
    client: Client<OpenAIConfig>,
    config: LlmConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI LLM provider.
    pub fn new(config: LlmConfig) -> RecapResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                RecapError::Configuration("OpenAI API key not found. Set OPENAI_API_KEY environment variable or provide api_key in config.".to_string())
            })?;

        #[cfg(feature = "openai")]
        let openai_config = if let Some(ref base_url) = config.base_url {
            OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(base_url)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };
        #[cfg(not(feature = "openai"))]
        let _ = api_key;

        #[cfg(feature = "openai")]
        let client = Client::with_config(openai_config);

        let mut config = config;
        if config.model.is_empty() {
            config.model = DEFAULT_MODEL.to_string();
        }

        Ok(Self {
            #[cfg(feature = "openai")]
            client,
            config,
        })
    }

    /// Check if this is a reasoning model that doesn't support certain params.
    fn is_reasoning_model_internal(&self) -> bool {
        let model_lower = self.config.model.to_lowercase();
        ["o1", "o3", "o4", "gpt-5"]
            .iter()
            .any(|m| model_lower.starts_with(m))
    }

    #[cfg(feature = "openai")]
    fn message_to_openai(msg: &Message) -> ChatCompletionRequestMessage {
        match msg.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    ..Default::default()
                })
            }
        }
    }

    #[cfg(feature = "openai")]
    fn tool_to_openai(tool: &Tool) -> RecapResult<ChatCompletionTool> {
        let function = FunctionObjectArgs::default()
            .name(&tool.name)
            .description(&tool.description)
            .parameters(tool.parameters.clone())
            .build()
            .map_err(|e| RecapError::llm(format!("Invalid tool definition '{}': {}", tool.name, e)))?;

        ChatCompletionToolArgs::default()
            .r#type(ChatCompletionToolType::Function)
            .function(function)
            .build()
            .map_err(|e| RecapError::llm(format!("Invalid tool definition '{}': {}", tool.name, e)))
    }

    #[cfg(feature = "openai")]
    fn tool_choice_to_openai(choice: &ToolChoice) -> ChatCompletionToolChoiceOption {
        match choice {
            ToolChoice::Auto => ChatCompletionToolChoiceOption::Auto,
            ToolChoice::None => ChatCompletionToolChoiceOption::None,
            ToolChoice::Required => ChatCompletionToolChoiceOption::Required,
            ToolChoice::Specific(name) => {
                ChatCompletionToolChoiceOption::Named(ChatCompletionNamedToolChoice {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionName { name: name.clone() },
                })
            }
        }
    }

    #[cfg(feature = "openai")]
    fn build_request(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> CreateChatCompletionRequest {
        let options = options.unwrap_or_default();

        let mut request = CreateChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(Self::message_to_openai).collect(),
            ..Default::default()
        };

        // Only add sampling params for non-reasoning models
        if !self.is_reasoning_model_internal() {
            request.temperature = Some(options.temperature.unwrap_or(self.config.temperature));
            request.top_p = Some(options.top_p.unwrap_or(self.config.top_p));
            request.max_tokens = Some(options.max_tokens.unwrap_or(self.config.max_tokens));
        }

        request
    }

    #[cfg(feature = "openai")]
    async fn send(&self, request: CreateChatCompletionRequest) -> RecapResult<LlmResponse> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Sending OpenAI request"
        );

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| RecapError::llm(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RecapError::llm("No response choices returned"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .iter()
            .map(convert_tool_call)
            .collect::<RecapResult<Vec<_>>>()?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse {
            content: choice.message.content,
            tool_calls,
            usage,
        })
    }
}

#[cfg(feature = "openai")]
fn convert_tool_call(call: &ChatCompletionMessageToolCall) -> RecapResult<ToolCall> {
    Ok(ToolCall {
        name: call.function.name.clone(),
        arguments: parse_arguments(&call.function.name, &call.function.arguments)?,
    })
}

/// Tool arguments arrive as a JSON-encoded object.
fn parse_arguments(
    tool: &str,
    arguments: &str,
) -> RecapResult<HashMap<String, serde_json::Value>> {
    if arguments.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(arguments).map_err(|e| {
        warn!(tool, error = %e, "Tool call arguments are not a JSON object");
        RecapError::llm(format!("Invalid arguments for tool '{}': {}", tool, e))
    })
}

#[async_trait]
impl Llm for OpenAIProvider {
    #[cfg(feature = "openai")]
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> RecapResult<LlmResponse> {
        let request = self.build_request(messages, options);
        self.send(request).await
    }

    #[cfg(not(feature = "openai"))]
    async fn generate(
        &self,
        _messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> RecapResult<LlmResponse> {
        Err(RecapError::Configuration(
            "OpenAI feature not enabled. Enable the 'openai' feature.".to_string(),
        ))
    }

    #[cfg(feature = "openai")]
    async fn generate_with_tools(
        &self,
        messages: &[Message],
        tools: &[Tool],
        tool_choice: ToolChoice,
        options: Option<GenerationOptions>,
    ) -> RecapResult<LlmResponse> {
        let mut request = self.build_request(messages, options);
        if !tools.is_empty() {
            request.tools = Some(
                tools
                    .iter()
                    .map(Self::tool_to_openai)
                    .collect::<RecapResult<Vec<_>>>()?,
            );
            request.tool_choice = Some(Self::tool_choice_to_openai(&tool_choice));
        }
        self.send(request).await
    }

    #[cfg(not(feature = "openai"))]
    async fn generate_with_tools(
        &self,
        messages: &[Message],
        _tools: &[Tool],
        _tool_choice: ToolChoice,
        options: Option<GenerationOptions>,
    ) -> RecapResult<LlmResponse> {
        self.generate(messages, options).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(model: &str) -> OpenAIProvider {
        OpenAIProvider::new(LlmConfig {
            model: model.to_string(),
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_model() {
        assert_eq!(provider("").model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_reasoning_model_detection() {
        assert!(provider("o3-mini").is_reasoning_model_internal());
        assert!(provider("GPT-5").is_reasoning_model_internal());
        assert!(!provider("gpt-4o-mini").is_reasoning_model_internal());
    }

    #[test]
    fn test_parse_arguments() {
        let args = parse_arguments("generate_summary", r#"{"summary":"s","highlights":["a"]}"#)
            .unwrap();
        assert_eq!(args["summary"], serde_json::json!("s"));
        assert!(parse_arguments("generate_summary", "  ").unwrap().is_empty());
        assert!(matches!(
            parse_arguments("generate_summary", "[1,2]"),
            Err(RecapError::Llm { .. })
        ));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_reasoning_model_omits_sampling_params() {
        let request = provider("o1-preview").build_request(&[Message::user("hi")], None);
        assert!(request.temperature.is_none());
        assert!(request.max_tokens.is_none());

        let request = provider("gpt-4o").build_request(&[Message::user("hi")], None);
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(2000));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_named_tool_choice() {
        let choice =
            OpenAIProvider::tool_choice_to_openai(&ToolChoice::Specific("generate_summary".into()));
        match choice {
            ChatCompletionToolChoiceOption::Named(named) => {
                assert_eq!(named.function.name, "generate_summary")
            }
            other => panic!("unexpected tool choice: {:?}", other),
        }
    }
}
