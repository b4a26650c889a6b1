//! Planner - campaign brief to plan text
//!
//! Renders the prompt for a brief, makes exactly one LLM call and returns the
//! text of the reply. A failed call is reported, never retried.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, StreamChunk};
use crate::prompts::PromptLoader;

/// Plan text returned to HTTP callers when the LLM call fails
pub const FAILURE_SENTINEL: &str = "Error: Failed to generate plan.";

/// Plan text used when the model returns no content
pub const NO_RESPONSE: &str = "No response generated.";

/// Errors from plan generation
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Campaign brief is empty")]
    EmptyBrief,

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Turns campaign briefs into plan text
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, config: &LlmConfig) -> Self {
        debug!(model = %llm.model(), "Planner::new: called");
        Self {
            llm,
            prompts,
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
        }
    }

    /// Build the single request sent for `brief`
    pub fn build_request(&self, brief: &str) -> Result<CompletionRequest, PlannerError> {
        debug!(brief_len = brief.len(), "Planner::build_request: called");
        let brief = brief.trim();
        if brief.is_empty() {
            return Err(PlannerError::EmptyBrief);
        }

        let system_prompt = self
            .prompts
            .system_prompt()
            .map_err(|e| PlannerError::Prompt(e.to_string()))?;
        let user_prompt = self
            .prompts
            .render_brief(brief)
            .map_err(|e| PlannerError::Prompt(e.to_string()))?;

        Ok(CompletionRequest {
            system_prompt,
            messages: vec![Message::user(user_prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        })
    }

    /// Generate plan text for a brief
    pub async fn generate(&self, brief: &str) -> Result<String, PlannerError> {
        debug!(brief_len = brief.len(), "Planner::generate: called");
        let request = self.build_request(brief)?;
        let response = self.llm.complete(request).await?;
        Ok(self.finish(response))
    }

    /// Generate plan text, forwarding text deltas to `chunk_tx` as they arrive
    pub async fn generate_streaming(
        &self,
        brief: &str,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<String, PlannerError> {
        debug!(brief_len = brief.len(), "Planner::generate_streaming: called");
        let request = self.build_request(brief)?;
        let response = self.llm.stream(request, chunk_tx).await?;
        Ok(self.finish(response))
    }

    fn finish(&self, response: CompletionResponse) -> String {
        let usage = &response.usage;
        info!(
            model = %self.llm.model(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            cost_usd = %format!("{:.4}", usage.cost_usd(self.llm.model())),
            stop_reason = ?response.stop_reason,
            "Plan generated"
        );

        match response.content {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn!("Model returned no content");
                NO_RESPONSE.to_string()
            }
        }
    }
}
