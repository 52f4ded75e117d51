pub mod prompt;

use std::time::Duration;

use anyhow::Context;

use prompt::{build_article_prompt, PromptVariant};

use crate::catalog::ProductRecord;
use crate::config::AppConfig;

use rig::agent::Agent as RigAgent;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;
use rig::providers::gemini::completion::CompletionModel;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("article generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("model returned an empty response")]
    Empty,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The text-generation boundary. Implementations return the raw model output.
#[allow(async_fn_in_trait)]
pub trait ArticleWriter {
    async fn write(&self, product: &ProductRecord) -> Result<String, GenerationError>;
}

pub struct GeminiWriter {
    agent: RigAgent<CompletionModel>,
    variant: PromptVariant,
    timeout: Duration,
}

impl GeminiWriter {
    pub fn new(config: &AppConfig) -> Result<Self, GenerationError> {
        let client = gemini::Client::new(&config.gemini_api_key)
            .context("Failed to build Gemini client")?;

        let agent = client
            .agent(&config.gemini_model)
            .preamble(config.prompt_variant.preamble())
            .temperature(1.0)
            .max_tokens(4000)
            .build();

        Ok(Self {
            agent,
            variant: config.prompt_variant,
            timeout: Duration::from_secs(
                config.generation_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

impl ArticleWriter for GeminiWriter {
    async fn write(&self, product: &ProductRecord) -> Result<String, GenerationError> {
        let prompt = build_article_prompt(self.variant, product);
        log::info!("writing article for {}...", product.name);

        let response = tokio::time::timeout(self.timeout, self.agent.prompt(prompt))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
            .context("Gemini completion failed")?;

        if response.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        log::debug!("model returned {} characters", response.len());
        Ok(response)
    }
}
