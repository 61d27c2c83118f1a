//! # rp-gateway-llm
//!
//! `CompletionGateway` backed by the `llm` crate. The provider is chosen
//! at startup; the model and system instruction travel with each call.

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use rp_core::traits::CompletionGateway;
use secrecy::{ExposeSecret, SecretString};

fn map_backend(provider: &str) -> anyhow::Result<LLMBackend> {
    match provider {
        "google" => Ok(LLMBackend::Google),
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "ollama" => Ok(LLMBackend::Ollama),
        other => anyhow::bail!("unknown provider: {other}"),
    }
}

pub struct LlmGateway {
    backend: LLMBackend,
    api_key: Option<SecretString>,
}

impl LlmGateway {
    /// A blank key is treated as no key at all.
    pub fn new(provider: &str, api_key: Option<SecretString>) -> anyhow::Result<Self> {
        let api_key = api_key.filter(|k| !k.expose_secret().trim().is_empty());
        Ok(Self {
            backend: map_backend(provider)?,
            api_key,
        })
    }
}

#[async_trait]
impl CompletionGateway for LlmGateway {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        model: &str,
    ) -> anyhow::Result<String> {
        let Some(api_key) = &self.api_key else {
            anyhow::bail!("completion gateway has no credential");
        };

        let llm = LLMBuilder::new()
            .backend(self.backend.clone())
            .model(model)
            .system(system_instruction)
            .api_key(api_key.expose_secret())
            .build()
            .map_err(|e| anyhow::anyhow!("build LLM: {e}"))?;

        let messages = vec![ChatMessage::user().content(prompt).build()];

        tracing::debug!(model, prompt_len = prompt.len(), "sending completion request");
        let response = llm
            .chat(&messages)
            .await
            .map_err(|e| anyhow::anyhow!("chat: {e}"))?;

        // Empty text is not an error; the caller substitutes its own placeholder.
        Ok(response.text().unwrap_or_default())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
