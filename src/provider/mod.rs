//! Chat handler trait and implementations.

pub mod http;
pub mod ollama;

pub use ollama::OllamaHandler;

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::models::ModelInfo;
use crate::types::{ChatMessage, EventStream};
use crate::util::retry::RetryPolicy;

/// Core trait implemented by chat handlers.
#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Send the conversation and return the event stream of the reply.
    ///
    /// The system prompt is sent as the first message.
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<EventStream, BridgeError>;

    /// The model this handler talks to.
    fn model(&self) -> ModelInfo;
}

/// Wraps a handler so that opening the stream is retried under a policy.
pub struct RetryingHandler<H> {
    inner: H,
    policy: RetryPolicy,
}

impl<H: ApiHandler> RetryingHandler<H> {
    pub fn new(inner: H, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<H: ApiHandler> ApiHandler for RetryingHandler<H> {
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<EventStream, BridgeError> {
        let inner = &self.inner;
        self.policy
            .execute(move || inner.create_message(system_prompt, messages))
            .await
    }

    fn model(&self) -> ModelInfo {
        self.inner.model()
    }
}
