//! Ollama `/api/chat` handler.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::config::OllamaConfig;
use crate::diagnostics::{self, DiagnosticSink};
use crate::error::BridgeError;
use crate::models::ModelInfo;
use crate::stream::StreamTranslator;
use crate::types::{ChatMessage, EventStream};
use crate::util::timeout::{normalize_timeout, with_timeout};

use super::http::{json_headers, shared_client};
use super::ApiHandler;

pub struct OllamaHandler {
    config: OllamaConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl OllamaHandler {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            sink: diagnostics::noop(),
        }
    }

    /// Route diagnostics to `sink` instead of discarding them.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn build_request_body(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> serde_json::Value {
        let messages = std::iter::once(ChatMessage::system(system_prompt))
            .chain(messages.iter().cloned())
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": self.config.model_id,
            "messages": messages,
            "stream": true,
            "options": { "num_ctx": self.config.num_ctx },
        });
        if self.config.think {
            if let Some(obj) = body.as_object_mut() {
                obj.insert("think".into(), true.into());
            }
        }
        body
    }
}

#[async_trait]
impl ApiHandler for OllamaHandler {
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<EventStream, BridgeError> {
        if self.config.model_id.trim().is_empty() {
            return Err(BridgeError::Configuration(
                "Missing Ollama model id (set OLLAMA_MODEL)".into(),
            ));
        }

        let url = self.config.chat_url();
        let body = self.build_request_body(system_prompt, messages);
        let timeout = self.config.request_timeout;

        debug!(
            model = %self.config.model_id,
            messages = messages.len() + 1,
            "Ollama create_message"
        );
        self.sink.request_sent(&url, &self.config.model_id);

        let pending = shared_client()
            .post(&url)
            .headers(json_headers(self.config.api_key.as_deref()))
            .json(&body)
            .send();
        let request = async { pending.await.map_err(BridgeError::from) };

        let resp = match with_timeout(timeout, request).await {
            Ok(resp) => resp,
            Err(e) => {
                self.sink.request_failed(&e);
                return Err(e);
            }
        };

        let status = resp.status();
        self.sink.response_received(status.as_u16());

        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            self.sink.http_error(status.as_u16(), &body_text);
            return Ok(Box::pin(futures::stream::empty()));
        }

        let events = StreamTranslator::new(self.sink.clone())
            .translate(resp.bytes_stream())
            .map(move |item| item.map_err(|e| normalize_timeout(e, timeout)));
        Ok(Box::pin(events))
    }

    fn model(&self) -> ModelInfo {
        ModelInfo {
            id: self.config.model_id.clone(),
            context_window: self.config.num_ctx,
        }
    }
}
