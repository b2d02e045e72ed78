//! Tests for the retry policy and the retrying handler wrapper.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use ollama_bridge::error::BridgeError;
use ollama_bridge::models::ModelInfo;
use ollama_bridge::provider::{ApiHandler, RetryingHandler};
use ollama_bridge::types::{ChatMessage, EventStream, StreamEvent};
use ollama_bridge::util::retry::{with_retry, RetryPolicy};

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(100),
        multiplier: 2.0,
        retry_all_errors: false,
    }
}

#[tokio::test(start_paused = true)]
async fn retry_policy_retries_retryable_errors_until_success() {
    let policy = fast_policy(4);
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_for_task = attempts.clone();

    let task = tokio::spawn(async move {
        policy
            .execute(|| {
                let attempts = attempts_for_task.clone();
                async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                    if attempt < 2 {
                        Err(BridgeError::Timeout { secs: 30 })
                    } else {
                        Ok::<_, BridgeError>("ok")
                    }
                }
            })
            .await
    });

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    let result = task.await.unwrap();

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_policy_stops_immediately_for_non_retryable_errors() {
    let policy = fast_policy(5);
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(BridgeError::Configuration("missing model".into()))
            }
        })
        .await;

    match result {
        Err(BridgeError::Configuration(message)) => assert_eq!(message, "missing model"),
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retry_all_retries_non_retryable_errors() {
    let policy = RetryPolicy {
        retry_all_errors: true,
        ..fast_policy(3)
    };
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_for_task = attempts.clone();

    let task = tokio::spawn(async move {
        with_retry(&policy, || {
            let attempts = attempts_for_task.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(BridgeError::Configuration("still broken".into()))
            }
        })
        .await
    });

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    let result = task.await.unwrap();

    assert!(matches!(result, Err(BridgeError::Configuration(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_policy_with_zero_attempts_never_runs_operation() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = fast_policy(0)
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BridgeError>(())
            }
        })
        .await;

    assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

/// Fails to connect a fixed number of times, then streams one text event.
struct FlakyHandler {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl ApiHandler for FlakyHandler {
    async fn create_message(
        &self,
        _system_prompt: &str,
        _messages: &[ChatMessage],
    ) -> Result<EventStream, BridgeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(BridgeError::Timeout { secs: 30 });
        }
        Ok(Box::pin(futures::stream::iter(vec![Ok(StreamEvent::text(
            "connected",
        ))])))
    }

    fn model(&self) -> ModelInfo {
        ModelInfo {
            id: "flaky".to_string(),
            context_window: 4096,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn retrying_handler_reopens_stream_after_timeouts() {
    let handler = Arc::new(RetryingHandler::new(
        FlakyHandler {
            failures: 2,
            calls: AtomicUsize::new(0),
        },
        fast_policy(3),
    ));
    let handler_for_task = handler.clone();

    let task = tokio::spawn(async move {
        let stream = handler_for_task
            .create_message("sys", &[ChatMessage::user("hi")])
            .await?;
        Ok::<_, BridgeError>(stream.collect::<Vec<_>>().await)
    });

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    let items = task.await.unwrap().unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].as_ref().unwrap(), &StreamEvent::text("connected"));
    assert_eq!(handler.inner().calls.load(Ordering::SeqCst), 3);
    assert_eq!(handler.model().id, "flaky");
}
