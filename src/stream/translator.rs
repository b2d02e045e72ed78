//! Read loop turning NDJSON fragments into [`StreamEvent`]s.

use std::sync::Arc;

use futures::{Stream, StreamExt};

use crate::diagnostics::DiagnosticSink;
use crate::error::BridgeError;
use crate::tools::{self, ToolArguments};
use crate::types::{EventStream, StreamEvent};

use super::chunk::{decode, Chunk, ToolCallRaw};
use super::line_buffer::LineBuffer;

/// Lifecycle of one response stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorState {
    Idle,
    Streaming,
    /// A `done` chunk was honoured or the body ended.
    Done,
    /// The transport failed mid-read.
    Failed,
}

/// Translates one response body. Not reusable across requests.
pub struct StreamTranslator {
    buffer: LineBuffer,
    state: TranslatorState,
    sink: Arc<dyn DiagnosticSink>,
}

impl StreamTranslator {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            buffer: LineBuffer::new(),
            state: TranslatorState::Idle,
            sink,
        }
    }

    pub fn state(&self) -> TranslatorState {
        self.state
    }

    /// Feed one fragment and collect the events it completes.
    ///
    /// Once a `done` chunk is seen, the remaining lines of the fragment and
    /// every later fragment are ignored.
    pub fn feed(&mut self, fragment: &[u8]) -> Vec<StreamEvent> {
        if self.state == TranslatorState::Idle {
            self.state = TranslatorState::Streaming;
        }
        if self.state != TranslatorState::Streaming {
            return Vec::new();
        }

        let mut events = Vec::new();
        for line in self.buffer.append(fragment) {
            self.process_line(&line, &mut events);
            if self.state == TranslatorState::Done {
                break;
            }
        }
        events
    }

    /// End of body: the unterminated tail, if any, is the final line.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if matches!(self.state, TranslatorState::Idle | TranslatorState::Streaming) {
            if let Some(line) = self.buffer.flush() {
                self.process_line(&line, &mut events);
            }
            self.state = TranslatorState::Done;
        }
        events
    }

    /// Record a transport failure. No further events are produced.
    pub fn fail(&mut self, err: &BridgeError) {
        self.sink.request_failed(err);
        self.state = TranslatorState::Failed;
    }

    /// Drive a body stream to completion, yielding events lazily.
    ///
    /// A read error is yielded once and ends the stream.
    pub fn translate<S, B, E>(mut self, body: S) -> EventStream
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: Into<BridgeError> + Send + 'static,
    {
        let stream = async_stream::stream! {
            futures::pin_mut!(body);

            while let Some(next) = body.next().await {
                let fragment = match next {
                    Ok(fragment) => fragment,
                    Err(e) => {
                        let err: BridgeError = e.into();
                        self.fail(&err);
                        yield Err(err);
                        break;
                    }
                };

                for event in self.feed(fragment.as_ref()) {
                    yield Ok(event);
                }
                if self.state == TranslatorState::Done {
                    break;
                }
            }

            for event in self.finish() {
                yield Ok(event);
            }
        };

        Box::pin(stream)
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<StreamEvent>) {
        if line.is_empty() {
            return;
        }

        let chunk = match decode(line) {
            Ok(chunk) => chunk,
            Err(err) => {
                self.sink.malformed_line(&err);
                return;
            }
        };
        self.sink.chunk_received(&chunk);

        if let Some(thinking) = chunk.thinking() {
            events.push(StreamEvent::reasoning(thinking));
        }
        if let Some(content) = chunk.content() {
            events.push(StreamEvent::text(content));
        }
        for call in chunk.tool_calls() {
            events.push(StreamEvent::text(self.encode_tool_call(call)));
        }

        if chunk.is_done() {
            self.complete(&chunk);
        }
    }

    fn encode_tool_call(&self, call: &ToolCallRaw) -> String {
        let resolved = tools::resolve(call.name());
        if resolved.is_unknown() {
            self.sink.unknown_tool(call.name());
        }

        let args = call.arguments().unwrap_or_else(|| {
            self.sink
                .malformed_arguments(call.name(), &call.function.arguments);
            ToolArguments::new()
        });
        if !resolved.is_unknown() {
            for key in args.keys().filter(|key| !tools::is_tag_name(key)) {
                self.sink.dropped_argument_key(call.name(), key);
            }
        }

        tools::encode(&resolved, &args)
    }

    fn complete(&mut self, chunk: &Chunk) {
        self.sink.stream_complete(chunk);
        self.state = TranslatorState::Done;
    }
}
