//! SSE Stream Parsing
//!
//! Incremental parser for the `data:`-framed server-sent event stream the
//! model backend emits. Chunks arrive at arbitrary byte boundaries, so the
//! parser keeps an internal buffer; a `data:` line whose JSON payload is
//! still incomplete is pushed back onto the buffer and retried once the
//! next chunk arrives. Frame loss is not acceptable: every delta the wire
//! carries must surface exactly once.
//!
//! The parser is transport-agnostic and synchronous; the gateway feeds it
//! decoded chunks from the HTTP byte stream.

use serde::Deserialize;

/// Terminal sentinel payload on the wire.
const DONE_SENTINEL: &str = "[DONE]";

/// One parsed event from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A content fragment to append to the assistant turn.
    Delta(String),
    /// The stream completed cleanly.
    Done,
}

#[derive(Debug, Deserialize)]
struct SseFrame {
    #[serde(default)]
    choices: Vec<SseChoice>,
}

#[derive(Debug, Deserialize)]
struct SseChoice {
    #[serde(default)]
    delta: SseDelta,
}

#[derive(Debug, Default, Deserialize)]
struct SseDelta {
    content: Option<String>,
}

/// Incremental SSE parser with partial-frame recovery.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    done: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been observed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one decoded chunk, returning every event it completes.
    ///
    /// Lines that are blank, comments, or non-`data:` fields are skipped.
    /// A `data:` line with unparsable JSON is assumed to be split across
    /// chunks and is returned to the buffer until more input arrives.
    pub fn push(&mut self, chunk: &str) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.done {
            return events;
        }

        self.buffer.push_str(chunk);

        loop {
            let Some(newline) = self.buffer.find('\n') else {
                break;
            };
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            let Some(payload) = line.strip_prefix("data: ") else {
                continue;
            };

            if payload == DONE_SENTINEL {
                self.done = true;
                events.push(StreamEvent::Done);
                return events;
            }

            match serde_json::from_str::<SseFrame>(payload) {
                Ok(frame) => {
                    if let Some(content) = frame
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.delta.content)
                    {
                        if !content.is_empty() {
                            events.push(StreamEvent::Delta(content));
                        }
                    }
                }
                Err(_) => {
                    // Frame split mid-JSON: put the line back and stop
                    // until the next chunk arrives.
                    let rest = std::mem::take(&mut self.buffer);
                    self.buffer = format!("{}\n{}", line, rest);
                    break;
                }
            }
        }

        events
    }
}
