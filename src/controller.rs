//! Conversation controller: owns the transcript and drives the
//! request/response lifecycle against the answering service.

use crate::markup;
use crate::service::{AnsweringClient, ServiceReply};
use crate::transcript::{Transcript, Turn};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Read-only view of the conversation state
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub turns: &'a [Turn],
    pub busy: bool,
}

/// Single owner of the conversation state. All mutation goes through
/// `submit` and the reply resolution paths; observers only ever see an
/// immutable snapshot.
///
/// At most one request is outstanding at a time: `submit` is a no-op
/// while busy, and `busy` is cleared exactly once per submission, on
/// every completion path.
pub struct ConversationController {
    transcript: Transcript,
    busy: bool,
    client: AnsweringClient,
    pending: Option<oneshot::Receiver<ServiceReply>>,
}

impl ConversationController {
    pub fn new(client: AnsweringClient) -> Self {
        Self {
            transcript: Transcript::new(),
            busy: false,
            client,
            pending: None,
        }
    }

    /// Submit a user query. Blank input (empty or whitespace-only) is
    /// silently rejected: no turn is created and no request goes out.
    /// Appends the user turn, flips to busy, and issues exactly one
    /// request on a background task.
    pub fn submit(&mut self, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        if self.busy {
            log::warn!("submit ignored: a request is already outstanding");
            return;
        }

        self.transcript.push_user(query);
        self.busy = true;
        log::info!("submitting query ({} chars)", query.chars().count());

        let (tx, rx) = oneshot::channel();
        self.pending = Some(rx);

        let client = self.client.clone();
        let query = query.to_string();
        tokio::spawn(async move {
            let _ = tx.send(client.ask(&query).await);
        });
    }

    /// Non-blocking check for a delivered reply, meant to be called once
    /// per event-loop tick. Returns true when an assistant turn was
    /// appended.
    pub fn poll_reply(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(reply) => {
                self.pending = None;
                self.finish(reply);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                // Request task dropped the sender without replying.
                self.pending = None;
                self.finish(ServiceReply::Transport(
                    "request task ended without a reply".to_string(),
                ));
                true
            }
        }
    }

    /// Await the outstanding reply, if any. Used by the one-shot CLI
    /// path where there is no event loop to poll from.
    pub async fn resolve_pending(&mut self) {
        if let Some(rx) = self.pending.take() {
            let reply = rx.await.unwrap_or_else(|_| {
                ServiceReply::Transport("request task ended without a reply".to_string())
            });
            self.finish(reply);
        }
    }

    /// Append the assistant turn for a reply and clear the busy flag.
    /// Failures become visible turns carrying diagnostic text, so every
    /// user turn gets a counterpart in the transcript.
    fn finish(&mut self, reply: ServiceReply) {
        let content = match reply {
            ServiceReply::Answer(text) => text,
            ServiceReply::MissingField => "Error: No response field in API response.".to_string(),
            ServiceReply::ServiceError { status, body } => {
                log::warn!("service error {} recorded in transcript", status);
                format!("Error: Unable to fetch response. Details: {body}")
            }
            ServiceReply::Transport(desc) => {
                log::warn!("transport failure recorded in transcript: {desc}");
                format!("Error: Something went wrong: {desc}")
            }
        };

        let display = markup::format(&content);
        self.transcript.push_assistant(content, display);
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            turns: self.transcript.turns(),
            busy: self.busy,
        }
    }
}
