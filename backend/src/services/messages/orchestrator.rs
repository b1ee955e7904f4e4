//! Single-slot state machine behind the three generated-message flows.
//!
//! Every request moves the slot to `Generating(kind)` first, wiping whatever
//! the previous kind had shown. The request then carries a ticket; when the
//! provider answers, the outcome is applied only if that ticket still owns the
//! slot, so a preempted flow can never overwrite a newer one.

use crate::services::messages::prompts;
use crate::services::messages::provider::{ProviderError, TextGenerator};
use common::model::error::ADVISORY_MESSAGE;
use common::model::message::{MessageKind, MessageSlot};
use common::model::record::EnrollmentRecord;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Proof that a request currently owns the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    kind: MessageKind,
    seq: u64,
}

impl Ticket {
    pub fn kind(&self) -> MessageKind {
        self.kind
    }
}

#[derive(Default)]
struct SlotState {
    slot: MessageSlot,
    seq: u64,
}

pub struct MessageOrchestrator {
    /// `None` when the provider credential was missing or invalid at startup.
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
    state: RwLock<SlotState>,
}

impl MessageOrchestrator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        Self {
            generator,
            timeout,
            state: RwLock::new(SlotState::default()),
        }
    }

    pub async fn slot(&self) -> MessageSlot {
        self.state.read().await.slot.clone()
    }

    /// Moves the slot to `Generating(kind)` from any state.
    pub async fn begin(&self, kind: MessageKind) -> Ticket {
        let mut state = self.state.write().await;
        state.seq += 1;
        state.slot = MessageSlot::Generating { kind };
        Ticket {
            kind,
            seq: state.seq,
        }
    }

    /// Applies the outcome if `ticket` still owns the slot. Returns whether it did.
    async fn settle(&self, ticket: Ticket, outcome: Result<String, ProviderError>) -> bool {
        let mut state = self.state.write().await;
        if state.seq != ticket.seq {
            info!(
                "Discarding {} result: superseded by a newer request",
                ticket.kind
            );
            return false;
        }
        state.slot = match outcome {
            Ok(text) => MessageSlot::Ready {
                kind: ticket.kind,
                text,
            },
            Err(e) => {
                if e.kind().is_recoverable() {
                    warn!("Message generation ({}) failed: {}", ticket.kind, e);
                } else {
                    error!("Message generation ({}) misconfigured: {}", ticket.kind, e);
                }
                MessageSlot::Failed {
                    kind: ticket.kind,
                    message: ADVISORY_MESSAGE.to_string(),
                }
            }
        };
        true
    }

    /// Runs the flow owned by `ticket` to completion. No lock is held while the
    /// provider is working.
    pub async fn run(&self, ticket: Ticket, records: &[EnrollmentRecord]) -> MessageSlot {
        let outcome = match (&self.generator, prompts::build(ticket.kind, records)) {
            (None, _) => Err(ProviderError::MissingCredential),
            (Some(_), None) => Err(ProviderError::Malformed("empty record set".to_string())),
            (Some(generator), Some(prompt)) => {
                match tokio::time::timeout(self.timeout, generator.generate(&prompt)).await {
                    Ok(Ok(reply)) => Ok(prompts::finish(ticket.kind, &reply)),
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(ProviderError::Timeout),
                }
            }
        };
        self.settle(ticket, outcome).await;
        self.slot().await
    }

    /// `begin` followed by `run`. An empty record set leaves the slot untouched.
    pub async fn request(&self, kind: MessageKind, records: &[EnrollmentRecord]) -> MessageSlot {
        if records.is_empty() {
            return self.slot().await;
        }
        let ticket = self.begin(kind).await;
        self.run(ticket, records).await
    }
}
