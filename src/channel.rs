//! Single-slot handoff between contributed batches and the panel renderer.
//!
//! Fragments and the renderer load independently, so either side may show up
//! first. Until a consumer attaches, batches queue up in arrival order; once one
//! attaches, the queue is flushed to it and every later batch is delivered
//! synchronously.

use crate::types::Batch;
use std::fmt;

/// Receiver of contributed batches, typically the "Implementors" panel renderer.
pub trait Consumer {
    fn consume(&mut self, batch: &Batch);
}

impl<F> Consumer for F
where
    F: FnMut(&Batch),
{
    fn consume(&mut self, batch: &Batch) {
        self(batch);
    }
}

enum ChannelState {
    /// No consumer yet. Batches wait here in arrival order.
    AwaitingConsumer { pending: Vec<Batch> },
    /// Batches go straight to the consumer.
    ConsumerAttached { consumer: Box<dyn Consumer> },
}

/// Delivers each batch to the attached consumer exactly once, in contribution
/// order, regardless of whether the consumer or the batch arrived first.
pub struct HandoffChannel {
    state: ChannelState,
}

impl fmt::Debug for HandoffChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandoffChannel")
            .field("attached", &self.is_attached())
            .field("pending", &self.pending_len())
            .finish()
    }
}

impl Default for HandoffChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl HandoffChannel {
    pub const fn new() -> Self {
        Self {
            state: ChannelState::AwaitingConsumer {
                pending: Vec::new(),
            },
        }
    }

    /// Register the consumer, flushing any queued batches to it first.
    ///
    /// Attaching again replaces the current consumer. The replaced consumer is
    /// returned and receives nothing further.
    pub fn attach(&mut self, consumer: impl Consumer + 'static) -> Option<Box<dyn Consumer>> {
        let mut consumer: Box<dyn Consumer> = Box::new(consumer);

        // The queue stays in place until the flush completes; a panic mid-flush
        // leaves every batch queued for the next consumer.
        if let ChannelState::AwaitingConsumer { pending } = &self.state {
            tracing::info!(
                pending = pending.len(),
                "Consumer attached, flushing queued batches"
            );
            for batch in pending {
                consumer.consume(batch);
            }
        }

        match std::mem::replace(&mut self.state, ChannelState::ConsumerAttached { consumer }) {
            ChannelState::AwaitingConsumer { .. } => None,
            ChannelState::ConsumerAttached { consumer: previous } => {
                tracing::info!("Replaced attached consumer");
                Some(previous)
            }
        }
    }

    /// Hand a batch to the consumer, or queue it until one attaches.
    pub fn deliver(&mut self, batch: Batch) {
        match &mut self.state {
            ChannelState::AwaitingConsumer { pending } => {
                pending.push(batch);
                tracing::debug!(pending = pending.len(), "No consumer attached, batch queued");
            }
            ChannelState::ConsumerAttached { consumer } => {
                tracing::debug!(traits = batch.len(), "Delivering batch");
                consumer.consume(&batch);
            }
        }
    }

    pub const fn is_attached(&self) -> bool {
        matches!(self.state, ChannelState::ConsumerAttached { .. })
    }

    /// Batches waiting for a consumer. Always zero once attached.
    pub fn pending_len(&self) -> usize {
        match &self.state {
            ChannelState::AwaitingConsumer { pending } => pending.len(),
            ChannelState::ConsumerAttached { .. } => 0,
        }
    }
}
