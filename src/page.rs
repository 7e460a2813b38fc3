//! The page context: one registry and one handoff channel, owned together.

use crate::channel::{Consumer, HandoffChannel};
use crate::registry::Registry;
use crate::types::Batch;

/// All implementor state for one documentation page.
///
/// Created when the page context is set up and dropped with it. Batches that
/// were queued for a consumer that never attached are discarded on drop.
#[derive(Debug, Default)]
pub struct PageContext {
    registry: Registry,
    channel: HandoffChannel,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one fragment's batch into the registry, then hand it to the consumer
    /// (or queue it until one attaches).
    ///
    /// Never fails. The consumer receives only this batch; use [`Self::registry`]
    /// for the accumulated view.
    pub fn contribute(&mut self, batch: Batch) {
        self.registry.merge(&batch);
        self.channel.deliver(batch);
    }

    /// Attach the renderer. Batches contributed earlier are delivered to it
    /// immediately, in contribution order. Returns the consumer it replaced, if any.
    pub fn attach_consumer(
        &mut self,
        consumer: impl Consumer + 'static,
    ) -> Option<Box<dyn Consumer>> {
        self.channel.attach(consumer)
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    pub const fn channel(&self) -> &HandoffChannel {
        &self.channel
    }
}
