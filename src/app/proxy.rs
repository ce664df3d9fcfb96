//! Defines an abstraction over the event sending mechanism.

use crate::core::BuildEvent;
use tokio::sync::mpsc::UnboundedSender;

/// A trait that abstracts the delivery of build events to the caller.
/// This is "fire-and-forget" and doesn't return a result, simplifying its use.
///
/// Implementations must preserve emission order and must not drop events
/// while the receiving side is alive.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: BuildEvent);
}

/// An unbounded channel buffers everything the caller has not drained yet.
impl EventProxy for UnboundedSender<BuildEvent> {
    fn send_event(&self, event: BuildEvent) {
        // The only failure is a dropped receiver, i.e. nobody is listening anymore.
        if let Err(e) = self.send(event) {
            tracing::warn!("Failed to deliver build event, receiver is gone: {:?}", e.0);
        }
    }
}
