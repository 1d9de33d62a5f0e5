//! Transport seams.

use crate::error::BusResult;

/// Inbound side of a topic subscription.
pub trait MessageSource {
    /// Block until the next message arrives.
    ///
    /// # Errors
    ///
    /// [`crate::BusError::Closed`] once the sender side is gone and the queue
    /// is drained.
    fn recv(&mut self) -> BusResult<Vec<u8>>;

    /// Take the next message if one is queued. `Ok(None)` means nothing is
    /// available right now and is not an error.
    ///
    /// # Errors
    ///
    /// [`crate::BusError::Closed`] once the sender side is gone and the queue
    /// is drained.
    fn try_recv(&mut self) -> BusResult<Option<Vec<u8>>>;
}

/// Outbound side of a publisher.
pub trait MessageSink {
    /// # Errors
    ///
    /// Fails when the underlying transport rejects the write.
    fn send(&mut self, message: &[u8]) -> BusResult<()>;
}

impl<S: MessageSource + ?Sized> MessageSource for Box<S> {
    fn recv(&mut self) -> BusResult<Vec<u8>> {
        (**self).recv()
    }

    fn try_recv(&mut self) -> BusResult<Option<Vec<u8>>> {
        (**self).try_recv()
    }
}

impl<S: MessageSink + ?Sized> MessageSink for Box<S> {
    fn send(&mut self, message: &[u8]) -> BusResult<()> {
        (**self).send(message)
    }
}

impl<S: MessageSink + ?Sized> MessageSink for &mut S {
    fn send(&mut self, message: &[u8]) -> BusResult<()> {
        (**self).send(message)
    }
}
