//! Stop signal for background pumps.
//!
//! The signal is a channel close: the owning handle closes its sender when
//! told to or when dropped, and every receiver clone wakes up.

use async_channel::{Receiver, Sender};

/// Closes the paired [`ShutdownReceiver`] when dropped or on [`shutdown`](Self::shutdown).
#[derive(Debug)]
pub(crate) struct ShutdownHandle {
    sender: Sender<()>,
}

impl ShutdownHandle {
    /// Create a handle and the receiver it controls.
    pub(crate) fn new() -> (Self, ShutdownReceiver) {
        let (sender, receiver) = async_channel::bounded(1);
        (Self { sender }, ShutdownReceiver { receiver })
    }

    /// Signal shutdown now rather than on drop.
    pub(crate) fn shutdown(&self) {
        self.sender.close();
    }
}

impl Drop for ShutdownHandle {
    fn drop(&mut self) {
        self.sender.close();
    }
}

/// Watches a [`ShutdownHandle`].
#[derive(Debug, Clone)]
pub(crate) struct ShutdownReceiver {
    receiver: Receiver<()>,
}

impl ShutdownReceiver {
    /// Whether shutdown was signaled.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.receiver.is_closed()
    }

    /// Resolve once shutdown is signaled.
    pub(crate) async fn wait(&self) {
        // Nothing is ever sent; recv only returns once the channel closes.
        let _ = self.receiver.recv().await;
    }
}
