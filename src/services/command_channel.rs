//! Single-slot, latest-wins delivery of one-shot commands.
//!
//! Backed by a `flume` bounded channel of capacity one. When the slot is
//! occupied the sender evicts the pending command before queueing the new
//! one, so a slow consumer only ever sees the most recent directive.

use flume::{Receiver, Sender, TryRecvError, TrySendError};
use tracing::trace;

/// Producer half. Cloning shares the same slot.
#[derive(Debug)]
pub struct CommandSender<T> {
    tx: Sender<T>,
    evict: Receiver<T>,
}

impl<T> Clone for CommandSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            evict: self.evict.clone(),
        }
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct CommandReceiver<T> {
    rx: Receiver<T>,
}

impl<T> Clone for CommandReceiver<T> {
    fn clone(&self) -> Self {
        Self { rx: self.rx.clone() }
    }
}

/// Creates a connected sender/receiver pair.
pub fn command_channel<T>() -> (CommandSender<T>, CommandReceiver<T>) {
    let (tx, rx) = flume::bounded(1);
    (
        CommandSender {
            tx,
            evict: rx.clone(),
        },
        CommandReceiver { rx },
    )
}

impl<T> CommandSender<T> {
    /// Queues `command`, dropping any command still waiting in the slot.
    pub fn send(&self, command: T) {
        let mut pending = command;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => return,
                Err(TrySendError::Full(returned)) => {
                    if self.evict.try_recv().is_ok() {
                        trace!("stale command dropped");
                    }
                    pending = returned;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl<T> CommandReceiver<T> {
    /// Waits for the next command. `None` once every sender is gone and the
    /// slot is empty.
    pub async fn recv(&self) -> Option<T> {
        self.rx.recv_async().await.ok()
    }

    /// Takes the pending command without waiting.
    pub fn try_recv(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
