//! Bounded single-consumer queue for one-shot UI effects.

use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

/// Queue capacity; producers wait only once this many effects are undrained.
pub const EFFECTS_BUFFER: usize = 64;

/// Consumer side of a state holder's effect queue.
pub type EffectReceiver<E> = mpsc::Receiver<E>;

pub(crate) struct EffectQueue<E> {
    sender: mpsc::Sender<E>,
    receiver: Mutex<Option<mpsc::Receiver<E>>>,
}

impl<E: Send + 'static> EffectQueue<E> {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel(EFFECTS_BUFFER);
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    pub(crate) fn sender(&self) -> mpsc::Sender<E> {
        self.sender.clone()
    }

    /// Hands the receiver to its only consumer; later calls return `None`.
    pub(crate) fn take_receiver(&self) -> Option<EffectReceiver<E>> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
