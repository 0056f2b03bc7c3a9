use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// Cancellation token shared by the reader, the input thread, the main loop
/// and the signal handler.
///
/// Nothing is ever sent on the inner channel. `trigger` drops the only
/// sender, which disconnects every receiver at once, so `receiver()` can sit
/// in a `select!` next to the data channels.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<Mutex<Option<Sender<()>>>>,
    rx: Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
            rx,
        }
    }

    pub fn trigger(&self) {
        let mut guard = match self.tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            tracing::debug!("shutdown triggered");
        }
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
