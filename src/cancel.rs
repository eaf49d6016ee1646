//! # Cooperative Cancellation
//!
//! A cancellation signal observed at the stream send boundary. The token
//! side is held by the scan; the `Canceller` side by whoever may abort it.
//! Cancellation is a channel disconnect: calling [`Canceller::cancel`] or
//! simply dropping the `Canceller` fires every token cloned from the pair,
//! and a fired token stays cancelled forever.
//!
//! Record and collection scans take a token for signature uniformity but
//! never consult it; only the stream strategy races sends against it.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// Observer half of a cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    done: Receiver<()>,
    // keeps the channel connected for tokens that can never fire
    _armed: Option<Sender<()>>,
}

/// Trigger half of a cancellation signal. Dropping it cancels.
#[derive(Debug)]
pub struct Canceller {
    _tx: Sender<()>,
}

impl CancellationToken {
    /// Creates a connected canceller/token pair.
    pub fn pair() -> (Canceller, CancellationToken) {
        let (tx, rx) = bounded(0);
        (
            Canceller { _tx: tx },
            CancellationToken {
                done: rx,
                _armed: None,
            },
        )
    }

    /// A token that never fires, for scans that must run to completion.
    pub fn never() -> Self {
        let (tx, rx) = bounded(0);
        CancellationToken {
            done: rx,
            _armed: Some(tx),
        }
    }

    /// Whether cancellation has fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.done.try_recv(), Err(TryRecvError::Disconnected))
    }

    pub(crate) fn done(&self) -> &Receiver<()> {
        &self.done
    }
}

impl Canceller {
    /// Fires the cancellation signal. Equivalent to dropping the canceller.
    pub fn cancel(self) {}
}
