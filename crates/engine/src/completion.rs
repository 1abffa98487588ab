//! Animation completion handles and the per-phase join barrier
//!
//! The view layer gets a [`Completer`] for every animation it is asked to
//! play and the engine keeps the matching [`CompletionHandle`]. A phase that
//! waits on its animations collects the handles in a [`JoinBarrier`] and moves
//! on only once every one of them has finished. Finish order does not matter;
//! only the count does.
//!
//! Handles can be checked without blocking from a frame loop
//! ([`JoinBarrier::try_complete`]) or awaited from async code
//! ([`JoinBarrier::wait`]).

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::warn;

/// Create a linked completer/handle pair
pub fn completion_pair() -> (Completer, CompletionHandle) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx }, CompletionHandle { rx: Some(rx) })
}

/// View-side end: signal that one animation finished
#[derive(Debug)]
pub struct Completer {
    tx: oneshot::Sender<()>,
}

impl Completer {
    pub fn complete(self) {
        // The engine may have stopped waiting (fire-and-forget phases).
        let _ = self.tx.send(());
    }
}

/// Engine-side end of one animation request
#[derive(Debug)]
pub struct CompletionHandle {
    rx: Option<oneshot::Receiver<()>>,
}

impl CompletionHandle {
    /// A handle that is already finished (for views that do not animate)
    pub fn ready() -> Self {
        Self { rx: None }
    }

    /// Non-blocking check. A dropped [`Completer`] counts as finished.
    pub fn try_finished(&mut self) -> bool {
        let Some(rx) = self.rx.as_mut() else {
            return true;
        };
        let finished = match rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                warn!("animation completer dropped without signalling");
                true
            }
        };
        if finished {
            self.rx = None;
        }
        finished
    }

    pub async fn wait(self) {
        if let Some(rx) = self.rx {
            if rx.await.is_err() {
                warn!("animation completer dropped without signalling");
            }
        }
    }
}

/// Outstanding handles for the current phase
#[derive(Debug, Default)]
pub struct JoinBarrier {
    pending: Vec<CompletionHandle>,
}

impl JoinBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: CompletionHandle) {
        self.pending.push(handle);
    }

    /// Handles not yet seen finished
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Drop finished handles; true once none remain
    pub fn try_complete(&mut self) -> bool {
        self.pending.retain_mut(|h| !h.try_finished());
        self.pending.is_empty()
    }

    /// Await every outstanding handle
    pub async fn wait(&mut self) {
        for handle in self.pending.drain(..) {
            handle.wait().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrier_waits_for_every_handle() {
        let mut barrier = JoinBarrier::new();
        let mut completers = Vec::new();
        for _ in 0..3 {
            let (c, h) = completion_pair();
            completers.push(c);
            barrier.push(h);
        }

        assert!(!barrier.try_complete());
        // Finish out of order.
        completers.swap(0, 2);
        let last = completers.pop().unwrap();
        for c in completers {
            c.complete();
        }
        assert!(!barrier.try_complete());
        assert_eq!(barrier.outstanding(), 1);

        last.complete();
        assert!(barrier.try_complete());
        assert_eq!(barrier.outstanding(), 0);
    }

    #[test]
    fn test_ready_handle_and_empty_barrier() {
        let mut barrier = JoinBarrier::new();
        assert!(barrier.try_complete());
        barrier.push(CompletionHandle::ready());
        assert!(barrier.try_complete());
    }

    #[test]
    fn test_dropped_completer_counts_as_finished() {
        let (c, mut h) = completion_pair();
        assert!(!h.try_finished());
        drop(c);
        assert!(h.try_finished());
    }

    #[tokio::test]
    async fn test_wait_resolves_after_completion() {
        let mut barrier = JoinBarrier::new();
        let (c1, h1) = completion_pair();
        let (c2, h2) = completion_pair();
        barrier.push(h1);
        barrier.push(h2);

        tokio::spawn(async move {
            c2.complete();
            c1.complete();
        });
        barrier.wait().await;
        assert_eq!(barrier.outstanding(), 0);
    }

    #[test]
    fn test_wait_is_pending_until_signalled() {
        let mut barrier = JoinBarrier::new();
        let (c, h) = completion_pair();
        barrier.push(h);

        let mut task = tokio_test::task::spawn(barrier.wait());
        tokio_test::assert_pending!(task.poll());
        c.complete();
        assert!(task.is_woken());
        tokio_test::assert_ready!(task.poll());
    }
}
