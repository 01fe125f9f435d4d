use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counts in-flight crawl tasks so a caller can wait for a task tree whose
/// size is only discovered while it runs.
///
/// Every task must hold a [`Ticket`] obtained *before* it is spawned. The
/// count therefore never reaches zero while a parent could still register a
/// child.
#[derive(Clone, Debug, Default)]
pub struct TaskBarrier {
    inner: Arc<BarrierState>,
}

#[derive(Debug, Default)]
struct BarrierState {
    pending: AtomicUsize,
    drained: Notify,
}

/// Proof of one registered task. Dropping it completes the task, whether
/// the task finished, bailed out early, returned an error or panicked.
#[derive(Debug)]
#[must_use = "dropping a ticket immediately completes the task it stands for"]
pub struct Ticket {
    inner: Arc<BarrierState>,
}

impl TaskBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> Ticket {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        Ticket {
            inner: self.inner.clone(),
        }
    }

    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Resolves once no ticket is outstanding. Tickets registered while
    /// waiting are waited for too.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            // Register interest before reading the counter so a drain that
            // happens in between is not missed.
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}
