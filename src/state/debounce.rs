//! Delays propagation of rapidly changing input such as search text.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Delay applied to free-text search before it reaches the list query.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Emits a value only after it has been stable for `delay`.
///
/// A newer [`push`](Debouncer::push) cancels the pending one. Dropping the
/// debouncer cancels whatever is still pending.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Spawns the debounce task on the current Tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, mut pending_rx) = mpsc::unbounded_channel::<T>();
        let (output_tx, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while let Some(mut pending) = pending_rx.recv().await {
                loop {
                    tokio::select! {
                        newer = pending_rx.recv() => match newer {
                            Some(value) => pending = value,
                            None => return,
                        },
                        _ = tokio::time::sleep(delay) => {
                            output_tx.send_if_modified(|current| {
                                if *current == pending {
                                    false
                                } else {
                                    *current = pending.clone();
                                    true
                                }
                            });
                            break;
                        }
                    }
                }
            }
        });

        Self {
            input,
            output,
            task,
        }
    }

    pub fn push(&self, value: T) {
        if self.input.send(value).is_err() {
            log::debug!("Debounce task already stopped; input dropped");
        }
    }

    /// Receiver that observes each settled value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    /// Last settled value.
    pub fn settled(&self) -> T {
        self.output.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
