//! Poll Task
//!
//! Fixed-interval background fetch with explicit start/cancel.
//! Runs once immediately, then on every tick. Polls never overlap: the next
//! tick waits for the in-flight fetch. After `cancel` the in-flight fetch is
//! allowed to finish and its result is dropped.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct PollTask {
    name: String,
    cancel: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PollTask {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// `fetch` produces a value each cycle, `apply` consumes it unless the
    /// task was cancelled while the fetch was in flight.
    pub fn start<T, F, Fut, A>(name: &str, interval: Duration, fetch: F, mut apply: A) -> Self
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        A: FnMut(T) + Send + 'static,
    {
        let (cancel, mut cancelled) = watch::channel(false);
        let task_name = name.to_string();

        let handle = tokio::spawn(async move {
            log::debug!("Poll task '{}' started ({:?})", task_name, interval);

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    // Also fires when the PollTask is dropped
                    _ = cancelled.changed() => break,
                    _ = ticker.tick() => {}
                }
                if *cancelled.borrow() {
                    break;
                }

                let value = fetch().await;

                if *cancelled.borrow() {
                    log::debug!("Poll task '{}' cancelled, discarding in-flight result", task_name);
                    break;
                }
                apply(value);
            }

            log::debug!("Poll task '{}' stopped", task_name);
        });

        Self {
            name: name.to_string(),
            cancel,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop further polling. Idempotent.
    pub fn cancel(&self) {
        // Stored even when the loop has already exited
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Cancel and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::warn!("Poll task '{}' ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
