use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Handle to a background refresh loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct PollHandle {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Stops the loop and waits for an in-flight fetch to finish.
    pub async fn cancel(mut self) {
        let _ = self.cancel.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Returns whether the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Runs `fetch` immediately and then every `period`.
///
/// Fetches never overlap: a tick that fires while a fetch is running is
/// skipped. No fetch starts after the handle is cancelled or dropped.
pub fn spawn_poller<F, Fut>(period: Duration, mut fetch: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (cancel, mut cancelled) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                changed = cancelled.changed() => {
                    if changed.is_err() || *cancelled.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    if *cancelled.borrow() {
                        break;
                    }
                    fetch().await;
                }
            }
        }

        debug!("poller stopped");
    });

    PollHandle {
        cancel,
        task: Some(task),
    }
}
