use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owner of every piece of timed work a session has in flight
///
/// Tasks are spawned on the current tokio runtime and race against a shared
/// cancellation token. `cancel_all` also aborts their join handles, so nothing
/// scheduled here outlives the session.
pub struct Scheduler {
    token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Run `task` until it finishes or the scheduler is cancelled
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.token.is_cancelled() {
            return;
        }

        let token = self.token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = task => {}
            }
        });
        self.track(handle);
    }

    /// Run `task` once after `delay`, unless cancelled first
    pub fn spawn_after<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }

    /// Cancel and abort everything in flight. Safe to call repeatedly.
    pub fn cancel_all(&self) {
        self.token.cancel();

        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        let pending = tasks.len();
        for handle in tasks.drain(..) {
            handle.abort();
        }
        if pending > 0 {
            debug!("Cancelled {} scheduled task(s)", pending);
        }
    }

    /// Number of tasks that have not completed yet
    pub fn pending(&self) -> usize {
        let tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.iter().filter(|h| !h.is_finished()).count()
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
