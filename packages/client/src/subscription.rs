//! Scoped background work.

use std::future::Future;

use tokio::task::JoinHandle;

/// Owns a spawned task and aborts it when dropped.
///
/// Whatever the task was listening to is unsubscribed on every exit path of
/// the owning scope, early returns and panics included.
#[must_use = "dropping a Subscription cancels its task"]
#[derive(Debug)]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::from_handle(tokio::spawn(future))
    }

    pub fn from_handle(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Let the task run to completion on its own.
    ///
    /// Used by a task that needs to release the subscription owning itself.
    pub fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
