//! Single-slot delayed action

use std::{future::Future, time::Duration};

use tokio::{runtime::Handle, task::JoinHandle};

/// Owns at most one pending delayed action.
///
/// Arming replaces whatever was pending; dropping the timer cancels it.
/// Actions run on the runtime the timer was created with, so `arm` may be
/// called from threads outside it.
#[derive(Debug)]
pub struct DebounceTimer {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
        }
    }

    /// Run `action` after `delay`, cancelling the previously armed action.
    pub fn arm<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.task = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
