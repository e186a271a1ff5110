//! Lifetime-bound set of spawned tasks.

use log::debug;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Tasks spawned on behalf of one state holder.
///
/// Cancelling (explicitly or on drop) aborts every task still running and
/// makes later `spawn` calls abort immediately.
pub struct TaskScope {
    name: &'static str,
    inner: Mutex<ScopeState>,
}

#[derive(Default)]
struct ScopeState {
    handles: Vec<JoinHandle<()>>,
    cancelled: bool,
}

impl TaskScope {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(ScopeState::default()),
        }
    }

    /// Spawns `task` on the current Tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.cancelled {
            debug!(
                "event=scope_spawn module=presentation scope={} status=skipped reason=cancelled",
                self.name
            );
            return;
        }
        state.handles.retain(|handle| !handle.is_finished());
        state.handles.push(tokio::spawn(task));
    }

    /// Number of tasks that have not finished yet.
    pub fn active(&self) -> usize {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .handles
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancelled
    }

    /// Aborts all running tasks; the scope accepts no new work afterwards.
    pub fn cancel(&self) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.cancelled {
            return;
        }
        state.cancelled = true;
        let aborted = state.handles.len();
        for handle in state.handles.drain(..) {
            handle.abort();
        }
        debug!(
            "event=scope_cancel module=presentation scope={} aborted={aborted}",
            self.name
        );
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
