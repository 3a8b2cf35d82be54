//! Bounded worker pool that adapter work is dispatched onto.
//!
//! Adapter calls may block on network I/O or spend a while parsing pages, so
//! [`ParserWrapper`](crate::wrapper::ParserWrapper) never runs them on the
//! caller's task. A [`WorkerPool`] is a handle to a tokio runtime, normally a
//! dedicated one with a fixed number of `shiori-worker` threads.
//!
//! Work spawned on the pool is tied to the returned [`Dispatched`] handle:
//! dropping the handle aborts the task, so cancelling a caller's operation
//! also cancels everything it dispatched.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::{
    error::{Error, Result},
    settings::Settings,
};

/// Owns a dedicated runtime and shuts it down without blocking when the last
/// pool handle goes away, which is also legal from inside async code.
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// Handle to the runtime adapter work runs on. Cheap to clone.
#[derive(Clone)]
pub struct WorkerPool {
    handle: Handle,
    _owned: Option<Arc<OwnedRuntime>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("dedicated", &self._owned.is_some())
            .finish()
    }
}

impl WorkerPool {
    /// Uses the runtime the caller is currently running on.
    ///
    /// Adapter work then shares the caller's scheduler, and on a
    /// current-thread runtime it runs on the caller's own thread. Meant for
    /// tests and for callers that deliberately share their runtime;
    /// applications should use [`with_threads`](WorkerPool::with_threads) or
    /// [`from_settings`](WorkerPool::from_settings).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Other`] when called outside of a tokio runtime.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current()
            .map_err(|e| Error::Other(format!("no tokio runtime available: {}", e)))?;
        Ok(Self::from_handle(handle))
    }

    pub fn from_handle(handle: Handle) -> Self {
        Self {
            handle,
            _owned: None,
        }
    }

    /// Starts a dedicated multi-threaded runtime with `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(threads.max(1))
            .thread_name("shiori-worker")
            .enable_all()
            .build()?;
        tracing::debug!(threads, "started dedicated worker pool");
        Ok(Self {
            handle: runtime.handle().clone(),
            _owned: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }

    /// Dedicated pool sized by [`Settings::worker_threads`].
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::with_threads(settings.worker_threads)
    }

    /// Runs `future` on the pool.
    pub fn spawn<F>(&self, future: F) -> Dispatched<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        Dispatched {
            handle: self.handle.spawn(future),
        }
    }
}

/// A task running on a [`WorkerPool`].
///
/// Resolves to the task output, or to [`Error::Join`] if the task panicked.
/// Dropping it before completion aborts the task.
#[must_use = "dropping a Dispatched handle aborts the task"]
pub struct Dispatched<T> {
    handle: JoinHandle<T>,
}

impl<T> Future for Dispatched<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map_err(Error::from)
    }
}

impl<T> Drop for Dispatched<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
