//! Hand-off of operations to the host's main thread.
//!
//! Background work cannot touch live host state directly. Instead it sends
//! a closure through [`MainThread::run`] and waits for the result; the host
//! drains the queue on its main thread with a [`MainThreadExecutor`].
//!
//! ```text
//! ┌───────────────────┐   Job + oneshot   ┌──────────────────────┐
//! │ background task   │ ────────────────► │ MainThreadExecutor   │
//! │ (installer run)   │ ◄──────────────── │ (host main thread)   │
//! └───────────────────┘      result       └──────────────────────┘
//! ```
//!
//! Jobs run strictly in the order they were queued.

use crate::core::{InstallerError, InstallerResult};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, trace};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle for queueing work onto the main thread
#[derive(Clone)]
pub struct MainThread {
    sender: mpsc::UnboundedSender<Job>,
}

impl MainThread {
    /// Run `operation` on the main thread and wait for its result
    ///
    /// A panic inside `operation` is reported as `Unexpected`.
    pub async fn run<T, F>(&self, operation: F) -> InstallerResult<T>
    where
        F: FnOnce() -> InstallerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let (response_tx, response_rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            let result = match catch_unwind(AssertUnwindSafe(operation)) {
                Ok(result) => result,
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    error!("Main thread operation panicked: {}", reason);
                    Err(InstallerError::Unexpected(format!(
                        "Main thread operation panicked: {}",
                        reason
                    )))
                }
            };
            // The waiting task may have been abandoned; nothing to report to
            let _ = response_tx.send(result);
        });

        self.sender.send(job).map_err(|_| {
            InstallerError::Unexpected("Main thread executor has shut down".to_string())
        })?;

        response_rx.await.map_err(|_| {
            InstallerError::Unexpected("Main thread dropped the operation".to_string())
        })?
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Receiving side of the main-thread queue, owned by the host
pub struct MainThreadExecutor {
    receiver: mpsc::UnboundedReceiver<Job>,
}

impl MainThreadExecutor {
    /// Create a connected handle/executor pair
    pub fn new() -> (MainThread, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (MainThread { sender }, Self { receiver })
    }

    /// Run every job queued so far, like one host callback tick
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        if ran > 0 {
            trace!(jobs = ran, "Drained main thread queue");
        }
        ran
    }

    /// Run jobs as they arrive until every [`MainThread`] handle is dropped
    pub async fn run(mut self) {
        while let Some(job) = self.receiver.recv().await {
            job();
        }
    }
}
