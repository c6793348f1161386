// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The dispatch thread.
//!
//! All model mutation and message dispatch happen on one thread that owns the state (usually a
//! [`StackManager`](crate::manager::StackManager)). Other threads hand it closures: [`Coordinator::call`]
//! blocks until the closure ran, [`Coordinator::submit`] returns a [`Completion`] to wait on
//! later, and [`Coordinator::execute_async`] runs a unit of work on the blocking pool and then
//! applies its result back on the dispatch thread.

use std::panic::AssertUnwindSafe;
use std::thread::{self, JoinHandle, ThreadId};

use tokio::sync::{mpsc, oneshot};

use crate::config::EngineConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    #[error("failed to start dispatch thread: {0}")]
    Spawn(String),
    #[error("dispatch thread is gone or dropped the reply")]
    Closed,
    #[error("cannot block on the dispatch thread from the dispatch thread itself")]
    Reentrant,
}

type RunFn<S> = Box<dyn FnOnce(&mut S) + Send>;
type OffloadFn<S> = Box<dyn FnOnce() -> RunFn<S> + Send>;

enum Job<S> {
    Run { work: RunFn<S>, span: tracing::Span },
    Offload { work: OffloadFn<S>, span: tracing::Span },
    Shutdown,
}

/// Pending result of work handed to the dispatch thread.
#[derive(Debug)]
pub struct Completion<R> {
    rx: oneshot::Receiver<R>,
    coordinator: ThreadId,
}

impl<R> Completion<R> {
    /// Blocks the calling thread until the result is available.
    pub fn wait(self) -> Result<R, CoordinatorError> {
        if thread::current().id() == self.coordinator {
            return Err(CoordinatorError::Reentrant);
        }
        self.rx.blocking_recv().map_err(|_| CoordinatorError::Closed)
    }

    /// Non-blocking poll. `None` while the work is still pending.
    pub fn try_take(&mut self) -> Option<Result<R, CoordinatorError>> {
        match self.rx.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(CoordinatorError::Closed)),
        }
    }

    pub async fn recv(self) -> Result<R, CoordinatorError> {
        self.rx.await.map_err(|_| CoordinatorError::Closed)
    }
}

/// Owner of the dispatch thread and of the state `S` that lives on it.
///
/// Dropping the coordinator stops the thread after the jobs already queued have run.
pub struct Coordinator<S> {
    tx: mpsc::UnboundedSender<Job<S>>,
    thread: Option<JoinHandle<()>>,
    thread_id: ThreadId,
}

impl<S: Send + 'static> Coordinator<S> {
    pub fn new(thread_name: &str, state: S) -> Result<Self, CoordinatorError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|err| CoordinatorError::Spawn(err.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let requeue = tx.clone();

        let thread = thread::Builder::new()
            .name(thread_name.to_owned())
            .spawn(move || runtime.block_on(run_jobs(state, rx, requeue)))
            .map_err(|err| CoordinatorError::Spawn(err.to_string()))?;
        let thread_id = thread.thread().id();
        tracing::debug!(thread = thread_name, "dispatch thread started");

        Ok(Self { tx, thread: Some(thread), thread_id })
    }

    pub fn from_config(config: &EngineConfig, state: S) -> Result<Self, CoordinatorError> {
        Self::new(&config.dispatch_thread_name, state)
    }

    pub fn is_coordinator_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Queues `work` and returns immediately.
    pub fn submit<R: Send + 'static>(
        &self,
        work: impl FnOnce(&mut S) -> R + Send + 'static,
    ) -> Completion<R> {
        let (reply, rx) = oneshot::channel();
        let job = Job::Run {
            work: Box::new(move |state: &mut S| {
                let _ = reply.send(work(state));
            }),
            span: tracing::Span::current(),
        };
        // A closed channel drops the job with its reply sender; the completion reports Closed.
        let _ = self.tx.send(job);
        Completion { rx, coordinator: self.thread_id }
    }

    /// Runs `work` on the dispatch thread and blocks until it returns.
    pub fn call<R: Send + 'static>(
        &self,
        work: impl FnOnce(&mut S) -> R + Send + 'static,
    ) -> Result<R, CoordinatorError> {
        if self.is_coordinator_thread() {
            return Err(CoordinatorError::Reentrant);
        }
        self.submit(work).wait()
    }

    /// Runs `work` on the blocking pool, then `apply` with its output on the dispatch thread.
    ///
    /// `work` must not touch the state; only `apply` sees it.
    pub fn execute_async<T, R>(
        &self,
        work: impl FnOnce() -> T + Send + 'static,
        apply: impl FnOnce(&mut S, T) -> R + Send + 'static,
    ) -> Completion<R>
    where
        T: Send + 'static,
        R: Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        let job = Job::Offload {
            work: Box::new(move || {
                let value = work();
                Box::new(move |state: &mut S| {
                    let _ = reply.send(apply(state, value));
                }) as RunFn<S>
            }),
            span: tracing::Span::current(),
        };
        let _ = self.tx.send(job);
        Completion { rx, coordinator: self.thread_id }
    }
}

async fn run_jobs<S: Send + 'static>(
    mut state: S,
    mut rx: mpsc::UnboundedReceiver<Job<S>>,
    requeue: mpsc::UnboundedSender<Job<S>>,
) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Run { work, span } => {
                let _guard = span.enter();
                if std::panic::catch_unwind(AssertUnwindSafe(|| work(&mut state))).is_err() {
                    tracing::error!("job panicked on the dispatch thread");
                }
            }
            Job::Offload { work, span } => {
                let requeue = requeue.clone();
                let task = tokio::task::spawn_blocking(work);
                tokio::spawn(async move {
                    match task.await {
                        Ok(apply) => {
                            let _ = requeue.send(Job::Run { work: apply, span });
                        }
                        Err(err) => {
                            let _guard = span.enter();
                            tracing::error!(error = %err, "offloaded work failed");
                        }
                    }
                });
            }
            Job::Shutdown => break,
        }
    }
    tracing::debug!("dispatch thread stopped");
}

impl<S> Drop for Coordinator<S> {
    fn drop(&mut self) {
        let _ = self.tx.send(Job::Shutdown);
        if thread::current().id() == self.thread_id {
            return;
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("dispatch thread panicked");
            }
        }
    }
}

impl<S> std::fmt::Debug for Coordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator").field("thread", &self.thread_id).finish()
    }
}
