//! The run lifecycle state machine.
//!
//! ```text
//! Idle -> Submitting -> Polling -> Completed | Failed | Cancelled
//!   ^______________________ reset() ______________________|
//! ```
//!
//! All state lives in one [`RunSnapshot`] behind a `tokio::sync::watch`
//! channel. Transitions are applied with `send_if_modified`, so every
//! check-then-set happens under the channel's lock.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use geotrack_core::{RunConfig, RunHandle, RunResults, RunStatus};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::backend::RunBackend;
use crate::error::RunError;

/// Where the orchestrator is in a run's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl RunPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunPhase::Completed | RunPhase::Failed | RunPhase::Cancelled
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Submitting => "submitting",
            RunPhase::Polling => "polling",
            RunPhase::Completed => "completed",
            RunPhase::Failed => "failed",
            RunPhase::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an observer needs to render the current run.
#[derive(Debug, Clone, Default)]
pub struct RunSnapshot {
    pub phase: RunPhase,
    pub handle: Option<RunHandle>,
    pub progress: Option<geotrack_core::RunProgress>,
    pub results: Option<Arc<RunResults>>,
    /// Operator-facing error: a transport failure, a rejected configuration,
    /// or the server's reason for a failed or cancelled job.
    pub error: Option<String>,
}

impl RunSnapshot {
    /// Completed, but the results fetch failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.phase == RunPhase::Completed && self.results.is_none()
    }

    fn job_id(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.job_id.as_str())
    }
}

/// Tuning for [`RunOrchestrator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Delay between one status response and the next request.
    pub poll_interval: Duration,
}

impl OrchestratorOptions {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

    #[must_use]
    pub fn with_poll_interval_ms(ms: u64) -> Self {
        Self {
            poll_interval: Duration::from_millis(ms),
        }
    }
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Drives one run at a time against a [`RunBackend`].
///
/// Dropping the orchestrator stops its poll loop.
pub struct RunOrchestrator<B: RunBackend> {
    backend: Arc<B>,
    options: OrchestratorOptions,
    state: Arc<watch::Sender<RunSnapshot>>,
    /// Token of the current session; replaced by `reset`.
    session: Mutex<CancellationToken>,
}

impl<B: RunBackend> RunOrchestrator<B> {
    #[must_use]
    pub fn new(backend: B, options: OrchestratorOptions) -> Self {
        Self::with_shared(Arc::new(backend), options)
    }

    /// Like [`RunOrchestrator::new`] for a backend the caller keeps using.
    #[must_use]
    pub fn with_shared(backend: Arc<B>, options: OrchestratorOptions) -> Self {
        let (state, _) = watch::channel(RunSnapshot::default());
        Self {
            backend,
            options,
            state: Arc::new(state),
            session: Mutex::new(CancellationToken::new()),
        }
    }

    /// A receiver that sees every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        self.state.borrow().clone()
    }

    fn session_token(&self) -> CancellationToken {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Submits `config` and starts polling the new job.
    ///
    /// Only accepted from `Idle`. The phase moves to `Submitting` before the
    /// request is sent, so a concurrent second call fails fast.
    ///
    /// # Errors
    ///
    /// - [`RunError::SubmissionInFlight`] if another submission is pending.
    /// - [`RunError::RunActive`] if a run is polling or finished.
    /// - [`RunError::Validation`] if `config` is incomplete; nothing is sent.
    /// - [`RunError::Transport`] if the backend rejects the request or is
    ///   unreachable. The phase returns to `Idle`.
    /// - [`RunError::NoActiveRun`] if [`RunOrchestrator::reset`] ran while
    ///   the request was pending. The job is not polled.
    pub async fn submit(&self, config: &RunConfig) -> Result<RunHandle, RunError> {
        let mut guard = Ok(());
        self.state.send_if_modified(|snap| {
            guard = match snap.phase {
                RunPhase::Submitting => Err(RunError::SubmissionInFlight),
                RunPhase::Idle => config.validate().map_err(RunError::Validation),
                _ => Err(RunError::RunActive),
            };
            match &guard {
                Ok(()) => {
                    snap.phase = RunPhase::Submitting;
                    snap.error = None;
                    true
                }
                Err(RunError::Validation(e)) => {
                    snap.error = Some(e.to_string());
                    true
                }
                Err(_) => false,
            }
        });
        guard?;

        let token = self.session_token();
        tracing::info!(
            brand = %config.brand_name,
            queries = config.queries.len(),
            providers = config.providers.len(),
            "submitting run"
        );

        let outcome = tokio::select! {
            biased;
            outcome = self.backend.start_run(config) => outcome,
            () = token.cancelled() => {
                tracing::warn!("run submission abandoned by reset");
                return Err(RunError::NoActiveRun);
            }
        };

        match outcome {
            Ok(handle) => {
                let published = self.state.send_if_modified(|snap| {
                    if token.is_cancelled() {
                        return false;
                    }
                    snap.phase = RunPhase::Polling;
                    snap.handle = Some(handle.clone());
                    snap.progress = None;
                    snap.results = None;
                    true
                });
                if !published {
                    tracing::warn!(job_id = %handle.job_id, "run accepted after reset; not polling it");
                    return Err(RunError::NoActiveRun);
                }
                tracing::info!(job_id = %handle.job_id, run_id = %handle.run_id, "run accepted");
                tokio::spawn(poll_loop(
                    Arc::clone(&self.backend),
                    handle.job_id.clone(),
                    self.options.poll_interval,
                    token,
                    Arc::clone(&self.state),
                ));
                Ok(handle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "run submission failed");
                publish(&self.state, &token, |snap| {
                    snap.phase = RunPhase::Idle;
                    snap.error = Some(e.to_string());
                });
                Err(RunError::Transport(e))
            }
        }
    }

    /// Asks the backend to cancel the active job.
    ///
    /// Best effort: the poll loop keeps running until the server reports a
    /// terminal status.
    ///
    /// # Errors
    ///
    /// - [`RunError::NoActiveRun`] unless a run is polling.
    /// - [`RunError::Transport`] if the cancel request fails.
    pub async fn cancel(&self) -> Result<String, RunError> {
        let job_id = {
            let snap = self.state.borrow();
            match (snap.phase, snap.job_id()) {
                (RunPhase::Polling, Some(job_id)) => job_id.to_string(),
                _ => return Err(RunError::NoActiveRun),
            }
        };
        tracing::info!(job_id = %job_id, "requesting cancellation");
        Ok(self.backend.cancel_run(&job_id).await?)
    }

    /// Starts a new analysis: stops any poll loop and discards all run state.
    pub fn reset(&self) {
        {
            let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            session.cancel();
            *session = CancellationToken::new();
        }
        self.state.send_replace(RunSnapshot::default());
        tracing::debug!("orchestrator reset");
    }

    /// Waits until the current run reaches a terminal phase.
    ///
    /// # Errors
    ///
    /// [`RunError::NoActiveRun`] if the orchestrator is, or falls back to,
    /// `Idle` (nothing submitted, submission failed, or `reset`).
    pub async fn wait_for_terminal(&self) -> Result<RunSnapshot, RunError> {
        let mut rx = self.state.subscribe();
        let snap = rx
            .wait_for(|s| s.phase.is_terminal() || s.phase == RunPhase::Idle)
            .await
            .map_err(|_| RunError::NoActiveRun)?
            .clone();
        if snap.phase == RunPhase::Idle {
            return Err(RunError::NoActiveRun);
        }
        Ok(snap)
    }

    /// Shows the results of an earlier job as a completed run.
    ///
    /// Accepted from `Idle` or any terminal phase; replaces what is shown.
    ///
    /// # Errors
    ///
    /// - [`RunError::SubmissionInFlight`] or [`RunError::RunActive`] while a
    ///   run is being submitted or polled.
    /// - [`RunError::Transport`] if the results cannot be fetched. The phase
    ///   becomes `Idle`.
    pub async fn load_previous(&self, job_id: &str) -> Result<Arc<RunResults>, RunError> {
        let mut guard = Ok(());
        self.state.send_if_modified(|snap| {
            guard = match snap.phase {
                RunPhase::Submitting => Err(RunError::SubmissionInFlight),
                RunPhase::Polling => Err(RunError::RunActive),
                _ => Ok(()),
            };
            if guard.is_err() {
                return false;
            }
            *snap = RunSnapshot {
                phase: RunPhase::Submitting,
                ..RunSnapshot::default()
            };
            true
        });
        guard?;

        let token = self.session_token();
        match self.backend.run_results(job_id).await {
            Ok(results) => {
                let results = Arc::new(results);
                let handle = RunHandle {
                    job_id: job_id.to_string(),
                    run_id: results.summary.run_id.clone(),
                    status: RunStatus::Completed,
                    message: None,
                    estimated_duration_seconds: None,
                };
                publish(&self.state, &token, |snap| {
                    snap.phase = RunPhase::Completed;
                    snap.handle = Some(handle);
                    snap.results = Some(Arc::clone(&results));
                });
                tracing::info!(job_id, results = results.results.len(), "loaded previous run");
                Ok(results)
            }
            Err(e) => {
                publish(&self.state, &token, |snap| {
                    snap.phase = RunPhase::Idle;
                    snap.error = Some(e.to_string());
                });
                Err(RunError::Transport(e))
            }
        }
    }
}

impl<B: RunBackend> Drop for RunOrchestrator<B> {
    fn drop(&mut self) {
        self.session
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }
}

/// Applies `update` unless `token` was cancelled.
///
/// `reset` cancels before it replaces the snapshot, and the check runs under
/// the channel lock, so a torn-down loop can never overwrite fresh state.
fn publish(
    state: &watch::Sender<RunSnapshot>,
    token: &CancellationToken,
    update: impl FnOnce(&mut RunSnapshot),
) -> bool {
    state.send_if_modified(|snap| {
        if token.is_cancelled() {
            return false;
        }
        update(snap);
        true
    })
}

/// One task per run. Each request is issued only after the previous
/// response has been processed.
async fn poll_loop<B: RunBackend>(
    backend: Arc<B>,
    job_id: String,
    interval: Duration,
    token: CancellationToken,
    state: Arc<watch::Sender<RunSnapshot>>,
) {
    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            () = token.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }

        ticks += 1;
        let polled = tokio::select! {
            () = token.cancelled() => break,
            polled = backend.run_status(&job_id) => polled,
        };

        let progress = match polled {
            Ok(progress) => progress,
            Err(e) => {
                publish(&state, &token, |snap| {
                    if snap.results.is_none() {
                        snap.phase = RunPhase::Failed;
                        snap.error = Some(e.to_string());
                    }
                });
                tracing::warn!(job_id = %job_id, ticks, error = %e, "status poll failed; polling stopped");
                break;
            }
        };

        let status = progress.status;
        let failure = progress.failure_message();
        tracing::debug!(
            job_id = %job_id,
            ticks,
            status = %status,
            completed = progress.completed_tasks,
            total = progress.total_tasks,
            "run progress"
        );
        if !publish(&state, &token, |snap| snap.progress = Some(progress)) {
            break;
        }

        match status {
            RunStatus::Pending | RunStatus::Running => {}
            RunStatus::Completed => {
                let fetched = tokio::select! {
                    () = token.cancelled() => break,
                    fetched = backend.run_results(&job_id) => fetched,
                };
                match fetched {
                    Ok(results) => {
                        let results = Arc::new(results);
                        publish(&state, &token, |snap| {
                            snap.phase = RunPhase::Completed;
                            snap.results = Some(results);
                            snap.error = None;
                        });
                        tracing::info!(job_id = %job_id, ticks, "run completed");
                    }
                    Err(e) => {
                        publish(&state, &token, |snap| snap.phase = RunPhase::Completed);
                        tracing::warn!(
                            job_id = %job_id,
                            error = %e,
                            "run completed without detailed results"
                        );
                    }
                }
                break;
            }
            RunStatus::Failed | RunStatus::Cancelled => {
                let phase = if status == RunStatus::Failed {
                    RunPhase::Failed
                } else {
                    RunPhase::Cancelled
                };
                publish(&state, &token, |snap| {
                    snap.phase = phase;
                    snap.error = failure;
                });
                tracing::info!(job_id = %job_id, ticks, status = %status, "run ended");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
