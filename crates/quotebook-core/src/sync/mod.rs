//! Sync engine: reconciles the local quote collection with a remote one.
//!
//! A cycle pulls the remote collection, lets it replace the local one
//! wholesale, persists, notifies listeners, and finally pushes the result
//! back. Only a successful pull touches local state.
//!
//! Cycles are guarded: a trigger that arrives while another cycle is running
//! is dropped and reported as [`SyncOutcome::Skipped`] instead of racing the
//! running cycle for the repository.

mod listener;

pub use listener::{SyncEvent, SyncListener};

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use crate::remote::RemoteCollection;
use crate::services::QuoteService;
use crate::util::unix_timestamp_millis;

/// Default period between scheduled cycles.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

pub const SYNC_SUCCESS_MESSAGE: &str = "Quotes synced with server";

/// Where a cycle currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Merging,
    Persisting,
    Notifying,
    Pushing,
    Failed,
}

/// Summary of a successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of quotes taken from the remote
    pub pulled: usize,
    /// Whether the push back to the remote succeeded
    pub pushed: bool,
    pub push_error: Option<String>,
    /// Completion time (Unix ms)
    pub finished_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced(SyncReport),
    Failed(String),
    /// Another cycle was already running
    Skipped,
}

impl SyncOutcome {
    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

/// Drives sync cycles between a [`QuoteService`] and a remote collection.
pub struct SyncEngine<R> {
    service: QuoteService,
    remote: R,
    listener: Arc<dyn SyncListener>,
    in_progress: AtomicBool,
    phase: watch::Sender<SyncPhase>,
}

impl<R: RemoteCollection> SyncEngine<R> {
    pub fn new(service: QuoteService, remote: R, listener: impl SyncListener + 'static) -> Self {
        let (phase, _) = watch::channel(SyncPhase::Idle);
        Self {
            service,
            remote,
            listener: Arc::new(listener),
            in_progress: AtomicBool::new(false),
            phase,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Watch phase transitions.
    pub fn subscribe_phase(&self) -> watch::Receiver<SyncPhase> {
        self.phase.subscribe()
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Run one full cycle now.
    ///
    /// Network failures never escape: they are logged, reported to the
    /// listener, and returned as [`SyncOutcome::Failed`].
    pub async fn run_cycle(&self) -> SyncOutcome {
        let Some(_guard) = CycleGuard::acquire(&self.in_progress, &self.phase) else {
            tracing::debug!("Sync cycle already in progress, dropping trigger");
            return SyncOutcome::Skipped;
        };

        self.set_phase(SyncPhase::Fetching);
        let remote_quotes = match self.remote.fetch_quotes().await {
            Ok(quotes) => quotes,
            Err(error) => {
                self.set_phase(SyncPhase::Failed);
                tracing::error!("Error syncing with server: {}", error);
                let message = format!("Error syncing quotes: {error}");
                self.listener.on_sync_event(&SyncEvent::Failed {
                    message: message.clone(),
                });
                return SyncOutcome::Failed(message);
            }
        };

        // Remote replaces local. Anything added locally since the last push
        // is gone after this point.
        self.set_phase(SyncPhase::Merging);
        let pulled = remote_quotes.len();
        let local_count = self.service.len().await;
        tracing::debug!(
            "Replacing {} local quotes with {} remote quotes",
            local_count,
            pulled
        );

        self.set_phase(SyncPhase::Persisting);
        self.service.replace_all(remote_quotes).await;

        self.set_phase(SyncPhase::Notifying);
        tracing::info!("Synced {} quotes from server", pulled);
        self.listener.on_sync_event(&SyncEvent::Succeeded {
            message: SYNC_SUCCESS_MESSAGE.to_string(),
            quote_count: pulled,
        });

        self.set_phase(SyncPhase::Pushing);
        let snapshot = self.service.quotes().await;
        let push_error = match self.remote.push_quotes(&snapshot).await {
            Ok(()) => {
                tracing::debug!("Data successfully posted to server");
                None
            }
            Err(error) => {
                tracing::warn!("Error posting to server: {}", error);
                Some(error.to_string())
            }
        };

        SyncOutcome::Synced(SyncReport {
            pulled,
            pushed: push_error.is_none(),
            push_error,
            finished_at: unix_timestamp_millis(),
        })
    }

    /// Run a cycle every `period` until `shutdown` resolves.
    ///
    /// The first cycle runs one period after the call. Each tick is
    /// independent: a failed cycle does not delay or retry the next one. A
    /// cycle that has started is always allowed to finish before shutdown is
    /// observed.
    pub async fn run_periodic<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let period = period.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!("Periodic sync started: interval={}s", period.as_secs());
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Periodic sync stopped");
                    break;
                }
                _ = ticker.tick() => {
                    tracing::debug!(
                        "Sync scheduler tick: interval={}s, attempt_at={}",
                        period.as_secs(),
                        unix_timestamp_millis()
                    );
                    match self.run_cycle().await {
                        SyncOutcome::Synced(report) => {
                            tracing::debug!(
                                "Scheduled sync pulled {} quotes (pushed: {})",
                                report.pulled,
                                report.pushed
                            );
                        }
                        SyncOutcome::Failed(_) => {
                            tracing::debug!("Scheduled sync failed, waiting for next tick");
                        }
                        SyncOutcome::Skipped => {
                            tracing::debug!("Scheduled sync skipped, previous cycle still running");
                        }
                    }
                }
            }
        }
    }

    fn set_phase(&self, phase: SyncPhase) {
        tracing::trace!("Sync phase -> {:?}", phase);
        self.phase.send_replace(phase);
    }
}

/// Holds the "cycle in progress" flag; releases it and returns the engine
/// to idle when dropped.
struct CycleGuard<'a> {
    in_progress: &'a AtomicBool,
    phase: &'a watch::Sender<SyncPhase>,
}

impl<'a> CycleGuard<'a> {
    fn acquire(in_progress: &'a AtomicBool, phase: &'a watch::Sender<SyncPhase>) -> Option<Self> {
        in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { in_progress, phase })
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(SyncPhase::Idle);
        self.in_progress.store(false, Ordering::Release);
    }
}
