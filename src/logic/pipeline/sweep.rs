//! Batch Re-classification Sweep
//!
//! Worker pool draining the store's pending queue: new arrivals, unknown
//! verdicts, and everything stale after a version bump. Per-message
//! isolation is mandatory - no failure on one message may abort the rest.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_SWEEP_WORKERS};
use crate::logic::audit::{AuditLog, PipelineEvent};
use crate::logic::message::Message;
use crate::logic::storage::{MessageStore, StorageError};

use super::coordinator::{classify_message, ClassifierConfig, Outcome};
use super::inflight::InflightSet;

// ============================================================================
// SWEEP REPORT
// ============================================================================

/// What a sweep did, per message disposition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub classified: usize,
    pub skipped: usize,
    pub extraction_failures: usize,
    /// Saves that failed; those messages stay pending and retry next sweep
    pub storage_failures: usize,
    /// Messages another worker already had in flight
    pub deduplicated: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.classified + self.skipped + self.extraction_failures + self.storage_failures
            + self.deduplicated
    }

    fn absorb(&mut self, other: SweepReport) {
        self.classified += other.classified;
        self.skipped += other.skipped;
        self.extraction_failures += other.extraction_failures;
        self.storage_failures += other.storage_failures;
        self.deduplicated += other.deduplicated;
    }
}

// ============================================================================
// SWEEPER
// ============================================================================

/// Configured batch sweep over one store
pub struct Sweeper<'a> {
    store: &'a dyn MessageStore,
    config: ClassifierConfig,
    workers: usize,
    batch_size: usize,
    inflight: InflightSet,
    audit: Option<&'a AuditLog>,
}

impl<'a> Sweeper<'a> {
    pub fn new(store: &'a dyn MessageStore, config: ClassifierConfig) -> Self {
        Self {
            store,
            config,
            workers: DEFAULT_SWEEP_WORKERS,
            batch_size: DEFAULT_BATCH_SIZE,
            inflight: InflightSet::new(),
            audit: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Share an in-flight set with other classification entry points
    pub fn with_inflight(mut self, inflight: InflightSet) -> Self {
        self.inflight = inflight;
        self
    }

    pub fn with_audit(mut self, audit: &'a AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Drain the pending queue. Returns once no unseen pending messages
    /// remain; messages whose save failed are left for the next sweep.
    pub fn run(&self) -> Result<SweepReport, StorageError> {
        let mut report = SweepReport::default();
        let mut seen: HashSet<u64> = HashSet::new();

        loop {
            // A message that stays pending (save failure, unknown verdict)
            // reappears in load_pending and may occlude unseen ones behind
            // it; widen the window by what was already visited and take
            // each id once per sweep.
            let limit = seen.len() + self.batch_size;
            let batch = self.store.load_pending(self.config.version, limit)?;
            let fresh: Vec<Message> =
                batch.into_iter().filter(|m| seen.insert(m.id)).collect();
            if fresh.is_empty() {
                break;
            }
            report.absorb(self.process_batch(fresh));
        }

        if let Some(audit) = self.audit {
            audit.record(&PipelineEvent::sweep_finished(self.config.version, &report));
        }
        log::info!(
            "sweep at v{}: {} classified, {} skipped, {} extraction failures, {} storage failures, {} deduplicated",
            self.config.version,
            report.classified,
            report.skipped,
            report.extraction_failures,
            report.storage_failures,
            report.deduplicated
        );
        Ok(report)
    }

    fn process_batch(&self, batch: Vec<Message>) -> SweepReport {
        let queue: Mutex<VecDeque<Message>> = Mutex::new(batch.into());
        let classified = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        let extraction_failures = AtomicUsize::new(0);
        let storage_failures = AtomicUsize::new(0);
        let deduplicated = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| loop {
                    let message = queue.lock().pop_front();
                    let Some(mut message) = message else { break };

                    let Some(_guard) = self.inflight.try_begin(message.id) else {
                        deduplicated.fetch_add(1, Ordering::Relaxed);
                        continue;
                    };

                    match classify_message(&mut message, &self.config) {
                        Outcome::Skipped => {
                            skipped.fetch_add(1, Ordering::Relaxed);
                        }
                        outcome => match self.store.save(&message) {
                            Ok(()) => {
                                if outcome == Outcome::ExtractionFailed {
                                    extraction_failures.fetch_add(1, Ordering::Relaxed);
                                    if let Some(audit) = self.audit {
                                        audit.record(&PipelineEvent::extraction_failed(
                                            message.id,
                                            self.config.version,
                                        ));
                                    }
                                } else {
                                    classified.fetch_add(1, Ordering::Relaxed);
                                    if let Some(audit) = self.audit {
                                        audit.record(&PipelineEvent::message_classified(&message));
                                    }
                                }
                            }
                            Err(e) => {
                                log::error!(
                                    "failed to save message {}: {}; retrying next sweep",
                                    message.id,
                                    e
                                );
                                storage_failures.fetch_add(1, Ordering::Relaxed);
                            }
                        },
                    }
                });
            }
        });

        SweepReport {
            classified: classified.into_inner(),
            skipped: skipped.into_inner(),
            extraction_failures: extraction_failures.into_inner(),
            storage_failures: storage_failures.into_inner(),
            deduplicated: deduplicated.into_inner(),
        }
    }
}

/// One-shot sweep with the default batch size and no audit trail
pub fn run_sweep(
    store: &dyn MessageStore,
    config: &ClassifierConfig,
    workers: usize,
) -> Result<SweepReport, StorageError> {
    Sweeper::new(store, *config).with_workers(workers).run()
}
