//! Worker rendezvous
//!
//! Spawns four named worker threads, waits until all of them are counted as
//! running, then releases them and waits until the count drops back to zero.
//!
//! The driver never blocks on an event. It polls the running count with a
//! fixed delay in both phases, and in the release phase it broadcasts on
//! every poll. In [`ReleaseMode::Broadcast`] a worker only wakes for a
//! broadcast issued after it parked, so one that parks late needs a later
//! broadcast; the retry loop is what guarantees it gets one.
//!
//! A worker that never observes a release keeps `run` blocked forever. That
//! is the intended behavior for "pause all threads" debugging sessions.

use ks_harness::log_line;
use ks_harness::state_machine::validate_transition;
use ks_harness::{Feature, FeatureError, HarnessConfig, Logger, ReleaseMode, WorkerState};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Number of workers spawned by every run
pub const WORKER_COUNT: usize = 4;

/// Label and informational loop budget of one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSpec {
    /// Thread name, also used in log lines
    pub label: &'static str,
    /// Only ever logged
    pub loop_count: u32,
}

/// The fixed worker roster
pub const WORKERS: [WorkerSpec; WORKER_COUNT] = [
    WorkerSpec { label: "A-Blue", loop_count: 3 },
    WorkerSpec { label: "B-Green", loop_count: 2 },
    WorkerSpec { label: "C-Orange", loop_count: 0 },
    WorkerSpec { label: "D-Red", loop_count: 1 },
];

#[derive(Debug, Default)]
struct ReleaseGate {
    epoch: u64,
    open: bool,
}

/// State shared between the driver and its workers for one run
#[derive(Debug, Default)]
pub struct Rendezvous {
    running: AtomicUsize,
    peak: AtomicUsize,
    broadcasts: AtomicU64,
    gate: Mutex<ReleaseGate>,
    release: Condvar,
}

impl Rendezvous {
    /// Current running count
    #[must_use]
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Highest running count observed
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Broadcasts issued so far
    #[must_use]
    pub fn broadcasts(&self) -> u64 {
        self.broadcasts.load(Ordering::SeqCst)
    }

    fn enter(&self) -> usize {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        now
    }

    fn leave(&self) -> Result<usize, FeatureError> {
        self.running
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|prev| prev - 1)
            .map_err(|_| FeatureError::CounterUnderflow)
    }

    fn wait_for_release(&self, mode: ReleaseMode) {
        let mut gate = self.gate.lock();
        match mode {
            ReleaseMode::Broadcast => {
                let parked_at = gate.epoch;
                while gate.epoch == parked_at {
                    self.release.wait(&mut gate);
                }
            }
            ReleaseMode::Predicate => {
                while !gate.open {
                    self.release.wait(&mut gate);
                }
            }
        }
    }

    /// Wake every parked worker. Safe to call any number of times.
    pub fn broadcast(&self) {
        {
            let mut gate = self.gate.lock();
            gate.epoch = gate.epoch.wrapping_add(1);
            gate.open = true;
        }
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        self.release.notify_all();
    }
}

/// One worker's state and the path it took
#[derive(Debug)]
struct WorkerTask {
    spec: WorkerSpec,
    state: WorkerState,
    history: Vec<WorkerState>,
}

impl WorkerTask {
    fn new(spec: WorkerSpec) -> Self {
        Self {
            spec,
            state: WorkerState::Created,
            history: vec![WorkerState::Created],
        }
    }

    fn advance(&mut self, to: WorkerState) -> Result<(), FeatureError> {
        validate_transition(self.state, to)?;
        tracing::trace!(worker = self.spec.label, from = ?self.state, to = ?to, "worker transition");
        self.state = to;
        self.history.push(to);
        Ok(())
    }

    fn into_outcome(self) -> WorkerOutcome {
        WorkerOutcome {
            label: self.spec.label,
            loop_count: self.spec.loop_count,
            final_state: self.state,
            history: self.history,
        }
    }
}

/// How one worker finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    /// Worker label
    pub label: &'static str,
    /// Informational loop budget
    pub loop_count: u32,
    /// Last state reached
    pub final_state: WorkerState,
    /// Every state visited, starting at `Created`
    pub history: Vec<WorkerState>,
}

/// Result of one rendezvous
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendezvousReport {
    /// Outcomes in spawn order
    pub workers: Vec<WorkerOutcome>,
    /// Highest running count observed by any worker
    pub peak_running: usize,
    /// Running count after all workers joined
    pub final_running: usize,
    /// Release broadcasts the driver issued
    pub broadcasts: u64,
}

impl RendezvousReport {
    /// True when every worker reached `Stopped` and none is still counted
    #[must_use]
    pub fn all_stopped(&self) -> bool {
        self.final_running == 0
            && self.workers.len() == WORKER_COUNT
            && self
                .workers
                .iter()
                .all(|w| w.final_state == WorkerState::Stopped)
    }
}

fn worker_loop(
    shared: &Rendezvous,
    spec: WorkerSpec,
    mode: ReleaseMode,
    log: &Logger,
) -> Result<WorkerOutcome, FeatureError> {
    let mut task = WorkerTask::new(spec);

    log_line!(log, "Starting thread ", spec.label, ". LoopCount: ", spec.loop_count);
    task.advance(WorkerState::Started)?;
    shared.enter();

    // Wait until main is ready before closing thread
    task.advance(WorkerState::WaitingAtBarrier)?;
    shared.wait_for_release(mode);
    task.advance(WorkerState::Released)?;

    log_line!(log, "Ending thread ", spec.label, ". LoopCount: ", spec.loop_count);
    shared.leave()?;
    task.advance(WorkerState::Stopped)?;

    Ok(task.into_outcome())
}

type WorkerHandle = (&'static str, JoinHandle<Result<WorkerOutcome, FeatureError>>);

fn spawn_worker(
    shared: &Arc<Rendezvous>,
    spec: WorkerSpec,
    mode: ReleaseMode,
    log: &Logger,
) -> Result<WorkerHandle, FeatureError> {
    let worker_shared = Arc::clone(shared);
    let worker_log = log.clone();
    let handle = thread::Builder::new()
        .name(spec.label.to_string())
        .spawn(move || worker_loop(&worker_shared, spec, mode, &worker_log))
        .map_err(|source| FeatureError::Spawn {
            label: spec.label.to_string(),
            source,
        })?;
    Ok((spec.label, handle))
}

/// The Threading feature
#[derive(Debug, Clone)]
pub struct ThreadingFeature {
    poll_interval: Duration,
    release_mode: ReleaseMode,
}

impl ThreadingFeature {
    /// Create from configuration
    #[must_use]
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            release_mode: config.release_mode,
        }
    }

    /// Registry constructor
    #[must_use]
    pub fn boxed(config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self::new(config))
    }

    /// Spawn, gather, release and join the workers.
    ///
    /// # Errors
    /// A worker that could not be spawned or that panicked. When a spawn
    /// fails, the workers already running are released and joined first.
    pub fn rendezvous(&self, log: &Logger) -> Result<RendezvousReport, FeatureError> {
        let shared = Arc::new(Rendezvous::default());
        let mut handles = Vec::with_capacity(WORKER_COUNT);

        log_line!(log, "Creating a few threads.");
        for spec in WORKERS {
            match spawn_worker(&shared, spec, self.release_mode, log) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    tracing::warn!(worker = spec.label, error = %err, "spawn failed");
                    let joined = self.abandon(&shared, handles);
                    tracing::debug!(joined, "released partial rendezvous");
                    return Err(err);
                }
            }
        }

        log_line!(log, "Wait for threads to start...");
        self.gather(&shared, WORKER_COUNT);

        log_line!(log, "All threads running!");
        log_line!(log, "Notify threads to close...");
        self.release(&shared);

        let mut workers = Vec::with_capacity(WORKER_COUNT);
        for (label, handle) in handles {
            let outcome = handle
                .join()
                .map_err(|_| FeatureError::WorkerPanicked(label.to_string()))??;
            workers.push(outcome);
        }

        Ok(RendezvousReport {
            workers,
            peak_running: shared.peak(),
            final_running: shared.running(),
            broadcasts: shared.broadcasts(),
        })
    }

    /// Poll until `count` workers are counted as running.
    fn gather(&self, shared: &Rendezvous, count: usize) {
        while shared.running() < count {
            thread::sleep(self.poll_interval);
        }
    }

    /// Broadcast on every poll until no worker is counted as running.
    fn release(&self, shared: &Rendezvous) {
        while shared.running() > 0 {
            shared.broadcast();
            thread::sleep(self.poll_interval);
        }
    }

    /// Release and join a partially spawned set; returns how many joined.
    ///
    /// Broadcasts until every handle has finished, so a worker that parks
    /// after any given broadcast still sees a later one.
    fn abandon(&self, shared: &Rendezvous, handles: Vec<WorkerHandle>) -> usize {
        while !handles.iter().all(|(_, handle)| handle.is_finished()) {
            shared.broadcast();
            thread::sleep(self.poll_interval);
        }

        let mut joined = 0;
        for (label, handle) in handles {
            if handle.join().is_err() {
                tracing::warn!(worker = label, "worker panicked during release");
            }
            joined += 1;
        }
        joined
    }
}

impl Feature for ThreadingFeature {
    fn name(&self) -> &'static str {
        "Threading"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        let report = self.rendezvous(log)?;
        log_line!(
            log,
            "All threads stopped. Peak running: ",
            report.peak_running,
            ". Broadcasts: ",
            report.broadcasts
        );
        Ok(())
    }
}
