//! Concurrent fact resolution.
//!
//! Every searched fact with a probe is one resolution unit. Units are queued
//! on a channel and drained by a bounded pool of scoped worker threads:
//!
//! ```text
//!   SearchedFact[] ──► task queue ──► fact-worker-0 ──┐
//!                                 ├─► fact-worker-1 ──┼──► results (by index)
//!                                 └─► fact-worker-N ──┘
//! ```
//!
//! A unit that fails or panics is logged and contributes no facts; its
//! siblings are unaffected. There is no per-unit timeout, so a slow probe
//! delays the whole batch.

use crate::fact::{ResolvedFact, SearchedFact};
use crate::options::Options;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct Orchestrator {
    workers: usize,
    timing: bool,
}

impl Orchestrator {
    pub fn new(options: &Options) -> Self {
        Self {
            workers: options.worker_count(),
            timing: options.timing,
        }
    }

    /// Runs every unit and returns the produced facts grouped in input order.
    pub fn resolve(&self, searched: &[SearchedFact]) -> Vec<ResolvedFact> {
        let start = Instant::now();
        let (task_tx, task_rx) = unbounded::<(usize, &SearchedFact)>();
        let (result_tx, result_rx) = unbounded::<(usize, Vec<ResolvedFact>)>();

        let mut tasks = 0;
        for (index, fact) in searched.iter().enumerate() {
            if fact.probe.is_some() {
                // The receiver outlives this loop, send cannot fail.
                let _ = task_tx.send((index, fact));
                tasks += 1;
            }
        }
        drop(task_tx);

        if tasks == 0 {
            return Vec::new();
        }

        let workers = self.workers.clamp(1, tasks);
        thread::scope(|s| {
            let mut spawned = 0;
            for id in 0..workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let spawn = thread::Builder::new()
                    .name(format!("fact-worker-{}", id))
                    .spawn_scoped(s, move || self.drain(&task_rx, &result_tx));
                match spawn {
                    Ok(_) => spawned += 1,
                    Err(e) => {
                        warn!("Failed to spawn fact worker: {}", e);
                        break;
                    }
                }
            }
            if spawned == 0 {
                self.drain(&task_rx, &result_tx);
            }
        });
        drop(result_tx);

        let mut results: Vec<(usize, Vec<ResolvedFact>)> = result_rx.try_iter().collect();
        results.sort_by_key(|(index, _)| *index);
        let facts: Vec<ResolvedFact> = results.into_iter().flat_map(|(_, f)| f).collect();

        debug!(
            "Resolved {} units into {} facts with {} workers in {:?}",
            tasks,
            facts.len(),
            workers,
            start.elapsed()
        );
        facts
    }

    fn drain(
        &self,
        tasks: &Receiver<(usize, &SearchedFact)>,
        results: &Sender<(usize, Vec<ResolvedFact>)>,
    ) {
        for (index, fact) in tasks.iter() {
            let _ = results.send((index, self.run_unit(fact)));
        }
    }

    fn run_unit(&self, fact: &SearchedFact) -> Vec<ResolvedFact> {
        let Some(probe) = &fact.probe else {
            return Vec::new();
        };
        let start = Instant::now();
        let filter = fact.filter_criteria();

        let facts = match panic::catch_unwind(AssertUnwindSafe(|| probe.call(filter))) {
            Ok(Ok(facts)) => facts,
            Ok(Err(e)) => {
                warn!("Fact {} failed: {}", fact.name, e);
                Vec::new()
            }
            Err(payload) => {
                error!("Fact {} panicked: {}", fact.name, panic_message(&*payload));
                Vec::new()
            }
        };

        if self.timing {
            info!("fact {}, took: {:?}", fact.name, start.elapsed());
        }
        facts
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
