//! Simulation store — registry of running and finished runs

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::engine::EngineHandle;
use crate::results::{RunStatus, SimulationResult};

/// One registry slot
enum StoreEntry {
    Running(EngineHandle),
    Finished(SimulationResult),
}

/// Registry of simulations keyed by simulation id.
///
/// A host registers a run's handle before spawning the loop, swaps in the
/// terminal result when the run finishes, and serves status/result queries
/// in between. The store is a plain injectable value, not a global, and
/// performs no I/O.
#[derive(Default)]
pub struct SimulationStore {
    inner: RwLock<HashMap<String, StoreEntry>>,
}

impl SimulationStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a run that is about to start
    pub fn register(&self, simulation_id: impl Into<String>, handle: EngineHandle) {
        self.inner
            .write()
            .insert(simulation_id.into(), StoreEntry::Running(handle));
    }

    /// Replace a run's entry with its terminal result
    pub fn finish(&self, result: SimulationResult) {
        self.inner.write().insert(
            result.simulation_id.clone(),
            StoreEntry::Finished(result),
        );
    }

    /// Lifecycle status of a run, if known
    pub fn status(&self, simulation_id: &str) -> Option<RunStatus> {
        self.inner
            .read()
            .get(simulation_id)
            .map(|entry| match entry {
                StoreEntry::Running(_) => RunStatus::Running,
                StoreEntry::Finished(result) => result.status,
            })
    }

    /// Handle of a run that has not finished yet
    pub fn handle(&self, simulation_id: &str) -> Option<EngineHandle> {
        match self.inner.read().get(simulation_id) {
            Some(StoreEntry::Running(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Terminal result of a finished run
    pub fn result(&self, simulation_id: &str) -> Option<SimulationResult> {
        match self.inner.read().get(simulation_id) {
            Some(StoreEntry::Finished(result)) => Some(result.clone()),
            _ => None,
        }
    }

    /// Drop a run from the registry
    pub fn remove(&self, simulation_id: &str) -> bool {
        self.inner.write().remove(simulation_id).is_some()
    }

    /// Ids of every tracked run
    pub fn ids(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// Number of tracked runs
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
