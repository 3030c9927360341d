//! Identifier generation for tasks and subtasks.
//!
//! The planner never mints identifiers itself; the host injects an
//! [`IdGenerator`] so the engine stays deterministic under test.

use crate::task::types::Task;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Source of fresh identifiers shared by tasks and subtasks
pub trait IdGenerator {
    fn next_id(&mut self) -> u64;
}

/// Which generator the host should build
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Random,
}

/// Monotonic counter. Never repeats a value it has handed out or been seeded past.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Start above every task and subtask id already present in `tasks`
    pub fn resume_after(tasks: &[Task]) -> Self {
        let highest = tasks
            .iter()
            .flat_map(|task| std::iter::once(task.id).chain(task.subtasks.iter().map(|s| s.id)))
            .max()
            .unwrap_or(0);

        Self {
            next: highest.saturating_add(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Random 64-bit identifiers; collisions are possible but vanishingly rare
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    rng: StdRng,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence, for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> u64 {
        // Zero is reserved
        loop {
            let id: u64 = self.rng.random();
            if id != 0 {
                return id;
            }
        }
    }
}

impl IdStrategy {
    /// Build a generator for this strategy, aware of ids already in use
    pub fn build(self, existing: &[Task]) -> Box<dyn IdGenerator + Send> {
        match self {
            IdStrategy::Sequential => Box::new(SequentialIdGenerator::resume_after(existing)),
            IdStrategy::Random => Box::new(RandomIdGenerator::new()),
        }
    }
}
