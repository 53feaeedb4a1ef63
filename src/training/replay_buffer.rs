use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::ai::state_encoding::StateVector;
use crate::game::Action;

/// One accepted environment step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateVector,
    pub action: Action,
    pub reward: f32,
    pub next_state: StateVector,
    pub done: bool,
}

/// Fixed-capacity ring buffer of transitions. The oldest entry is evicted
/// once the buffer is full.
pub struct ReplayMemory {
    buffer: Vec<Transition>,
    capacity: usize,
    /// Slot the next push writes to; also the oldest entry once full.
    position: usize,
    rng: StdRng,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_os_rng())
    }

    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        assert!(capacity > 0, "replay memory capacity must be positive");
        ReplayMemory {
            buffer: Vec::with_capacity(capacity.min(4096)),
            capacity,
            position: 0,
            rng,
        }
    }

    /// Append a transition, overwriting the oldest when full.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(transition);
        } else {
            self.buffer[self.position] = transition;
        }
        self.position = (self.position + 1) % self.capacity;
    }

    /// Sample `batch_size` transitions uniformly without replacement.
    ///
    /// When the memory holds no more than `batch_size` entries, all of them
    /// are returned in insertion order.
    pub fn sample(&mut self, batch_size: usize) -> Vec<Transition> {
        if self.buffer.len() <= batch_size {
            return self.iter().copied().collect();
        }
        index::sample(&mut self.rng, self.buffer.len(), batch_size)
            .iter()
            .map(|i| self.buffer[i])
            .collect()
    }

    /// Transitions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        let split = if self.buffer.len() < self.capacity {
            0
        } else {
            self.position
        };
        self.buffer[split..].iter().chain(self.buffer[..split].iter())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
