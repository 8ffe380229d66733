//! Next-tick task queue.
//!
//! Work that must not run while the current input event is still being
//! dispatched is deferred here and drained once the event loop finishes the
//! event. There is no cancellation: each task re-validates its captured state
//! when it runs.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred<N> {
    /// Remove focus from the captured anchor if it is still the live anchor.
    Blur(N),
}

#[derive(Debug)]
pub struct TaskQueue<N> {
    tasks: VecDeque<Deferred<N>>,
}

impl<N> Default for TaskQueue<N> {
    fn default() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }
}

impl<N> TaskQueue<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, task: Deferred<N>) {
        self.tasks.push_back(task);
    }

    /// Take every queued task in FIFO order. Tasks deferred while the drained
    /// batch runs wait for the next tick.
    pub fn drain(&mut self) -> Vec<Deferred<N>> {
        self.tasks.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
