//! Bounded queue of deferred work
//!
//! A fixed number of zero-argument callbacks, run later in the order they
//! were queued. Meant for main-loop deferral: something that cannot run
//! now (an interrupt handler, a failed bus read) queues a follow-up.

use heapless::Deque;
use log::warn;

/// Default number of callback slots
pub const MAX_FUNCTION_NODES: usize = 10;

/// The queue had no free slot; the callback was not queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;

impl core::fmt::Display for QueueFull {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("function queue full")
    }
}

/// FIFO of callbacks with `N` slots
pub struct FunctionQueue<const N: usize = MAX_FUNCTION_NODES> {
    slots: Deque<fn(), N>,
}

impl<const N: usize> Default for FunctionQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FunctionQueue<N> {
    pub const fn new() -> Self {
        Self {
            slots: Deque::new(),
        }
    }

    /// Queue `function` behind everything already waiting
    pub fn enqueue(&mut self, function: fn()) -> Result<(), QueueFull> {
        self.slots.push_back(function).map_err(|_| {
            warn!("function queue full ({} slots)", N);
            QueueFull
        })
    }

    /// Run and remove every queued callback, oldest first
    ///
    /// Returns how many ran.
    pub fn run_all(&mut self) -> usize {
        let mut ran = 0;
        while let Some(function) = self.slots.pop_front() {
            function();
            ran += 1;
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
