//! Asynchronous drain engine
//!
//! Hands queued slots to the [`Transport`] one at a time. The read cursor
//! only moves once the transport reported completion of the slot it was
//! given, or refused it synchronously.
//!
//! The whole state lives in one atomic word so that the producer kick (task
//! context) and the completion callback (interrupt context) can race
//! without a lock: whoever wins the compare-exchange out of `IDLE` or out of
//! an in-flight index owns the engine until it stores a new state.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use super::queue::CircularQueue;
use super::transport::Transport;
use crate::arch::Platform;

const IDLE: usize = usize::MAX;
const HALTED: usize = usize::MAX - 1;
/// Engine owned by a pump in progress, nothing handed to the transport yet
const CLAIMED: usize = usize::MAX - 2;

/// Observable state of the drain engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    /// Nothing in flight
    Idle,
    /// A pump is choosing the next slot
    Starting,
    /// Slot `index` is owned by the transport
    Active(usize),
    /// Stopped for good by the fatal path
    Halted,
}

impl DrainState {
    fn decode(raw: usize) -> Self {
        match raw {
            IDLE => DrainState::Idle,
            HALTED => DrainState::Halted,
            CLAIMED => DrainState::Starting,
            index => DrainState::Active(index),
        }
    }

    /// Whether a transmission is outstanding or about to be
    pub fn is_active(self) -> bool {
        matches!(self, DrainState::Starting | DrainState::Active(_))
    }
}

/// Single-consumer state machine moving slots from the queue to the transport
pub(super) struct DrainEngine {
    state: AtomicUsize,
    failures: AtomicU32,
}

impl DrainEngine {
    pub(super) const fn new() -> Self {
        Self {
            state: AtomicUsize::new(IDLE),
            failures: AtomicU32::new(0),
        }
    }

    pub(super) fn reset(&self) {
        self.state.store(IDLE, Ordering::SeqCst);
        self.failures.store(0, Ordering::SeqCst);
    }

    pub(super) fn state(&self) -> DrainState {
        DrainState::decode(self.state.load(Ordering::Acquire))
    }

    /// Writes refused by the transport so far
    pub(super) fn transport_failures(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Stops the engine; completions and kicks are ignored from now on
    pub(super) fn halt(&self) {
        self.state.store(HALTED, Ordering::SeqCst);
    }

    /// Starts draining if the engine is idle. A kick while a transmission
    /// is outstanding does nothing: the completion path picks the new slot up.
    pub(super) fn kick<const N: usize>(
        &self,
        queue: &CircularQueue<N>,
        platform: &(impl Platform + ?Sized),
        transport: &(impl Transport + ?Sized),
    ) {
        if self.claim(IDLE) {
            self.pump(queue, platform, transport);
        }
    }

    /// Completion of the outstanding write
    ///
    /// Releases the slot that was in flight and starts the next one. Safe
    /// from interrupt context. Spurious notifications (engine idle, halted
    /// or still starting) are ignored.
    pub(super) fn complete<const N: usize>(
        &self,
        queue: &CircularQueue<N>,
        platform: &(impl Platform + ?Sized),
        transport: &(impl Transport + ?Sized),
    ) {
        let current = self.state.load(Ordering::Acquire);
        if current >= N || !self.claim(current) {
            return;
        }
        queue.pop_advance(platform);
        self.pump(queue, platform, transport);
    }

    fn claim(&self, from: usize) -> bool {
        self.state
            .compare_exchange(from, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Moves from `CLAIMED` to `to`; fails only if the engine was halted meanwhile
    fn release(&self, to: usize) -> bool {
        self.state
            .compare_exchange(CLAIMED, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Runs with the engine claimed, until a write is started or the queue is empty
    fn pump<const N: usize>(
        &self,
        queue: &CircularQueue<N>,
        platform: &(impl Platform + ?Sized),
        transport: &(impl Transport + ?Sized),
    ) {
        loop {
            // SAFETY: the engine is the only consumer and the slice does not
            // outlive start_write; the read cursor moves past the slot only
            // after its completion or refusal
            let Some((index, data)) = (unsafe { queue.pop_peek(platform) }) else {
                if !self.release(IDLE) {
                    return;
                }
                // a push may have landed between the peek and the release
                // while the engine still looked busy
                if queue.is_empty() || !self.claim(IDLE) {
                    return;
                }
                continue;
            };

            // published before the write starts: the completion may fire
            // before start_write even returns
            if !self.release(index) {
                return;
            }
            if transport.start_write(data).is_ok() {
                return;
            }

            self.failures.fetch_add(1, Ordering::Relaxed);
            if !self.claim(index) {
                return;
            }
            queue.pop_advance(platform);
        }
    }
}
