//! Simulated platform for hosted builds and tests
//!
//! Interrupt masking is modelled as a nesting depth, the execution context
//! is whatever the test sets, and the tick counter only moves when asked to.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use super::{IrqState, Platform};

/// Software stand-in for a microcontroller
#[derive(Debug, Default)]
pub struct HostPlatform {
    mask_depth: AtomicUsize,
    context: AtomicU32,
    ticks: AtomicU32,
}

impl HostPlatform {
    /// Task context, interrupts enabled, tick counter at zero
    pub const fn new() -> Self {
        Self {
            mask_depth: AtomicUsize::new(0),
            context: AtomicU32::new(0),
            ticks: AtomicU32::new(0),
        }
    }

    /// Pretends to run from exception `id` (0 returns to task context)
    pub fn set_context(&self, id: u32) {
        self.context.store(id, Ordering::SeqCst);
    }

    /// Moves the tick counter forward
    pub fn advance_ticks(&self, delta: u32) {
        self.ticks.fetch_add(delta, Ordering::SeqCst);
    }

    /// Sets the tick counter
    pub fn set_ticks(&self, value: u32) {
        self.ticks.store(value, Ordering::SeqCst);
    }

    /// Whether a critical section is currently open
    pub fn interrupts_masked(&self) -> bool {
        self.mask_depth.load(Ordering::SeqCst) != 0
    }
}

impl Platform for HostPlatform {
    fn disable_interrupts(&self) -> IrqState {
        IrqState(self.mask_depth.fetch_add(1, Ordering::SeqCst))
    }

    fn restore_interrupts(&self, state: IrqState) {
        self.mask_depth.store(state.0, Ordering::SeqCst);
    }

    fn context_id(&self) -> u32 {
        self.context.load(Ordering::SeqCst)
    }

    fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::SeqCst)
    }
}
