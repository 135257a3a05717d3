//! Cortex-M implementation of [`Platform`]
//!
//! PRIMASK provides the critical section, ICSR.VECTACTIVE (the IPSR value)
//! tells interrupt context from thread mode.

use cortex_m::interrupt;
use cortex_m::peripheral::SCB;
use cortex_m::register::primask;

use super::{IrqState, Platform};
use crate::config::CONTEXT_MASK;

/// Bare-metal Cortex-M platform; timestamps come from a caller-supplied
/// tick reader (RTC counter, SysTick shadow...).
pub struct CortexM {
    ticks: fn() -> u32,
}

impl CortexM {
    /// Builds the platform around a tick reader
    pub const fn new(ticks: fn() -> u32) -> Self {
        Self { ticks }
    }
}

impl Platform for CortexM {
    fn disable_interrupts(&self) -> IrqState {
        let was_active = primask::read().is_active();
        interrupt::disable();
        IrqState(was_active as usize)
    }

    fn restore_interrupts(&self, state: IrqState) {
        if state.0 != 0 {
            // SAFETY: interrupts were enabled when the matching section was entered
            unsafe { interrupt::enable() };
        }
    }

    fn context_id(&self) -> u32 {
        // SAFETY: read-only access to ICSR, which has no side effect
        let icsr = unsafe { (*SCB::PTR).icsr.read() };
        icsr & CONTEXT_MASK
    }

    fn ticks(&self) -> u32 {
        (self.ticks)()
    }
}
