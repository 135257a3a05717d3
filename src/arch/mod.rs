//! Host capabilities the tracing core depends on
//!
//! The core contains no hardware-specific instructions. Masking the
//! completion interrupt, telling task context from interrupt context and
//! reading the tick counter are provided by a [`Platform`] implementation
//! injected at construction time.

mod host;
pub use host::HostPlatform;

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod armv7m;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub use armv7m::CortexM;

/// Interrupt state saved when entering a critical section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqState(pub usize);

/// Execution environment of the tracing core
pub trait Platform {
    /// Masks the interrupts that may re-enter the core and returns the
    /// previous state. Must nest.
    fn disable_interrupts(&self) -> IrqState;

    /// Restores the state returned by the matching `disable_interrupts`.
    fn restore_interrupts(&self, state: IrqState);

    /// Raw identifier of the running context: 0 in task context, the active
    /// exception number otherwise.
    fn context_id(&self) -> u32;

    /// Current value of the free-running tick counter
    fn ticks(&self) -> u32;

    /// Whether the caller runs from an interrupt handler
    #[inline]
    fn is_interrupt_context(&self) -> bool {
        self.context_id() != 0
    }
}

impl<P: Platform + ?Sized> Platform for &P {
    fn disable_interrupts(&self) -> IrqState {
        (**self).disable_interrupts()
    }

    fn restore_interrupts(&self, state: IrqState) {
        (**self).restore_interrupts(state)
    }

    fn context_id(&self) -> u32 {
        (**self).context_id()
    }

    fn ticks(&self) -> u32 {
        (**self).ticks()
    }
}
