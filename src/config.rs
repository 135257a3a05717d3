//! constants for the tracing core (platform-independent)

/// Width of one word of the bit-packed level store
pub const WORD_BITS: usize = u32::BITS as usize;

/// Default frequency of the tick counter used for timestamps (RTC, 32.768 kHz)
pub const DEFAULT_TICK_HZ: u32 = 32_768;

/// Mask applied to the raw exception number to obtain the context marker
pub const CONTEXT_MASK: u32 = 0xFF;
