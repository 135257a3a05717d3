//! Tracing configuration

use bitflags::bitflags;

use super::level::Level;
use super::source::Source;
use crate::config::{DEFAULT_TICK_HZ, WORD_BITS};

/// Number of trace sources
pub const SOURCE_COUNT: usize = 32;

/// Width of the packed field holding the level of one source (3 level bits + 1 reserved)
pub const LEVEL_BITS: usize = 4;

/// Number of words needed to hold the level of every source
pub const LEVEL_WORDS: usize = SOURCE_COUNT * LEVEL_BITS / WORD_BITS;

/// Maximum length of a single trace message, in bytes
pub const SLOT_CAPACITY: usize = 127;

/// log2 of the number of slots in the message queue
pub const QUEUE_LEN_LOG2: u32 = 7;

/// Number of slots in the message queue (128)
pub const QUEUE_LEN: usize = 1 << QUEUE_LEN_LOG2;

/// Bytes rendered per `tr_hex!` message
pub const HEX_BYTES_PER_LINE: usize = 16;

const _: () = assert!(Level::COUNT <= 1 << LEVEL_BITS);
const _: () = assert!(WORD_BITS % LEVEL_BITS == 0);
const _: () = assert!((SOURCE_COUNT * LEVEL_BITS) % WORD_BITS == 0);
const _: () = assert!(QUEUE_LEN.is_power_of_two());
const _: () = assert!(SLOT_CAPACITY <= u8::MAX as usize);

bitflags! {
    /// Segments of the message header, each individually toggleable
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HeaderFlags: u8 {
        /// `^%08x ` tick counter
        const TIMESTAMP = 1 << 0;
        /// `:%02x ` sequence counter
        const SEQUENCE = 1 << 1;
        /// `{%02x} ` execution context marker
        const CONTEXT = 1 << 2;
        /// `component[line] ` location tag
        const LOCATION = 1 << 3;
        /// `function() ` name of the emitting function
        const FUNCTION = 1 << 4;
    }
}

/// Default header: everything but the context marker
pub const DEFAULT_HEADER: HeaderFlags = HeaderFlags::TIMESTAMP
    .union(HeaderFlags::SEQUENCE)
    .union(HeaderFlags::LOCATION)
    .union(HeaderFlags::FUNCTION);

/// Levels applied by `init()` to each source
pub const DEFAULT_LEVELS: [Option<Level>; SOURCE_COUNT] = {
    let mut levels = [None; SOURCE_COUNT];
    levels[Source::MAIN.index()] = Some(Level::Debug);
    levels[Source::SYS.index()] = Some(Level::Debug);
    levels[Source::BLE.index()] = Some(Level::Chatty);
    levels
};

/// Runtime configuration of a [`TraceSubsystem`](super::TraceSubsystem)
#[derive(Debug, Clone, Copy)]
pub struct TraceConfig {
    /// Header segments prepended to leveled messages
    pub header: HeaderFlags,
    /// Level applied to each source at `init()`, `None` keeps it disabled
    pub default_levels: [Option<Level>; SOURCE_COUNT],
    /// Frequency of the platform tick counter, announced in the banner
    pub tick_hz: u32,
    /// Emit the start-up banner from `init()`
    pub banner: bool,
    /// Source used for records coming through the `log` facade
    pub log_source: Source,
}

impl TraceConfig {
    /// Configuration used when nothing else is specified
    pub const DEFAULT: Self = Self {
        header: DEFAULT_HEADER,
        default_levels: DEFAULT_LEVELS,
        tick_hz: DEFAULT_TICK_HZ,
        banner: true,
        log_source: Source::SYS,
    };

    /// Same configuration without header segments nor banner; handy when
    /// the exact slot content matters.
    pub const fn bare() -> Self {
        Self {
            header: HeaderFlags::empty(),
            default_levels: [None; SOURCE_COUNT],
            tick_hz: DEFAULT_TICK_HZ,
            banner: false,
            log_source: Source::SYS,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
