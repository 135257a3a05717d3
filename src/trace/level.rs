/// Verbosity level of a trace message
///
/// Higher values are rarer and more severe. A source configured at some
/// level emits every message at that level or above.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Highly verbose messages, such as function calls
    Chatty = 0,
    /// Verbose messages
    Debug = 1,
    /// Informational messages
    Info = 2,
    /// Warnings
    Warn = 3,
    /// Errors and critical issues
    Error = 4,
    /// Unexpected and unrecoverable issues
    Fatal = 5,
    /// Function entry/exit marker; never a filtering threshold
    Func = 6,
}

/// One marker per filtering level, plus the "off" placeholder
const LEVEL_MARKERS: &[u8; 7] = b"CDIWEF.";

impl Level {
    /// Number of filtering levels (`Func` is not one of them)
    pub const COUNT: usize = 6;

    /// Disables every non-fatal message of a source
    pub const OFF: Level = Level::Fatal;

    /// Every filtering level, least severe first
    pub const ALL: [Level; Level::COUNT] = [
        Level::Chatty,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Converts a raw packed value back into a level
    pub const fn from_u8(raw: u8) -> Option<Level> {
        match raw {
            0 => Some(Level::Chatty),
            1 => Some(Level::Debug),
            2 => Some(Level::Info),
            3 => Some(Level::Warn),
            4 => Some(Level::Error),
            5 => Some(Level::Fatal),
            6 => Some(Level::Func),
            _ => None,
        }
    }

    /// Whether the level may be used as a per-source threshold
    pub const fn is_threshold(self) -> bool {
        (self as usize) < Self::COUNT
    }

    /// Single-character marker written after the header, `None` for `Func`
    pub const fn marker(self) -> Option<u8> {
        if self.is_threshold() {
            Some(LEVEL_MARKERS[self as usize])
        } else {
            None
        }
    }

    /// Placeholder shown for a source whose traces are off
    pub const fn off_marker() -> u8 {
        LEVEL_MARKERS[Self::COUNT]
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Chatty,
        }
    }
}
