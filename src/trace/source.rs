//! Trace sources
//!
//! A source is a logical emitter category (a subsystem) owning its own
//! verbosity level. Identities are plain indices in `[0, SOURCE_COUNT)`;
//! out-of-range values can be built but are rejected by the level store.

use core::fmt;

use super::config::SOURCE_COUNT;

/// Identifier of a trace source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Source(u8);

impl Source {
    /// Application main loop
    pub const MAIN: Source = Source(0);
    /// System services
    pub const SYS: Source = Source(1);
    /// Wireless stack
    pub const BLE: Source = Source(2);
    /// First source free for application use
    pub const LAST: Source = Source(3);

    /// Wraps a raw identifier without range checking
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw identifier
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Identifier as an array index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the identifier designates an existing source
    pub const fn is_valid(self) -> bool {
        self.index() < SOURCE_COUNT
    }

    /// Every valid source
    pub fn all() -> impl Iterator<Item = Source> {
        (0..SOURCE_COUNT as u8).map(Source)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src{:02}", self.0)
    }
}
