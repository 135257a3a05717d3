//! On-device tracing
//!
//! Leveled messages are filtered per [`Source`], formatted into a slot of a
//! fixed-size queue, and drained one slot at a time to an asynchronous
//! [`Transport`]:
//!
//! ```text
//! producer -> level store -> formatter -> queue -> drain engine -> transport
//!                                            ^                       |
//!                                            +---- on_write_complete-+
//! ```
//!
//! Production code usually places one [`TraceSubsystem`] in a `static`,
//! registers it with [`install`] and uses the `tr_*!` macros.

use core::fmt;

pub mod config;
mod drain;
mod format;
mod level;
mod level_store;
mod log_bridge;
pub mod macros;
mod queue;
mod slot;
mod source;
mod trace_core;
mod transport;

pub use config::{HeaderFlags, TraceConfig};
pub use drain::DrainState;
pub use format::{CallSite, TRUNCATION_MARKER};
pub use level::Level;
pub use level_store::{DISABLED, LevelStore};
pub use log_bridge::install_log_bridge;
pub use queue::{CircularQueue, QueueFull};
pub use slot::MessageSlot;
pub use source::Source;
pub use trace_core::{TraceStats, TraceSubsystem, Tracer};
pub use transport::{Transport, TxError};
pub use crate::util::build_hex;

/// Errors of the tracing setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceError {
    /// A global instance (or `log` backend) was already registered
    AlreadyInstalled,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::AlreadyInstalled => f.write_str("trace instance already installed"),
        }
    }
}

static GLOBAL_TRACER: spin::Once<&'static (dyn Tracer + Sync)> = spin::Once::new();

/// Registers the process-wide instance used by the `tr_*!` macros
///
/// Only the first call succeeds.
pub fn install(tracer: &'static (dyn Tracer + Sync)) -> Result<(), TraceError> {
    let mut fresh = false;
    GLOBAL_TRACER.call_once(|| {
        fresh = true;
        tracer
    });
    if fresh {
        Ok(())
    } else {
        Err(TraceError::AlreadyInstalled)
    }
}

/// The registered instance, if any
#[inline]
pub fn global() -> Option<&'static (dyn Tracer + Sync)> {
    GLOBAL_TRACER.get().copied()
}

#[cfg(test)]
mod tests;
