//! Bounded, interrupt-aware tracing core for small wireless peripherals.
//!
//! Producers format leveled messages into fixed-size slots of a circular
//! queue; a drain engine hands the slots one at a time to an asynchronous
//! serial transport and resumes from the transport's completion callback.
//!
//! Hardware specifics (critical sections, execution-context detection,
//! tick source) are injected through [`arch::Platform`], so the whole core
//! runs unchanged on the host for testing.
#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod config;
pub mod sync;
pub mod trace;
pub mod util;

pub use trace::{
    CallSite, HeaderFlags, Level, Source, TraceConfig, TraceError, TraceStats, TraceSubsystem,
    Tracer, Transport, TxError,
};
