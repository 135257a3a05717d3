//! `log` facade bridge
//!
//! Routes records of the `log` crate (typically from third-party drivers)
//! into the trace queue, on the source configured as
//! [`TraceConfig::log_source`](super::TraceConfig::log_source). The record
//! target becomes the location tag.

use log::{Metadata, Record};

use super::format::CallSite;
use super::level::Level;
use super::trace_core::TraceSubsystem;
use super::transport::Transport;
use super::TraceError;
use crate::arch::Platform;

impl<P, T> log::Log for TraceSubsystem<P, T>
where
    P: Platform + Send + Sync,
    T: Transport + Send + Sync,
{
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.is_traceable(self.config().log_source, metadata.level().into())
    }

    fn log(&self, record: &Record<'_>) {
        let level: Level = record.level().into();
        let site = CallSite::new(record.target(), record.line().unwrap_or(0), None);
        self.printf_leveled(
            level,
            self.config().log_source,
            Some(&site),
            format_args!("{}\n", record.args()),
        );
    }

    fn flush(&self) {}
}

/// Registers `logger` as the `log` facade backend and opens the facade's
/// own filter completely; filtering is left to the level store.
pub fn install_log_bridge(logger: &'static dyn log::Log) -> Result<(), TraceError> {
    log::set_logger(logger).map_err(|_| TraceError::AlreadyInstalled)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
