//! Trace subsystem core
//!
//! This module gathers the whole tracing state (level store, message queue,
//! drain engine, sequence counter) into a single [`TraceSubsystem`] value
//! that can be instantiated independently for testing, or placed in a
//! `static` and registered with [`install`](super::install) in production.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::config::{HEX_BYTES_PER_LINE, QUEUE_LEN, TraceConfig};
use super::drain::{DrainEngine, DrainState};
use super::format::{self, CallSite, Header};
use super::level::Level;
use super::level_store::LevelStore;
use super::queue::CircularQueue;
use super::slot::MessageSlot;
use super::source::Source;
use super::transport::Transport;
use crate::arch::Platform;
use crate::config::CONTEXT_MASK;
use crate::sync::without_interrupts;
use crate::util::build_hex;

/// Point-in-time diagnostics of a [`TraceSubsystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceStats {
    /// Messages waiting for transmission, in-flight one included
    pub available: usize,
    /// Messages that can still be queued
    pub free: usize,
    /// Current sequence counter (accepted plus dropped messages, wrapping)
    pub sequence: u8,
    /// Writes the transport refused; those messages were skipped
    pub transport_failures: u32,
    /// State of the drain engine
    pub drain: DrainState,
}

/// Core tracing system
///
/// Producers (task context) format messages straight into queue slots;
/// the transport completion (interrupt context) releases them. All state is
/// atomics or guarded by the queue's masked critical sections, so the value
/// is shared by reference.
///
/// # Sequence counter
///
/// An 8-bit wrapping counter bumped by every message that reaches the queue
/// stage, whether it is stored or dropped (queue full, interrupt context).
/// Its value at header-build time is embedded in each message, so gaps hint
/// at lost messages. Filtered messages do not touch it.
pub struct TraceSubsystem<P: Platform, T: Transport> {
    config: TraceConfig,
    levels: LevelStore,
    queue: CircularQueue<QUEUE_LEN>,
    drain: DrainEngine,
    sequence: AtomicU8,
    initialized: AtomicBool,
    platform: P,
    transport: T,
}

impl<P: Platform, T: Transport> TraceSubsystem<P, T> {
    /// Creates an uninitialized instance; every source is disabled and all
    /// entry points return 0 until [`init`](Self::init) is called.
    pub const fn new(config: TraceConfig, platform: P, transport: T) -> Self {
        Self {
            config,
            levels: LevelStore::new(),
            queue: CircularQueue::new(),
            drain: DrainEngine::new(),
            sequence: AtomicU8::new(0),
            initialized: AtomicBool::new(false),
            platform,
            transport,
        }
    }

    /// One-time setup, from task context with no transmission in flight
    ///
    /// 1. Disables every source and empties the queue
    /// 2. Marks the subsystem ready and emits the start-up banner
    /// 3. Applies the configured default level of each source
    pub fn init(&self) {
        self.levels.reset();
        without_interrupts(&self.platform, || {
            self.queue.reset();
            self.drain.reset();
        });
        self.initialized.store(true, Ordering::Release);

        if self.config.banner {
            let site = CallSite::new("trace", line!(), Some("init"));
            self.emit(
                b"\n",
                Some(&site),
                Some(Stamp::Fixed(0)),
                None,
                format_args!("tick: {} Hz\n", self.config.tick_hz),
            );
        }

        self.levels
            .load(LevelStore::pack(&self.config.default_levels));
    }

    /// Whether [`init`](Self::init) ran
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Configuration the instance was built with
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Injected platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Injected transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sets the level of `source`; ignored for unknown sources and `Func`
    pub fn set_level(&self, source: Source, level: Level) {
        self.levels.set_level(source, level);
    }

    /// Level of `source`, `None` while it is disabled
    pub fn get_level(&self, source: Source) -> Option<Level> {
        self.levels.get_level(source)
    }

    /// Whether a `level` message of `source` would be emitted
    #[inline]
    pub fn is_traceable(&self, source: Source, level: Level) -> bool {
        self.is_initialized() && self.levels.passes(source, level)
    }

    /// Whether function enter/leave messages of `source` are emitted; they
    /// follow the most verbose level.
    #[inline]
    pub fn is_func_traceable(&self, source: Source) -> bool {
        self.is_traceable(source, Level::Chatty)
    }

    /// Whether the caller runs from an interrupt handler
    pub fn is_interrupt_context(&self) -> bool {
        self.platform.is_interrupt_context()
    }

    /// Formats and queues a leveled message
    ///
    /// `site` adds the location and function header segments; without it
    /// the message is short (time, sequence and context only).
    ///
    /// Returns the bytes stored in the slot, truncation included, or 0 when
    /// the message was filtered, emitted from interrupt context, or the
    /// queue was full.
    pub fn printf_leveled(
        &self,
        level: Level,
        source: Source,
        site: Option<&CallSite<'_>>,
        args: fmt::Arguments<'_>,
    ) -> usize {
        if !self.is_traceable(source, level) {
            return 0;
        }
        self.emit(b"", site, Some(Stamp::Live), Some(level), args)
    }

    /// Queues raw bytes, no header, no marker. Input beyond one slot is
    /// silently cut. Returns the stored length.
    pub fn print(&self, bytes: &[u8]) -> usize {
        if !self.admit() {
            return 0;
        }
        match self.queue.produce(&self.platform, |slot| slot.fill(bytes)) {
            Ok(length) => self.commit(length),
            Err(_) => self.reject(),
        }
    }

    /// Formats and queues a raw message, no header, no marker
    pub fn printf(&self, args: fmt::Arguments<'_>) -> usize {
        self.emit(b"", None, None, None, args)
    }

    /// Dumps `data` as hex lines of [`HEX_BYTES_PER_LINE`] bytes, each a
    /// short leveled message. Returns the total bytes queued.
    pub fn trace_hex(&self, level: Level, source: Source, data: &[u8]) -> usize {
        if !self.is_traceable(source, level) {
            return 0;
        }
        let mut total = 0;
        for chunk in data.chunks(HEX_BYTES_PER_LINE) {
            let mut line = [0u8; 3 * HEX_BYTES_PER_LINE + 1];
            // drop the terminator
            let length = build_hex(&mut line, chunk).saturating_sub(1);
            let text = core::str::from_utf8(&line[..length]).unwrap_or("");
            total += self.emit(b"", None, Some(Stamp::Live), Some(level), format_args!("{}\n", text));
        }
        total
    }

    /// Last-resort output before a reset
    ///
    /// Discards the queued messages, stops the drain engine for good and
    /// writes `message` synchronously, bypassing the queue. Later messages
    /// are still queued but never sent.
    pub fn fatal(&self, message: &[u8]) {
        self.queue.flush(&self.platform);
        self.drain.halt();
        self.transport.write_blocking(message);
    }

    /// Completion notification of the transport, from its completion
    /// context (typically the UART/DMA interrupt)
    pub fn on_write_complete(&self) {
        self.drain
            .complete(&self.queue, &self.platform, &self.transport);
    }

    /// Discards every queued message that is not in flight
    ///
    /// The in-flight slot stays owned by the transport until its completion.
    pub fn flush(&self) {
        let keep = usize::from(self.drain.state().is_active());
        self.queue.truncate(&self.platform, keep);
    }

    /// Diagnostics snapshot
    pub fn stats(&self) -> TraceStats {
        TraceStats {
            available: self.queue.available_count(),
            free: self.queue.free_count(),
            sequence: self.sequence.load(Ordering::Relaxed),
            transport_failures: self.drain.transport_failures(),
            drain: self.drain.state(),
        }
    }

    /// Copy of the oldest queued message; meant for inspection in tests and
    /// debuggers
    pub fn peek(&self) -> Option<MessageSlot> {
        self.queue.front(&self.platform).map(|(_, slot)| slot)
    }

    // ========== Internal helpers ==========

    /// Shared producer path for formatted messages; no header when `stamp`
    /// is `None`
    fn emit(
        &self,
        lead: &[u8],
        site: Option<&CallSite<'_>>,
        stamp: Option<Stamp>,
        level: Option<Level>,
        args: fmt::Arguments<'_>,
    ) -> usize {
        if !self.admit() {
            return 0;
        }
        let header = stamp.map(|stamp| Header {
            flags: self.config.header,
            timestamp: match stamp {
                Stamp::Live => self.platform.ticks(),
                Stamp::Fixed(ticks) => ticks,
            },
            sequence: self.sequence.load(Ordering::Relaxed),
            context: self.platform.context_id() & CONTEXT_MASK,
            site,
        });
        let header = header.as_ref();
        match self.queue.produce(&self.platform, |slot| {
            format::format_into(slot, lead, header, level, args)
        }) {
            Ok(length) => self.commit(length),
            Err(_) => self.reject(),
        }
    }

    /// Initialized and in task context; interrupt-context producers are
    /// counted and dropped
    fn admit(&self) -> bool {
        if !self.is_initialized() {
            return false;
        }
        if self.platform.is_interrupt_context() {
            self.reject();
            return false;
        }
        true
    }

    fn commit(&self, length: usize) -> usize {
        self.bump_sequence();
        self.drain.kick(&self.queue, &self.platform, &self.transport);
        length
    }

    fn reject(&self) -> usize {
        self.bump_sequence();
        0
    }

    #[inline]
    fn bump_sequence(&self) {
        self.sequence.fetch_add(1, Ordering::Relaxed);
    }
}

/// Tick value written into a message header
#[derive(Clone, Copy)]
enum Stamp {
    /// Current platform tick
    Live,
    /// Fixed value, used by the start-up banner
    Fixed(u32),
}

/// Object-safe view of a [`TraceSubsystem`], used by the global instance
/// and the tracing macros
pub trait Tracer {
    /// See [`TraceSubsystem::is_traceable`]
    fn is_traceable(&self, source: Source, level: Level) -> bool;
    /// See [`TraceSubsystem::is_func_traceable`]
    fn is_func_traceable(&self, source: Source) -> bool;
    /// See [`TraceSubsystem::printf_leveled`]
    fn printf_leveled(
        &self,
        level: Level,
        source: Source,
        site: Option<&CallSite<'_>>,
        args: fmt::Arguments<'_>,
    ) -> usize;
    /// See [`TraceSubsystem::print`]
    fn print(&self, bytes: &[u8]) -> usize;
    /// See [`TraceSubsystem::printf`]
    fn printf(&self, args: fmt::Arguments<'_>) -> usize;
    /// See [`TraceSubsystem::trace_hex`]
    fn trace_hex(&self, level: Level, source: Source, data: &[u8]) -> usize;
    /// See [`TraceSubsystem::fatal`]
    fn fatal(&self, message: &[u8]);
    /// See [`TraceSubsystem::on_write_complete`]
    fn on_write_complete(&self);
}

impl<P: Platform, T: Transport> Tracer for TraceSubsystem<P, T> {
    fn is_traceable(&self, source: Source, level: Level) -> bool {
        TraceSubsystem::is_traceable(self, source, level)
    }

    fn is_func_traceable(&self, source: Source) -> bool {
        TraceSubsystem::is_func_traceable(self, source)
    }

    fn printf_leveled(
        &self,
        level: Level,
        source: Source,
        site: Option<&CallSite<'_>>,
        args: fmt::Arguments<'_>,
    ) -> usize {
        TraceSubsystem::printf_leveled(self, level, source, site, args)
    }

    fn print(&self, bytes: &[u8]) -> usize {
        TraceSubsystem::print(self, bytes)
    }

    fn printf(&self, args: fmt::Arguments<'_>) -> usize {
        TraceSubsystem::printf(self, args)
    }

    fn trace_hex(&self, level: Level, source: Source, data: &[u8]) -> usize {
        TraceSubsystem::trace_hex(self, level, source, data)
    }

    fn fatal(&self, message: &[u8]) {
        TraceSubsystem::fatal(self, message)
    }

    fn on_write_complete(&self) {
        TraceSubsystem::on_write_complete(self)
    }
}
