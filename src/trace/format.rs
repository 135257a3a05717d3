//! Message formatting
//!
//! A message is built in place, directly inside the queue slot it will be
//! sent from:
//!
//! ```text
//! [^tick ][:seq ][{ctx} ][component[line] ][function() ][L ]body
//! ```
//!
//! Oversized messages are cut at [`SLOT_CAPACITY`] and end with
//! [`TRUNCATION_MARKER`], so a truncated line is still newline-terminated
//! and visibly different from a complete one.

use core::fmt::{self, Write};

use super::config::{HeaderFlags, SLOT_CAPACITY};
use super::level::Level;
use super::slot::{MessageSlot, SlotWriter};

/// Tail of every truncated message: ellipsis, end of line, terminator
pub const TRUNCATION_MARKER: &[u8; 5] = b"...\n\0";

/// Where a message comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Component (module) name
    pub component: &'a str,
    /// Source line
    pub line: u32,
    /// Emitting function, if known
    pub function: Option<&'a str>,
}

impl<'a> CallSite<'a> {
    /// Describes a call site
    pub const fn new(component: &'a str, line: u32, function: Option<&'a str>) -> Self {
        Self {
            component,
            line,
            function,
        }
    }
}

/// Values captured when a message header is built
#[derive(Debug, Clone, Copy)]
pub(super) struct Header<'a> {
    pub(super) flags: HeaderFlags,
    pub(super) timestamp: u32,
    /// sequence counter value, read, not incremented, by the header build
    pub(super) sequence: u8,
    pub(super) context: u32,
    pub(super) site: Option<&'a CallSite<'a>>,
}

impl Header<'_> {
    fn write_to(&self, w: &mut SlotWriter<'_>) -> fmt::Result {
        if self.flags.contains(HeaderFlags::TIMESTAMP) {
            write!(w, "^{:08x} ", self.timestamp)?;
        }
        if self.flags.contains(HeaderFlags::SEQUENCE) {
            write!(w, ":{:02x} ", self.sequence)?;
        }
        if self.flags.contains(HeaderFlags::CONTEXT) {
            write!(w, "{{{:02x}}} ", self.context)?;
        }
        if let Some(site) = self.site {
            if self.flags.contains(HeaderFlags::LOCATION) {
                write!(w, "{}[{}] ", site.component, site.line)?;
            }
            if let (true, Some(function)) =
                (self.flags.contains(HeaderFlags::FUNCTION), site.function)
            {
                write!(w, "{}() ", function)?;
            }
        }
        Ok(())
    }
}

/// Builds a message into `slot` and returns its final length.
///
/// * `lead` - raw bytes emitted before anything else
/// * `header` - header segments, `None` for raw output
/// * `level` - adds the level marker when it is a filtering level
/// * `args` - caller-supplied body
pub(super) fn format_into(
    slot: &mut MessageSlot,
    lead: &[u8],
    header: Option<&Header<'_>>,
    level: Option<Level>,
    args: fmt::Arguments<'_>,
) -> usize {
    let (written, requested) = {
        let mut w = SlotWriter::new(slot.buffer_mut());
        w.push_bytes(lead);
        if let Some(header) = header {
            let _ = header.write_to(&mut w);
        }
        if let Some(marker) = level.and_then(Level::marker) {
            // only when the header left room for it
            if w.len() < SLOT_CAPACITY - 2 {
                w.push_bytes(&[marker, b' ']);
            }
        }
        let _ = fmt::write(&mut w, args);
        (w.len(), w.requested())
    };

    if requested > SLOT_CAPACITY {
        slot.buffer_mut()[SLOT_CAPACITY - TRUNCATION_MARKER.len()..]
            .copy_from_slice(TRUNCATION_MARKER);
        slot.set_len(SLOT_CAPACITY);
    } else {
        slot.set_len(written);
    }
    slot.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(flags: HeaderFlags, site: Option<&'a CallSite<'a>>) -> Header<'a> {
        Header {
            flags,
            timestamp: 0x1234,
            sequence: 0x0b,
            context: 0x11,
            site,
        }
    }

    fn text(slot: &MessageSlot) -> &str {
        core::str::from_utf8(slot.as_bytes()).unwrap()
    }

    #[test]
    fn test_full_header_order() {
        let site = CallSite::new("radio", 42, Some("connect"));
        let mut slot = MessageSlot::empty();
        let h = header(HeaderFlags::all(), Some(&site));
        format_into(&mut slot, b"", Some(&h), Some(Level::Warn), format_args!("rssi {}\n", -70));
        assert_eq!(text(&slot), "^00001234 :0b {11} radio[42] connect() W rssi -70\n");
    }

    #[test]
    fn test_segments_toggle() {
        let site = CallSite::new("radio", 7, None);
        let mut slot = MessageSlot::empty();
        let h = header(HeaderFlags::SEQUENCE | HeaderFlags::LOCATION, Some(&site));
        format_into(&mut slot, b"", Some(&h), Some(Level::Info), format_args!("up"));
        assert_eq!(text(&slot), ":0b radio[7] I up");

        let h = header(HeaderFlags::empty(), Some(&site));
        format_into(&mut slot, b"", Some(&h), Some(Level::Chatty), format_args!("x"));
        assert_eq!(text(&slot), "C x");
    }

    #[test]
    fn test_func_has_no_marker() {
        let mut slot = MessageSlot::empty();
        let h = header(HeaderFlags::empty(), None);
        format_into(&mut slot, b"", Some(&h), Some(Level::Func), format_args!("> enter\n"));
        assert_eq!(text(&slot), "> enter\n");
    }

    #[test]
    fn test_raw_with_lead() {
        let mut slot = MessageSlot::empty();
        format_into(&mut slot, b"\n", None, None, format_args!("tick: {} Hz\n", 32768));
        assert_eq!(text(&slot), "\ntick: 32768 Hz\n");
    }

    #[test]
    fn test_exact_capacity_not_truncated() {
        let body = [b'a'; SLOT_CAPACITY];
        let body = core::str::from_utf8(&body).unwrap();
        let mut slot = MessageSlot::empty();
        let n = format_into(&mut slot, b"", None, None, format_args!("{}", body));
        assert_eq!(n, SLOT_CAPACITY);
        assert!(slot.as_bytes().iter().all(|b| *b == b'a'));
    }

    #[test]
    fn test_truncation_marker() {
        let site = CallSite::new("main", 1, Some("run"));
        let h = header(HeaderFlags::all(), Some(&site));
        let mut slot = MessageSlot::empty();
        let n = format_into(
            &mut slot,
            b"",
            Some(&h),
            Some(Level::Error),
            format_args!("{:0200}\n", 7),
        );
        assert_eq!(n, SLOT_CAPACITY);
        assert!(slot.as_bytes().ends_with(TRUNCATION_MARKER));
        assert!(slot.as_bytes().starts_with(b"^00001234 "));
    }

    #[test]
    fn test_marker_skipped_when_header_fills_slot() {
        let long = [b'c'; SLOT_CAPACITY - 3];
        let site = CallSite::new(core::str::from_utf8(&long).unwrap(), 1, None);
        let h = header(HeaderFlags::LOCATION, Some(&site));
        let mut slot = MessageSlot::empty();
        let n = format_into(&mut slot, b"", Some(&h), Some(Level::Info), format_args!(""));
        assert_eq!(n, SLOT_CAPACITY);
        assert!(slot.as_bytes().ends_with(TRUNCATION_MARKER));
        assert!(!slot.as_bytes().contains(&b'I'));
    }
}
