use super::config::SLOT_CAPACITY;
use core::cmp::min;
use core::fmt::{self, Write};

/// One fixed-capacity message buffer of the queue
#[repr(C, align(4))]
#[derive(Clone)]
pub struct MessageSlot {
    bytes: [u8; SLOT_CAPACITY],
    length: u8,
}

impl MessageSlot {
    /// An empty slot
    pub const fn empty() -> Self {
        Self {
            bytes: [0; SLOT_CAPACITY],
            length: 0,
        }
    }

    /// Stored message
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// Length of the stored message
    pub fn len(&self) -> usize {
        self.length as usize
    }

    /// Whether the slot holds no byte
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Copies up to [`SLOT_CAPACITY`] bytes of `data`, silently dropping the rest.
    /// Returns the stored length.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let length = min(data.len(), SLOT_CAPACITY);
        self.bytes[..length].copy_from_slice(&data[..length]);
        self.length = length as u8;
        length
    }

    /// Whole backing buffer, for in-place formatting
    pub(super) fn buffer_mut(&mut self) -> &mut [u8; SLOT_CAPACITY] {
        &mut self.bytes
    }

    /// Records how many bytes of the buffer are meaningful
    pub(super) fn set_len(&mut self, length: usize) {
        self.length = min(length, SLOT_CAPACITY) as u8;
    }
}

impl fmt::Debug for MessageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageSlot")
            .field("length", &self.length)
            .field("text", &core::str::from_utf8(self.as_bytes()).unwrap_or("<binary>"))
            .finish()
    }
}

/// a helper to format into a slot buffer the way `snprintf` does
///
/// Bytes past the end of the buffer are dropped, but still counted, so the
/// caller can tell that the output was cut.
pub(super) struct SlotWriter<'a> {
    buffer: &'a mut [u8],
    pos: usize,
    requested: usize,
}

impl<'a> SlotWriter<'a> {
    pub(super) fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            pos: 0,
            requested: 0,
        }
    }

    /// Bytes actually written
    pub(super) fn len(&self) -> usize {
        self.pos
    }

    /// Bytes the output would take without truncation
    pub(super) fn requested(&self) -> usize {
        self.requested
    }

    pub(super) fn push_bytes(&mut self, bytes: &[u8]) {
        let remaining = self.buffer.get_mut(self.pos..).unwrap_or(&mut []);
        let to_copy = min(bytes.len(), remaining.len());

        remaining[..to_copy].copy_from_slice(&bytes[..to_copy]);
        self.pos += to_copy;
        self.requested += bytes.len();
    }
}

impl Write for SlotWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}
