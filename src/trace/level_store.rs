//! Per-source verbosity levels
//!
//! Each source owns a [`LEVEL_BITS`]-wide field of a small word array. A
//! field holding a value above every level (all ones after a reset) means
//! the source is fully disabled, `Fatal` included.
//!
//! Levels change rarely and only from a trusted control path, so the words
//! are plain atomics with no further locking.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU32, Ordering};

use super::config::{LEVEL_BITS, LEVEL_WORDS, SOURCE_COUNT};
use super::level::Level;
use super::source::Source;
use crate::util::bitfield::{self, FieldPos};

/// Raw field value of a source whose traces are all disabled
pub const DISABLED: u8 = (1 << LEVEL_BITS) - 1;

/// Bit-packed level of every trace source
pub struct LevelStore {
    words: [AtomicU32; LEVEL_WORDS],
}

impl LevelStore {
    /// A store with every source disabled
    pub const fn new() -> Self {
        Self {
            words: [const { AtomicU32::new(u32::MAX) }; LEVEL_WORDS],
        }
    }

    /// Disables every source
    pub fn reset(&self) {
        for word in &self.words {
            word.store(u32::MAX, Ordering::Release);
        }
    }

    /// Sets the level of `source`
    ///
    /// Silently ignored if the source does not exist or `level` is not a
    /// filtering level (`Func`).
    pub fn set_level(&self, source: Source, level: Level) {
        if !source.is_valid() || !level.is_threshold() {
            return;
        }
        self.store_raw(source, level as u8);
    }

    /// Disables every message of `source`
    pub fn disable(&self, source: Source) {
        if source.is_valid() {
            self.store_raw(source, DISABLED);
        }
    }

    /// Raw packed value of `source`; [`DISABLED`] for unknown sources
    pub fn get_raw(&self, source: Source) -> u8 {
        if !source.is_valid() {
            return DISABLED;
        }
        let pos = Self::locate(source);
        pos.extract(self.words[pos.word].load(Ordering::Acquire)) as u8
    }

    /// Level of `source`, `None` while the source is disabled
    pub fn get_level(&self, source: Source) -> Option<Level> {
        Level::from_u8(self.get_raw(source)).filter(|l| l.is_threshold())
    }

    /// Whether a `level` message of `source` passes the filter
    #[inline]
    pub fn passes(&self, source: Source, level: Level) -> bool {
        source.is_valid() && level as u8 >= self.get_raw(source)
    }

    /// Packs a per-source level table into store words; `None` (and `Func`)
    /// leave the source disabled
    pub fn pack(levels: &[Option<Level>; SOURCE_COUNT]) -> [u32; LEVEL_WORDS] {
        let mut words = [u32::MAX; LEVEL_WORDS];
        for (source, level) in Source::all().zip(levels) {
            if let Some(level) = level.filter(|l| l.is_threshold()) {
                bitfield::set_field(&mut words, source.index(), LEVEL_BITS, level as u32);
            }
        }
        words
    }

    /// Replaces every level at once
    pub fn load(&self, words: [u32; LEVEL_WORDS]) {
        for (slot, word) in self.words.iter().zip(words) {
            slot.store(word, Ordering::Release);
        }
    }

    /// Copy of the packed words
    pub fn snapshot(&self) -> [u32; LEVEL_WORDS] {
        core::array::from_fn(|i| self.words[i].load(Ordering::Acquire))
    }

    #[inline]
    fn locate(source: Source) -> FieldPos {
        bitfield::locate(source.index(), LEVEL_BITS)
    }

    fn store_raw(&self, source: Source, raw: u8) {
        let pos = Self::locate(source);
        // single writer by contract; fetch_update keeps neighbours intact anyway
        let _ = self.words[pos.word].fetch_update(Ordering::AcqRel, Ordering::Acquire, |w| {
            Some(pos.insert(w, raw as u32))
        });
    }
}

/// One marker per source, `.` for a disabled one: `DDC.............`
impl fmt::Debug for LevelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = self.snapshot();
        f.write_str("LevelStore(")?;
        for source in Source::all() {
            let marker = bitfield::get_field(&words, source.index(), LEVEL_BITS)
                .and_then(|raw| Level::from_u8(raw as u8))
                .and_then(Level::marker)
                .unwrap_or(Level::off_marker());
            f.write_char(marker as char)?;
        }
        f.write_str(")")
    }
}

impl Default for LevelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_disables_everything() {
        let store = LevelStore::new();
        for source in Source::all() {
            assert_eq!(store.get_level(source), None);
            assert!(!store.passes(source, Level::Fatal));
            assert!(!store.passes(source, Level::Func));
        }
    }

    #[test]
    fn test_threshold_per_source() {
        for source in Source::all() {
            for level in Level::ALL {
                let store = LevelStore::new();
                store.set_level(source, level);
                assert_eq!(store.get_level(source), Some(level));
                assert!(store.passes(source, level));
                if level > Level::Chatty {
                    let below = Level::from_u8(level as u8 - 1).unwrap();
                    assert!(!store.passes(source, below));
                }
                for other in Source::all().filter(|s| *s != source) {
                    assert_eq!(store.get_level(other), None);
                }
            }
        }
    }

    #[test]
    fn test_neighbours_keep_their_levels() {
        let store = LevelStore::new();
        for source in Source::all() {
            store.set_level(source, Level::ALL[source.index() % Level::COUNT]);
        }
        store.set_level(Source::new(9), Level::Fatal);
        for source in Source::all() {
            let expected = if source.index() == 9 {
                Level::Fatal
            } else {
                Level::ALL[source.index() % Level::COUNT]
            };
            assert_eq!(store.get_level(source), Some(expected));
        }
    }

    #[test]
    fn test_invalid_requests_ignored() {
        let store = LevelStore::new();
        store.set_level(Source::new(SOURCE_COUNT as u8), Level::Chatty);
        store.set_level(Source::MAIN, Level::Func);
        assert_eq!(store.get_level(Source::MAIN), None);
        assert!(!store.passes(Source::new(200), Level::Fatal));
        assert_eq!(store.get_raw(Source::new(200)), DISABLED);
    }

    #[test]
    fn test_pack_and_load() {
        let mut table = [None; SOURCE_COUNT];
        table[0] = Some(Level::Debug);
        table[9] = Some(Level::Fatal);
        table[31] = Some(Level::Chatty);
        table[4] = Some(Level::Func);
        let words = LevelStore::pack(&table);

        let store = LevelStore::new();
        store.set_level(Source::new(5), Level::Info);
        store.load(words);
        assert_eq!(store.snapshot(), words);
        for source in Source::all() {
            let expected = table[source.index()].filter(|l| l.is_threshold());
            assert_eq!(store.get_level(source), expected);
        }
    }

    #[test]
    fn test_debug_shows_markers() {
        let store = LevelStore::new();
        store.set_level(Source::MAIN, Level::Debug);
        store.set_level(Source::BLE, Level::Chatty);
        let text = format!("{:?}", store);
        assert!(text.starts_with("LevelStore(D.C...."));
        assert_eq!(text.len(), "LevelStore()".len() + SOURCE_COUNT);
    }

    #[test]
    fn test_disable_and_func() {
        let store = LevelStore::new();
        store.set_level(Source::BLE, Level::Chatty);
        assert!(store.passes(Source::BLE, Level::Func));
        store.disable(Source::BLE);
        assert!(!store.passes(Source::BLE, Level::Fatal));
    }
}
