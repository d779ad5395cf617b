//! A fixed-capacity ring buffer of raw command lines.

use thiserror::Error;

/// Number of entries retained by [`History::new`].
pub const DEFAULT_CAPACITY: usize = 100;

/// Errors produced when addressing history entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// The requested index does not fall inside the retained window.
    #[error("invalid index {0}")]
    OutOfRange(usize),
}

/// Bounded command history with overwrite-oldest eviction.
///
/// Entries are raw (untokenized) command lines, stored as recorded. The
/// buffer keeps a monotonically increasing insertion counter; the physical
/// slot for the `i`-th recorded line is `i % capacity`, so once more than
/// `capacity` lines have been recorded the oldest entries are overwritten
/// and become unrecoverable.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    capacity: usize,
    /// Total lines ever recorded; reset only by [`History::clear`].
    inserted: usize,
}

impl History {
    /// Creates a buffer retaining [`DEFAULT_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a buffer retaining at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: Vec::new(),
            capacity,
            inserted: 0,
        }
    }

    /// Appends a raw command line, evicting the oldest entry when full.
    ///
    /// Returns the new value of the insertion counter.
    pub fn record(&mut self, raw: impl Into<String>) -> usize {
        let raw = raw.into();
        let slot = self.inserted % self.capacity;
        if slot == self.entries.len() {
            self.entries.push(raw);
        } else {
            self.entries[slot] = raw;
        }
        self.inserted += 1;
        self.inserted
    }

    /// Number of currently retained entries: `min(inserted, capacity)`.
    pub fn len(&self) -> usize {
        self.inserted.min(self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Looks up a retained entry by the index printed by `history`.
    ///
    /// Before the buffer has ever wrapped, `index` addresses physical slots
    /// directly, so index 0 is the first line ever recorded. Once more than
    /// `capacity` lines have been recorded, `index` is reinterpreted as
    /// `(inserted + index) % capacity`, which walks the retained window
    /// oldest-first. The same numeric index can therefore name different
    /// entries before and after the first wrap. This matches the listing
    /// order of [`History::iter`] and is kept deliberately for
    /// compatibility; see DESIGN.md for the strict-logical-index
    /// alternative.
    pub fn recall(&self, index: usize) -> Result<&str, HistoryError> {
        if index >= self.len() {
            return Err(HistoryError::OutOfRange(index));
        }
        Ok(self.entry_at(index))
    }

    /// Iterates over retained entries oldest-first, paired with the index
    /// accepted by [`History::recall`].
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        (0..self.len()).map(|i| (i, self.entry_at(i)))
    }

    /// Forgets every recorded entry and resets the insertion counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.inserted = 0;
    }

    fn entry_at(&self, offset: usize) -> &str {
        let slot = if self.inserted > self.capacity {
            (self.inserted + offset) % self.capacity
        } else {
            offset
        };
        &self.entries[slot]
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
