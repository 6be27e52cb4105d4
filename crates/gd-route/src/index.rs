//! `InstructionIndex` — locating a live maneuver description in the route.
//!
//! The index owns the instruction sequence of the active route plus a cursor
//! at the instruction currently believed active.  Normalized keys and
//! duration suffix sums are computed once in [`InstructionIndex::load`], so
//! [`locate`](InstructionIndex::locate) costs O(window) and every duration
//! query is O(1).
//!
//! # Cursor movement
//!
//! The cursor moves only on a successful [`locate`](InstructionIndex::locate).
//! It may jump forward by up to `forward + extended - 1` positions, or back by
//! up to `backward` positions; any other move requires a new [`load`].
//!
//! [`load`]: InstructionIndex::load

use crate::instruction::Instruction;
use crate::normalize::normalize_key;

// ── SearchWindows ─────────────────────────────────────────────────────────────

/// Sizes of the three windows searched by [`InstructionIndex::locate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchWindows {
    /// `[cursor, cursor + forward)` — current instruction and the next ones.
    pub forward: usize,
    /// `[cursor + forward, cursor + forward + extended)` — skipped maneuvers.
    pub extended: usize,
    /// `[cursor - backward, cursor)` — late events, searched nearest-first.
    pub backward: usize,
}

impl Default for SearchWindows {
    fn default() -> Self {
        Self { forward: 3, extended: 6, backward: 2 }
    }
}

// ── InstructionIndex ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct InstructionIndex {
    sequence: Vec<Instruction>,
    /// `keys[i] == normalize_key(&sequence[i].text)`.
    keys:     Vec<String>,
    /// `suffix[i]` = sum of durations at indices `>= i`; `len + 1` entries.
    suffix:   Vec<f64>,
    cursor:   usize,
    windows:  SearchWindows,
}

impl Default for InstructionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionIndex {
    /// An empty index using the default search windows.
    pub fn new() -> Self {
        Self::with_windows(SearchWindows::default())
    }

    pub fn with_windows(windows: SearchWindows) -> Self {
        Self {
            sequence: Vec::new(),
            keys:     Vec::new(),
            suffix:   vec![0.0],
            cursor:   0,
            windows,
        }
    }

    /// Replace the sequence and reset the cursor to 0.
    pub fn load(&mut self, instructions: Vec<Instruction>) {
        self.keys = instructions.iter().map(|i| normalize_key(&i.text)).collect();

        let mut suffix = vec![0.0; instructions.len() + 1];
        for i in (0..instructions.len()).rev() {
            suffix[i] = suffix[i + 1] + instructions[i].duration_secs();
        }
        self.suffix = suffix;

        self.sequence = instructions;
        self.cursor = 0;
    }

    /// Drop the sequence.  The index behaves as empty afterwards.
    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Find `description` in the search windows around the cursor.
    ///
    /// Windows are tried in priority order (forward, extended, backward); the
    /// first exact key match becomes the new cursor and is returned.  On a
    /// miss the cursor is left unchanged.  A description whose key is empty
    /// never matches.
    pub fn locate(&mut self, description: &str) -> Option<usize> {
        let key = normalize_key(description);
        if key.is_empty() || self.sequence.is_empty() {
            return None;
        }

        let len = self.sequence.len();
        let c = self.cursor;
        let forward_end = c.saturating_add(self.windows.forward).min(len);
        let extended_end = forward_end.saturating_add(self.windows.extended).min(len);
        let backward_start = c.saturating_sub(self.windows.backward);

        let hit = (c..forward_end)
            .chain(forward_end..extended_end)
            .chain((backward_start..c).rev())
            .find(|&i| self.keys[i] == key)?;

        self.cursor = hit;
        Some(hit)
    }

    /// Time remaining after finishing the maneuver at `from`: the sum of
    /// durations at indices `>= from + 1`.
    #[inline]
    pub fn remaining_duration_from_cursor(&self, from: usize) -> f64 {
        self.duration_from(from.saturating_add(1))
    }

    /// Sum of durations at indices `>= index` (0 past the end).
    #[inline]
    pub fn duration_from(&self, index: usize) -> f64 {
        self.suffix[index.min(self.sequence.len())]
    }

    /// Sum of all segment durations.
    #[inline]
    pub fn total_duration(&self) -> f64 {
        self.suffix[0]
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The instruction at the cursor, or `None` if the index is empty.
    pub fn current(&self) -> Option<&Instruction> {
        self.sequence.get(self.cursor)
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.sequence.get(index)
    }

    pub fn windows(&self) -> SearchWindows {
        self.windows
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.sequence
    }
}
