//! One-window view over a line-oriented record source.
//!
//! Only [`MENU_HEIGHT`] records are ever held. Moving past either end of
//! the window re-fetches the neighbouring window from the source:
//!   - forward only when the current window is full (a partial window
//!     means the end of the data);
//!   - an empty forward fetch restores the offset and parks the cursor on
//!     the last line;
//!   - backward re-fetches the previous window, or does nothing on the
//!     first one;
//!   - opening past the end of the data starts over at the first record.

use super::page::Cursor;
use crate::config::MENU_HEIGHT;
use crate::csv::{Record, Window};
use crate::platform::LineSource;

#[derive(Debug, Default)]
pub struct PagedWindow {
    records: Window,
    /// Record number of the first line of the window.
    top: usize,
    loaded: bool,
}

impl PagedWindow {
    pub const fn new() -> Self {
        Self {
            records: Window::new(),
            top: 0,
            loaded: false,
        }
    }

    pub fn records(&self) -> &Window {
        &self.records
    }

    pub fn record(&self, slot: usize) -> Option<&Record> {
        self.records.get(slot)
    }

    pub fn record_mut(&mut self, slot: usize) -> Option<&mut Record> {
        self.records.get_mut(slot)
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Move the window before it is first loaded.
    pub fn set_top(&mut self, top: usize) {
        if !self.loaded {
            self.top = top;
        }
    }

    /// Drop the window so the next `open` reads the source again.
    pub fn invalidate(&mut self) {
        self.loaded = false;
    }

    fn is_full(&self) -> bool {
        self.records.len() == MENU_HEIGHT
    }

    fn fetch<S: LineSource + ?Sized>(source: &mut S, start: usize) -> Window {
        let mut window = Window::new();
        if let Err(e) = source.fetch(start, &mut window) {
            warn!("record fetch at {} failed: {}", start, e);
            window.clear();
        }
        window
    }

    /// Load the window once; later opens reuse it.
    pub fn open<S: LineSource + ?Sized>(&mut self, cursor: &mut Cursor, source: &mut S) {
        if !self.loaded {
            self.records = Self::fetch(source, self.top);
            if self.records.is_empty() && self.top > 0 {
                // The source shrank below the saved offset.
                debug!("no records at {}, back to the start", self.top);
                self.top = 0;
                self.records = Self::fetch(source, 0);
            }
            self.loaded = true;
            debug!("loaded {} records at {}", self.records.len(), self.top);
        }
        cursor.size = self.records.len();
        cursor.settle();
    }

    /// Next window; see the module docs for the boundary rules.
    pub fn page_down<S: LineSource + ?Sized>(&mut self, cursor: &mut Cursor, source: &mut S) {
        if !self.is_full() {
            // Already on the last window.
            cursor.park(cursor.size.saturating_sub(1));
            return;
        }
        let next = Self::fetch(source, self.top + MENU_HEIGHT);
        if next.is_empty() {
            cursor.park(MENU_HEIGHT - 1);
            return;
        }
        self.top += MENU_HEIGHT;
        self.records = next;
        cursor.size = self.records.len();
        cursor.park(0);
    }

    /// Replace the window with the previous one, if there is one.
    fn load_previous<S: LineSource + ?Sized>(&mut self, cursor: &mut Cursor, source: &mut S) -> bool {
        if self.top < MENU_HEIGHT {
            return false;
        }
        let previous = Self::fetch(source, self.top - MENU_HEIGHT);
        if previous.is_empty() {
            return false;
        }
        self.top -= MENU_HEIGHT;
        self.records = previous;
        cursor.size = self.records.len();
        true
    }

    /// ZOOM OUT: first line of this window, or of the previous one when
    /// already there.
    pub fn page_up<S: LineSource + ?Sized>(&mut self, cursor: &mut Cursor, source: &mut S) {
        if cursor.line == 0 {
            self.load_previous(cursor, source);
        }
        cursor.park(0);
    }

    /// UP: move within the window, or continue on the last line of the
    /// previous window.
    pub fn up<S: LineSource + ?Sized>(&mut self, cursor: &mut Cursor, source: &mut S) -> bool {
        if cursor.line != 0 {
            return cursor.up();
        }
        if self.load_previous(cursor, source) {
            cursor.park(MENU_HEIGHT - 1);
            return true;
        }
        false
    }

    /// DOWN: move within the window, page forward from the last line of a
    /// full window, stop on the last record of a partial one.
    pub fn down<S: LineSource + ?Sized>(&mut self, cursor: &mut Cursor, source: &mut S) -> bool {
        if self.is_full() {
            if cursor.line < MENU_HEIGHT - 1 {
                cursor.down()
            } else {
                self.page_down(cursor, source);
                true
            }
        } else if cursor.size > cursor.line + 1 {
            cursor.down()
        } else {
            false
        }
    }
}
