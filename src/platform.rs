//! Contracts for everything outside the dispatch and menu core.
//!
//! The vendor firmware, the LCD, the beeper and the memory card are all
//! reached through these traits. A target build implements them on top of
//! the firmware's event procedures; host tests implement them with
//! recording mocks.

use crate::action::{Action, HostAction};
use crate::config::{MENU_ORDER_FILENAME, NAMED_TEMPS_FILENAME, SETTINGS_FILENAME};
use crate::csv::Window;
use crate::error::{Error, Result};
use crate::mode::GuiMode;
use crate::pattern::{AfPattern, Orientation};

/// Intercom commands understood by the vendor firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetAfPoint,
    SetWb,
    SetColorTemp,
}

/// White balance mode selecting a manual colour temperature.
pub const WB_MODE_COLOR_TEMP: i32 = 8;

/// Palette of the firmware menu dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Red,
    Blue,
    Yellow,
    DarkBlue,
    DarkRed,
    WhiteOnBlack,
}

impl Color {
    /// Raw palette id of the firmware dialog.
    pub const fn id(self) -> u8 {
        match self {
            Color::Red => 0x00,
            Color::Blue => 0x01,
            Color::Yellow => 0x02,
            Color::DarkBlue => 0x09,
            Color::DarkRed => 0x0C,
            Color::WhiteOnBlack => 0x12,
        }
    }
}

/// Files kept on the memory card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FileId {
    Settings,
    MenuOrder,
    NamedTemps,
}

impl FileId {
    pub const fn name(self) -> &'static str {
        match self {
            FileId::Settings => SETTINGS_FILENAME,
            FileId::MenuOrder => MENU_ORDER_FILENAME,
            FileId::NamedTemps => NAMED_TEMPS_FILENAME,
        }
    }
}

/// FIFO of deferred actions, drained by the main loop.
pub trait ActionQueue {
    /// Append an action; `false` if it was dropped.
    fn enqueue(&self, action: Action) -> bool;
}

/// Fire-and-forget command sink into the vendor firmware.
pub trait Intercom {
    fn send(&mut self, command: Command, value: i32);
}

/// Menu dialog on the LCD.
pub trait Display {
    fn open(&mut self, color: Color);
    fn set_title(&mut self, title: &str);
    fn set_line(&mut self, line: usize, text: &str);
    fn highlight(&mut self, line: usize);
    fn refresh(&mut self);
    fn close(&mut self);
}

/// Line-oriented record source backing dynamically paged menus.
pub trait LineSource {
    /// Replace `window` with up to its capacity of records starting at
    /// record `start` (comment lines are not counted). Fewer records mean
    /// the end of the data.
    fn fetch(&mut self, start: usize, window: &mut Window) -> Result<()>;
}

/// File access to the memory card.
pub trait Storage {
    /// Read up to `buf.len()` bytes of a file starting at byte `offset`.
    /// Returns the number of bytes read, 0 past the end of the file.
    fn read_at(&mut self, file: FileId, offset: usize, buf: &mut [u8]) -> Result<usize>;

    /// Read a whole file into `buf`, returning its length. Fails with
    /// [`Error::BufferOverflow`] if the file is larger than `buf`.
    fn read(&mut self, file: FileId, buf: &mut [u8]) -> Result<usize> {
        let len = self.read_at(file, 0, buf)?;
        if len == buf.len() && self.read_at(file, len, &mut [0u8; 1])? != 0 {
            return Err(Error::BufferOverflow);
        }
        Ok(len)
    }

    /// Replace the content of a file.
    fn write(&mut self, file: FileId, data: &[u8]) -> Result<()>;
    fn remove(&mut self, file: FileId) -> Result<()>;
}

/// Camera state read at action time.
pub trait Camera {
    fn gui_mode(&self) -> GuiMode;
    fn af_point(&self) -> AfPattern;
    fn orientation(&self) -> Orientation;
}

/// Everything an action may touch.
pub trait Platform: ActionQueue + Intercom + Display + LineSource + Storage + Camera {
    fn beep(&mut self);
    /// Run a leaf operation implemented outside the core.
    fn perform(&mut self, action: HostAction);
}
