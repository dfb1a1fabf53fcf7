//! GUI modes and the event mode selector.
//!
//! The vendor firmware exposes only its own dialog ("GUI mode"). Several
//! add-on contexts reuse the same buttons without the firmware knowing
//! about them, so on every button-down we reconstruct the logical mode
//! from a handful of flags:
//!
//! 1. display off + face sensor asserted  → [`Mode::Face`]
//! 2. add-on menu running                 → [`Mode::Menu`]
//! 3. a shortcut is running               → [`Mode::Shortcut`]
//! 4. otherwise                           → the firmware's own GUI mode

/// Dialog currently shown by the vendor firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuiMode {
    /// Display switched off.
    Off,
    /// Main shooting-information dialog.
    Olc,
    Meter,
    Wb,
    Iso,
    AfPattern,
    Drive,
    Quality,
    /// Any other firmware dialog without add-on bindings.
    Other,
}

/// Shortcut assigned to the JUMP / TRASH / DISP keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shortcut {
    #[default]
    None,
    Iso,
    Script,
    Mlu,
    Aeb,
    HackMenu,
    Flash,
    Display,
    AfCfg,
}

impl Shortcut {
    pub const COUNT: usize = 9;

    /// Decode a persisted shortcut id; unknown ids map to `None`.
    pub const fn from_id(id: i32) -> Self {
        match id {
            1 => Shortcut::Iso,
            2 => Shortcut::Script,
            3 => Shortcut::Mlu,
            4 => Shortcut::Aeb,
            5 => Shortcut::HackMenu,
            6 => Shortcut::Flash,
            7 => Shortcut::Display,
            8 => Shortcut::AfCfg,
            _ => Shortcut::None,
        }
    }

    pub const fn id(self) -> i32 {
        self as i32
    }
}

/// Logical mode used to pick a reaction chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Gui(GuiMode),
    /// Display shut down by the viewfinder face sensor.
    Face,
    /// Add-on menu is open.
    Menu,
    /// A shortcut key is being held.
    Shortcut,
}

/// Ambient state read from the vendor firmware at button time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ambient {
    pub gui_mode: GuiMode,
    pub face_sensor: bool,
}

impl Ambient {
    pub const fn new(gui_mode: GuiMode) -> Self {
        Self {
            gui_mode,
            face_sensor: false,
        }
    }

    pub const fn display_off(&self) -> bool {
        matches!(self.gui_mode, GuiMode::Off)
    }
}

/// Derive the logical mode for a button-down event.
pub fn select_mode(ambient: &Ambient, menu_running: bool, shortcut: Shortcut) -> Mode {
    if ambient.display_off() && ambient.face_sensor {
        Mode::Face
    } else if menu_running {
        Mode::Menu
    } else if shortcut != Shortcut::None {
        Mode::Shortcut
    } else {
        Mode::Gui(ambient.gui_mode)
    }
}
