//! Deferred actions and the FIFO that carries them to the main loop.
//!
//! The button path never executes work itself: it resolves a button to an
//! [`Action`] and pushes it here. The main loop drains the queue and hands
//! every action to [`crate::controller::InputController::execute`].

use crate::config::ACTION_QUEUE_DEPTH;
use crate::error::{Error, Result};
use crate::menu::MenuEvent;
use crate::pattern::Direction;
use crate::platform::ActionQueue;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;

/// Shortcut key selecting which configured shortcut starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShortcutKey {
    Jump,
    Trash,
}

/// Key pressed while a shortcut is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShortcutEvent {
    Disp,
    Av,
    Set,
    Up,
    Down,
    Right,
    Left,
}

/// Leaf operations carried out by the host firmware glue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostAction {
    ToggleImageFormat,
    RestoreIso,
    RestoreWb,
    RestoreMetering,
    SetMeteringSpot,
    AutoIsoEnable,
    AutoIsoDisable,
    DriveModeSet,
    /// Forward a DISP press to the firmware.
    PressDisp,
    /// Re-run the last script (SCRIPT shortcut).
    RepeatLastScript,
    ViewfinderSet,
    ViewfinderMove(Direction),
    ViewfinderEnd,
    /// Show the on-screen info for the running shortcut.
    ShortcutInfo(crate::mode::Shortcut),
    /// Clear the shortcut info area.
    ShortcutInfoEnd,
    /// Apply a key to the running shortcut (ISO step, AEB step, ...).
    ShortcutAdjust(crate::mode::Shortcut, ShortcutEvent),
}

/// Unit of deferred work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Feed an event to the open menu.
    Menu(MenuEvent),
    /// Open the main menu.
    MainMenu,
    /// Open the named colour temperature dialog.
    NamedTemps,
    /// Step the AF pattern selection.
    Afp(Direction),
    ShortcutStart(ShortcutKey),
    ShortcutDisp,
    Shortcut(ShortcutEvent),
    ShortcutEnd,
    SaveSettings,
    SaveOrdering,
    Beep,
    Host(HostAction),
}

/// Single-consumer action FIFO.
///
/// Producers only use `try_send`; a full queue drops the action.
pub struct ActionFifo {
    channel: Channel<NoopRawMutex, Action, ACTION_QUEUE_DEPTH>,
}

impl ActionFifo {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Next pending action, if any.
    pub fn next(&self) -> Option<Action> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn clear(&self) {
        self.channel.clear();
    }

    /// Append `action`, failing with [`Error::QueueFull`] when there is no
    /// room.
    pub fn push(&self, action: Action) -> Result<()> {
        self.channel.try_send(action).map_err(|_| Error::QueueFull)
    }
}

impl Default for ActionFifo {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionQueue for ActionFifo {
    fn enqueue(&self, action: Action) -> bool {
        match self.push(action) {
            Ok(()) => {
                trace!("queued {:?}", action);
                true
            }
            Err(e) => {
                warn!("{}, dropping {:?}", e, action);
                false
            }
        }
    }
}
