//! Shortcut keys.
//!
//! JUMP and TRASH start the shortcut configured for them; while the key is
//! held, the d-pad, SET and AV adjust what the shortcut controls. The
//! firmware reports the key going up as [`crate::input::Button::Release`],
//! which ends the shortcut.

use crate::action::{Action, HostAction, ShortcutEvent, ShortcutKey};
use crate::mode::{GuiMode, Shortcut};
use crate::platform::{ActionQueue, Camera, Platform};
use crate::settings::Settings;

#[derive(Debug, Default)]
pub struct ShortcutState {
    running: Shortcut,
}

impl ShortcutState {
    pub const fn new() -> Self {
        Self {
            running: Shortcut::None,
        }
    }

    pub fn running(&self) -> Shortcut {
        self.running
    }

    /// Start the shortcut assigned to `key`.
    pub fn start(&mut self, key: ShortcutKey, settings: &Settings, platform: &mut dyn Platform) {
        let id = match key {
            ShortcutKey::Jump => settings.shortcut_jump,
            ShortcutKey::Trash => settings.shortcut_trash,
        };
        let shortcut = Shortcut::from_id(id);
        debug!("shortcut {:?} on {:?}", shortcut, key);

        match shortcut {
            Shortcut::None => {}
            // The menu takes over the buttons; no shortcut mode.
            Shortcut::HackMenu => {
                platform.enqueue(Action::MainMenu);
            }
            Shortcut::Script => {
                self.running = shortcut;
                platform.perform(HostAction::RepeatLastScript);
            }
            _ => {
                self.running = shortcut;
                platform.perform(HostAction::ShortcutInfo(shortcut));
            }
        }
    }

    /// DISP outside the menu: the display shortcut if enabled and the
    /// display is on, the firmware's own DISP otherwise.
    pub fn disp(&mut self, settings: &Settings, platform: &mut dyn Platform) {
        if settings.button_disp != 0 && platform.gui_mode() != GuiMode::Off {
            self.running = Shortcut::Display;
            platform.perform(HostAction::ShortcutInfo(Shortcut::Display));
        } else {
            platform.perform(HostAction::PressDisp);
        }
    }

    /// Key pressed while the shortcut key is held.
    pub fn event(&mut self, event: ShortcutEvent, settings: &mut Settings, platform: &mut dyn Platform) {
        let running = self.running;
        match (event, running) {
            (_, Shortcut::None) => {}
            (ShortcutEvent::Disp, _) => {
                platform.perform(HostAction::PressDisp);
                platform.enqueue(Action::Beep);
                self.end(platform);
            }
            (ShortcutEvent::Set, Shortcut::Iso) => {
                settings.autoiso_enable = i32::from(settings.autoiso_enable == 0);
                info!("auto ISO {}", settings.autoiso_enable);
                platform.enqueue(Action::SaveSettings);
                platform.perform(HostAction::ShortcutInfo(Shortcut::Iso));
            }
            (ShortcutEvent::Set, Shortcut::Display) => {
                platform.enqueue(Action::Beep);
                self.end(platform);
            }
            _ => platform.perform(HostAction::ShortcutAdjust(running, event)),
        }
    }

    /// Shortcut key released.
    pub fn end(&mut self, platform: &mut dyn Platform) {
        if self.running == Shortcut::Aeb {
            platform.enqueue(Action::SaveSettings);
        }
        self.running = Shortcut::None;
        platform.perform(HostAction::ShortcutInfoEnd);
    }
}
