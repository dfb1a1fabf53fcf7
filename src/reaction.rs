//! Button reaction dispatch.
//!
//! Every logical [`Mode`] owns a chain of `button → reaction` bindings. A
//! reaction says whether the button is swallowed (`blocking`) and which
//! actions to queue on press and, for holdable buttons, on release.
//!
//! Resolution only ever enqueues actions; nothing runs synchronously on the
//! button path. The release action of a holdable button is captured when it
//! is pressed, so the release fires the same binding even if the mode has
//! changed in between.
//!
//! Only one held button is tracked. Pressing a second holdable button
//! replaces the first one, whose release then goes unanswered.

use crate::action::{Action, HostAction, ShortcutEvent, ShortcutKey};
use crate::input::Button;
use crate::menu::MenuEvent;
use crate::mode::{GuiMode, Mode};
use crate::pattern::Direction;
use crate::platform::ActionQueue;
use crate::settings::Settings;

/// What happens when a bound button goes down (and up again).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reaction {
    /// Hide the button from the vendor firmware.
    pub blocking: bool,
    pub on_press: Option<Action>,
    pub on_release: Option<Action>,
}

impl Reaction {
    /// Swallow the button and queue `action`.
    pub const fn blocking(action: Action) -> Self {
        Self {
            blocking: true,
            on_press: Some(action),
            on_release: None,
        }
    }

    /// Queue `action` and let the firmware see the button too.
    pub const fn passive(action: Action) -> Self {
        Self {
            blocking: false,
            on_press: Some(action),
            on_release: None,
        }
    }

    /// Blocking reaction with a release action.
    pub const fn held(press: Action, release: Action) -> Self {
        Self {
            blocking: true,
            on_press: Some(press),
            on_release: Some(release),
        }
    }

    /// Swallow the button without doing anything.
    pub const fn swallow() -> Self {
        Self {
            blocking: true,
            on_press: None,
            on_release: None,
        }
    }
}

/// Button bindings of one mode.
pub struct Chain {
    pub reactions: &'static [(Button, Reaction)],
    /// The whole chain is disabled while this returns `false`.
    pub condition: Option<fn(&Settings) -> bool>,
}

impl Chain {
    pub fn reaction(&self, button: Button) -> Option<&Reaction> {
        self.reactions
            .iter()
            .find(|(bound, _)| *bound == button)
            .map(|(_, reaction)| reaction)
    }

    pub fn enabled(&self, settings: &Settings) -> bool {
        self.condition.map_or(true, |condition| condition(settings))
    }
}

/// Mode → chain mapping.
pub struct ReactionTable {
    chains: &'static [(Mode, &'static Chain)],
}

impl ReactionTable {
    pub const fn new(chains: &'static [(Mode, &'static Chain)]) -> Self {
        Self { chains }
    }

    /// Bindings of the stock add-on.
    pub fn firmware() -> Self {
        Self::new(&FIRMWARE_CHAINS)
    }

    pub fn chain(&self, mode: Mode) -> Option<&'static Chain> {
        self.chains
            .iter()
            .find(|(bound, _)| *bound == mode)
            .map(|(_, chain)| *chain)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Stock bindings
// ═══════════════════════════════════════════════════════════════════════════

const fn host(action: HostAction) -> Action {
    Action::Host(action)
}

const fn menu(event: MenuEvent) -> Action {
    Action::Menu(event)
}

const fn shortcut(event: ShortcutEvent) -> Action {
    Action::Shortcut(event)
}

const fn viewfinder(direction: Direction) -> Reaction {
    Reaction::held(
        host(HostAction::ViewfinderMove(direction)),
        host(HostAction::ViewfinderEnd),
    )
}

static MAIN: Chain = Chain {
    reactions: &[
        (Button::Dp, Reaction::blocking(Action::MainMenu)),
        (Button::Disp, Reaction::blocking(Action::ShortcutDisp)),
        (Button::Jump, Reaction::blocking(Action::ShortcutStart(ShortcutKey::Jump))),
        (Button::Trash, Reaction::blocking(Action::ShortcutStart(ShortcutKey::Trash))),
        (Button::Av, Reaction::passive(host(HostAction::ToggleImageFormat))),
        (Button::Up, Reaction::passive(host(HostAction::RestoreIso))),
        (Button::Down, Reaction::passive(host(HostAction::RestoreWb))),
        (Button::Left, Reaction::passive(host(HostAction::RestoreMetering))),
    ],
    condition: None,
};

static MENU: Chain = Chain {
    reactions: &[
        (Button::Dp, Reaction::blocking(menu(MenuEvent::Dp))),
        (Button::Disp, Reaction::blocking(menu(MenuEvent::Disp))),
        (Button::Jump, Reaction::blocking(menu(MenuEvent::Jump))),
        (Button::Play, Reaction::blocking(menu(MenuEvent::Play))),
        (Button::Trash, Reaction::blocking(menu(MenuEvent::Trash))),
        (Button::WheelLeft, Reaction::blocking(menu(MenuEvent::Prev))),
        (Button::WheelRight, Reaction::blocking(menu(MenuEvent::Next))),
        (Button::ZoomOut, Reaction::blocking(menu(MenuEvent::Out))),
        (Button::ZoomIn, Reaction::blocking(menu(MenuEvent::In))),
        (Button::Av, Reaction::held(menu(MenuEvent::Av), menu(MenuEvent::AvUp))),
        (Button::Set, Reaction::blocking(menu(MenuEvent::Set))),
        (Button::Up, Reaction::blocking(menu(MenuEvent::Up))),
        (Button::Down, Reaction::blocking(menu(MenuEvent::Down))),
        (Button::Right, Reaction::blocking(menu(MenuEvent::Right))),
        (Button::Left, Reaction::blocking(menu(MenuEvent::Left))),
    ],
    condition: None,
};

static SHORTCUT: Chain = Chain {
    reactions: &[
        (Button::Disp, Reaction::blocking(shortcut(ShortcutEvent::Disp))),
        (Button::Av, Reaction::blocking(shortcut(ShortcutEvent::Av))),
        (Button::Set, Reaction::blocking(shortcut(ShortcutEvent::Set))),
        (Button::Up, Reaction::blocking(shortcut(ShortcutEvent::Up))),
        (Button::Down, Reaction::blocking(shortcut(ShortcutEvent::Down))),
        (Button::Right, Reaction::blocking(shortcut(ShortcutEvent::Right))),
        (Button::Left, Reaction::blocking(shortcut(ShortcutEvent::Left))),
        (Button::Release, Reaction::blocking(Action::ShortcutEnd)),
    ],
    condition: None,
};

static METER: Chain = Chain {
    reactions: &[(Button::Dp, Reaction::blocking(host(HostAction::SetMeteringSpot)))],
    condition: None,
};

static WB: Chain = Chain {
    reactions: &[(Button::Dp, Reaction::blocking(Action::NamedTemps))],
    condition: None,
};

static ISO: Chain = Chain {
    reactions: &[
        (Button::Dp, Reaction::blocking(host(HostAction::AutoIsoEnable))),
        (Button::Set, Reaction::passive(host(HostAction::AutoIsoDisable))),
    ],
    condition: None,
};

static AF_PATTERN: Chain = Chain {
    reactions: &[
        (Button::Set, Reaction::blocking(Action::Afp(Direction::Center))),
        (Button::Up, Reaction::blocking(Action::Afp(Direction::Up))),
        (Button::Down, Reaction::blocking(Action::Afp(Direction::Down))),
        (Button::Right, Reaction::blocking(Action::Afp(Direction::Right))),
        (Button::Left, Reaction::blocking(Action::Afp(Direction::Left))),
        (Button::Disp, Reaction::swallow()),
    ],
    condition: None,
};

static DRIVE: Chain = Chain {
    reactions: &[(Button::Set, Reaction::passive(host(HostAction::DriveModeSet)))],
    condition: None,
};

fn dpad_enabled(settings: &Settings) -> bool {
    settings.use_dpad != 0
}

static FACE: Chain = Chain {
    reactions: &[
        (Button::Set, Reaction::blocking(host(HostAction::ViewfinderSet))),
        (Button::Up, viewfinder(Direction::Up)),
        (Button::Down, viewfinder(Direction::Down)),
        (Button::Right, viewfinder(Direction::Right)),
        (Button::Left, viewfinder(Direction::Left)),
    ],
    condition: Some(dpad_enabled),
};

static FIRMWARE_CHAINS: [(Mode, &Chain); 10] = [
    (Mode::Gui(GuiMode::Olc), &MAIN),
    (Mode::Gui(GuiMode::Off), &MAIN),
    (Mode::Gui(GuiMode::Meter), &METER),
    (Mode::Gui(GuiMode::Wb), &WB),
    (Mode::Gui(GuiMode::Iso), &ISO),
    (Mode::Gui(GuiMode::AfPattern), &AF_PATTERN),
    (Mode::Gui(GuiMode::Drive), &DRIVE),
    (Mode::Menu, &MENU),
    (Mode::Face, &FACE),
    (Mode::Shortcut, &SHORTCUT),
];

// ═══════════════════════════════════════════════════════════════════════════
// Resolver
// ═══════════════════════════════════════════════════════════════════════════

/// Holdable button currently down and what its release does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeldButton {
    pub button: Button,
    pub release_action: Option<Action>,
    pub release_blocks: bool,
}

pub struct Resolver {
    table: ReactionTable,
    held: Option<HeldButton>,
}

impl Resolver {
    pub const fn new(table: ReactionTable) -> Self {
        Self { table, held: None }
    }

    pub fn held(&self) -> Option<&HeldButton> {
        self.held.as_ref()
    }

    /// Button went down in `mode`. Returns whether it is blocked.
    pub fn press<Q: ActionQueue + ?Sized>(
        &mut self,
        button: Button,
        mode: Mode,
        settings: &Settings,
        queue: &Q,
    ) -> bool {
        let Some(chain) = self.table.chain(mode) else {
            return false;
        };
        if !chain.enabled(settings) {
            trace!("{:?} chain disabled", mode);
            return false;
        }
        let Some(reaction) = chain.reaction(button) else {
            return false;
        };
        debug!("{:?} in {:?}", button, mode);

        if let Some(action) = reaction.on_press {
            queue.enqueue(action);
        }
        if button.can_hold() {
            self.held = Some(HeldButton {
                button,
                release_action: reaction.on_release,
                release_blocks: reaction.blocking,
            });
        }
        reaction.blocking
    }

    /// Button went up. Only the tracked held button has a release reaction.
    pub fn release<Q: ActionQueue + ?Sized>(&mut self, button: Button, queue: &Q) -> bool {
        match self.held {
            Some(held) if held.button == button => {
                self.held = None;
                if let Some(action) = held.release_action {
                    queue.enqueue(action);
                }
                held.release_blocks
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionFifo;
    use crate::config::ACTION_QUEUE_DEPTH;
    use crate::input::Button::*;

    fn resolver() -> Resolver {
        Resolver::new(ReactionTable::firmware())
    }

    fn drain(fifo: &ActionFifo) -> std::vec::Vec<Action> {
        core::iter::from_fn(|| fifo.next()).collect()
    }

    const OLC: Mode = Mode::Gui(GuiMode::Olc);

    #[test]
    fn every_mode_except_plain_dialogs_has_a_chain() {
        let table = ReactionTable::firmware();
        assert!(table.chain(Mode::Gui(GuiMode::Quality)).is_none());
        assert!(table.chain(Mode::Gui(GuiMode::Other)).is_none());
        assert!(table.chain(Mode::Menu).is_some());
        assert!(table.chain(Mode::Face).is_some());
    }

    #[test]
    fn unmapped_buttons_pass_through() {
        let fifo = ActionFifo::new();
        let settings = Settings::default();
        let mut r = resolver();
        for button in Button::ALL {
            assert!(!r.press(button, Mode::Gui(GuiMode::Quality), &settings, &fifo));
        }
        assert!(!r.press(Play, OLC, &settings, &fifo));
        assert!(!r.press(Menu, Mode::Menu, &settings, &fifo));
        assert!(fifo.is_empty());
        assert!(r.held().is_none());
    }

    #[test]
    fn press_only_enqueues() {
        let fifo = ActionFifo::new();
        let settings = Settings::default();
        let mut r = resolver();
        assert!(r.press(Dp, OLC, &settings, &fifo));
        assert!(!r.press(Av, OLC, &settings, &fifo));
        assert_eq!(
            drain(&fifo),
            [Action::MainMenu, Action::Host(HostAction::ToggleImageFormat)]
        );
    }

    #[test]
    fn release_uses_reaction_captured_at_press() {
        let fifo = ActionFifo::new();
        let settings = Settings::default();
        let mut r = resolver();
        assert!(r.press(Av, Mode::Menu, &settings, &fifo));
        // The menu closes before AV comes up; the release still answers.
        assert!(r.release(Av, &fifo));
        assert_eq!(
            drain(&fifo),
            [Action::Menu(MenuEvent::Av), Action::Menu(MenuEvent::AvUp)]
        );
        assert!(r.held().is_none());
        assert!(!r.release(Av, &fifo));
    }

    #[test]
    fn second_held_press_orphans_first_release() {
        let fifo = ActionFifo::new();
        let settings = Settings::default();
        let mut r = resolver();
        assert!(r.press(Up, Mode::Face, &settings, &fifo));
        assert!(!r.press(Down, OLC, &settings, &fifo));
        fifo.clear();

        assert!(!r.release(Up, &fifo));
        assert!(fifo.is_empty());
        // Down had no release action and was not blocking.
        assert!(!r.release(Down, &fifo));
        assert!(fifo.is_empty());
    }

    #[test]
    fn non_holdable_press_keeps_held_button() {
        let fifo = ActionFifo::new();
        let settings = Settings::default();
        let mut r = resolver();
        r.press(Left, Mode::Face, &settings, &fifo);
        r.press(Set, Mode::Face, &settings, &fifo);
        assert_eq!(r.held().map(|h| h.button), Some(Left));
        assert!(r.release(Left, &fifo));
        assert_eq!(
            drain(&fifo).last(),
            Some(&Action::Host(HostAction::ViewfinderEnd))
        );
    }

    #[test]
    fn face_chain_follows_dpad_setting() {
        let fifo = ActionFifo::new();
        let mut settings = Settings::default();
        settings.use_dpad = 0;
        let mut r = resolver();
        assert!(!r.press(Up, Mode::Face, &settings, &fifo));
        assert!(fifo.is_empty());
        assert!(r.held().is_none());

        settings.use_dpad = 1;
        assert!(r.press(Up, Mode::Face, &settings, &fifo));
        assert_eq!(
            drain(&fifo),
            [Action::Host(HostAction::ViewfinderMove(Direction::Up))]
        );
    }

    #[test]
    fn af_dialog_swallows_disp() {
        let fifo = ActionFifo::new();
        let settings = Settings::default();
        let mut r = resolver();
        assert!(r.press(Disp, Mode::Gui(GuiMode::AfPattern), &settings, &fifo));
        assert!(fifo.is_empty());
    }

    #[test]
    fn full_queue_keeps_blocking_answer() {
        let fifo = ActionFifo::new();
        let settings = Settings::default();
        let mut r = resolver();
        for _ in 0..ACTION_QUEUE_DEPTH {
            assert!(r.press(Set, Mode::Menu, &settings, &fifo));
        }
        assert!(r.press(Dp, OLC, &settings, &fifo));
        assert_eq!(fifo.len(), ACTION_QUEUE_DEPTH);
        assert!(!drain(&fifo).contains(&Action::MainMenu));
    }
}
