//! Input controller: the single owner of the add-on's runtime state.
//!
//! The vendor button hook calls [`InputController::button_down`] /
//! [`InputController::button_up`]; these only resolve and enqueue. The
//! main loop then hands every queued [`Action`] to
//! [`InputController::execute`] (or calls [`InputController::drain`]).
//!
//! ```text
//! button ──► select_mode ──► Resolver ──► ActionFifo ──► execute ──► menu / shortcut / host
//! ```

use crate::action::{Action, ActionFifo};
use crate::config::{AUTOREPEAT_DELAY_LONG, AUTOREPEAT_DELAY_SHORT, AUTOREPEAT_DELAY_UNIT};
use crate::input::Button;
use crate::menu::main_menu::{self, MAIN_MENU};
use crate::menu::named_temps::{self, DIALOGS};
use crate::menu::paging::PagedWindow;
use crate::menu::{Menu, MenuEvent, MenuState};
use crate::mode::{select_mode, Ambient};
use crate::pattern::apply_af_pattern;
use crate::platform::{ActionQueue, Camera, Platform, Storage};
use crate::reaction::{ReactionTable, Resolver};
use crate::settings::{MenuOrder, Section, Settings};
use crate::shortcut::ShortcutState;
use crate::storage::SettingsStore;
use embassy_time::Duration;

/// State the menus read and write.
#[derive(Debug, Default)]
pub struct Context {
    pub settings: Settings,
    pub order: MenuOrder,
    /// Records of the named temperature dialog.
    pub named_temps: PagedWindow,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MenuState for Context {
    fn ordering(&self, key: &str) -> Option<&[i32]> {
        self.order.values(key)
    }

    fn ordering_mut(&mut self, key: &str) -> Option<&mut [i32]> {
        self.order.values_mut(key)
    }
}

/// Which menu is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuKind {
    Main,
    Dialog,
}

// ═══════════════════════════════════════════════════════════════════════════
// Auto-repeat
// ═══════════════════════════════════════════════════════════════════════════

/// Delay schedule for a held menu button.
///
/// The first repetition comes after `AUTOREPEAT_DELAY_LONG` units, every
/// later one after `AUTOREPEAT_DELAY_SHORT`. Timing itself belongs to the
/// caller; this only tracks what repeats and how long to wait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Autorepeat {
    held: Option<(Button, MenuEvent)>,
    count: u32,
}

impl Autorepeat {
    pub const fn new() -> Self {
        Self { held: None, count: 0 }
    }

    /// Menu events that repeat while their button stays down.
    pub const fn button_for(event: MenuEvent) -> Option<Button> {
        match event {
            MenuEvent::Up => Some(Button::Up),
            MenuEvent::Down => Some(Button::Down),
            MenuEvent::Left => Some(Button::Left),
            MenuEvent::Right => Some(Button::Right),
            _ => None,
        }
    }

    /// Arm for `event`; no-op for events that do not repeat.
    pub fn arm(&mut self, event: MenuEvent) {
        if let Some(button) = Self::button_for(event) {
            self.held = Some((button, event));
            self.count = 0;
        }
    }

    pub fn stop(&mut self) {
        self.held = None;
        self.count = 0;
    }

    /// Disarm if `button` is the one repeating.
    pub fn release(&mut self, button: Button) {
        if matches!(self.held, Some((held, _)) if held == button) {
            self.stop();
        }
    }

    pub fn button(&self) -> Option<Button> {
        self.held.map(|(button, _)| button)
    }

    pub fn event(&self) -> Option<MenuEvent> {
        self.held.map(|(_, event)| event)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Time until the next repetition, if armed.
    pub fn delay(&self) -> Option<Duration> {
        self.held?;
        let units = if self.count == 0 {
            AUTOREPEAT_DELAY_LONG
        } else {
            AUTOREPEAT_DELAY_SHORT
        };
        Some(Duration::from_millis(u64::from(units * AUTOREPEAT_DELAY_UNIT)))
    }

    /// Count one repetition and return the event to replay.
    pub fn tick(&mut self) -> Option<MenuEvent> {
        let event = self.event()?;
        self.count = self.count.saturating_add(1);
        Some(event)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Controller
// ═══════════════════════════════════════════════════════════════════════════

pub struct InputController {
    resolver: Resolver,
    shortcut: ShortcutState,
    main_menu: Menu<Context>,
    dialogs: Menu<Context>,
    active: Option<MenuKind>,
    autorepeat: Autorepeat,
    store: SettingsStore,
    pub ctx: Context,
}

impl InputController {
    pub fn new(table: ReactionTable) -> Self {
        Self {
            resolver: Resolver::new(table),
            shortcut: ShortcutState::new(),
            main_menu: Menu::new(&MAIN_MENU),
            dialogs: Menu::new(&DIALOGS),
            active: None,
            autorepeat: Autorepeat::new(),
            store: SettingsStore::new(),
            ctx: Context::new(),
        }
    }

    /// Controller with the stock bindings.
    pub fn firmware() -> Self {
        Self::new(ReactionTable::firmware())
    }

    /// Read settings and menu order from the card.
    pub fn load<S: Storage + ?Sized>(&mut self, storage: &mut S) -> bool {
        let ctx = &mut self.ctx;
        self.store.load(&mut ctx.settings, &mut ctx.order, storage)
    }

    pub fn active_menu(&self) -> Option<MenuKind> {
        self.active
    }

    pub fn menu_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn shortcut(&self) -> &ShortcutState {
        &self.shortcut
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn menu(&self, kind: MenuKind) -> &Menu<Context> {
        match kind {
            MenuKind::Main => &self.main_menu,
            MenuKind::Dialog => &self.dialogs,
        }
    }

    fn menu_mut(&mut self, kind: MenuKind) -> &mut Menu<Context> {
        match kind {
            MenuKind::Main => &mut self.main_menu,
            MenuKind::Dialog => &mut self.dialogs,
        }
    }

    /// Button went down. Returns `true` if the firmware must not see it.
    pub fn button_down<Q: ActionQueue + ?Sized>(&mut self, button: Button, ambient: &Ambient, queue: &Q) -> bool {
        let mode = select_mode(ambient, self.menu_running(), self.shortcut.running());
        self.resolver.press(button, mode, &self.ctx.settings, queue)
    }

    /// Button went up. Returns `true` if the firmware must not see it.
    pub fn button_up<Q: ActionQueue + ?Sized>(&mut self, button: Button, queue: &Q) -> bool {
        self.autorepeat.release(button);
        self.resolver.release(button, queue)
    }

    /// Run one queued action.
    pub fn execute(&mut self, action: Action, platform: &mut dyn Platform) {
        trace!("execute {:?}", action);
        match action {
            Action::Menu(event) => {
                self.menu_event(event, platform);
                // A tap may already be released by the time it runs.
                if self.holding(Autorepeat::button_for(event)) {
                    self.autorepeat.arm(event);
                }
            }
            Action::MainMenu => self.open(MenuKind::Main, platform),
            Action::NamedTemps => self.open(MenuKind::Dialog, platform),
            Action::Afp(direction) => {
                let current = platform.af_point();
                let orientation = platform.orientation();
                apply_af_pattern(platform, &mut self.ctx.settings, current, orientation, direction);
            }
            Action::ShortcutStart(key) => self.shortcut.start(key, &self.ctx.settings, platform),
            Action::ShortcutDisp => self.shortcut.disp(&self.ctx.settings, platform),
            Action::Shortcut(event) => self.shortcut.event(event, &mut self.ctx.settings, platform),
            Action::ShortcutEnd => self.shortcut.end(platform),
            Action::SaveSettings => {
                // Logged by the store.
                let _ = self.store.save_settings(&self.ctx.settings, platform);
            }
            Action::SaveOrdering => {
                let _ = self.store.save_ordering(&self.ctx.order, platform);
            }
            Action::Beep => platform.beep(),
            Action::Host(host) => platform.perform(host),
        }
    }

    /// Run queued actions until the queue is empty, including those the
    /// actions themselves enqueue. Returns how many ran.
    pub fn drain<P: Platform>(&mut self, queue: &ActionFifo, platform: &mut P) -> usize {
        let mut executed = 0;
        while let Some(action) = queue.next() {
            self.execute(action, platform);
            executed += 1;
        }
        executed
    }

    /// Time until [`Self::repeat`] should run, if a menu button is being
    /// held.
    pub fn repeat_delay(&self) -> Option<Duration> {
        if self.active.is_none() {
            return None;
        }
        self.autorepeat.delay()
    }

    /// Timer expired: replay the held menu event with acceleration.
    pub fn repeat(&mut self, platform: &mut dyn Platform) -> Option<Duration> {
        let Some(kind) = self.active else {
            self.autorepeat.stop();
            return None;
        };
        if !self.holding(self.autorepeat.button()) {
            self.autorepeat.stop();
            return None;
        }
        let event = self.autorepeat.tick()?;
        let menu = self.menu_mut(kind);
        menu.repeating = true;
        self.menu_event(event, platform);
        if let Some(kind) = self.active {
            self.menu_mut(kind).repeating = false;
        }
        self.repeat_delay()
    }

    /// The firmware closed the dialog on its own (MENU, power off, ...).
    pub fn dialog_closed(&mut self, platform: &mut dyn Platform) {
        if self.active.is_some() {
            self.menu_event(MenuEvent::Finish, platform);
        }
    }

    fn holding(&self, button: Option<Button>) -> bool {
        button.is_some() && self.resolver.held().map(|held| held.button) == button
    }

    fn open(&mut self, kind: MenuKind, platform: &mut dyn Platform) {
        if let Some(active) = self.active {
            debug!("{:?} requested while {:?} is open", kind, active);
            return;
        }
        self.autorepeat.stop();
        match kind {
            MenuKind::Main => main_menu::start(&mut self.main_menu, &mut self.ctx, platform),
            MenuKind::Dialog => named_temps::start(&mut self.dialogs, &mut self.ctx, platform),
        }
        self.active = Some(kind);
        info!("{:?} menu open", kind);
    }

    fn menu_event(&mut self, event: MenuEvent, platform: &mut dyn Platform) {
        let Some(kind) = self.active else {
            trace!("{:?} with no menu open", event);
            return;
        };
        let menu = match kind {
            MenuKind::Main => &mut self.main_menu,
            MenuKind::Dialog => &mut self.dialogs,
        };
        menu.event(event, &mut self.ctx, platform);
        if !menu.is_open() {
            menu.repeating = false;
            self.active = None;
            self.autorepeat.stop();
            info!("{:?} menu closed", kind);
        }
    }
}
