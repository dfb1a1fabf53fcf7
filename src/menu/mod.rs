//! Paged menu engine.
//!
//! A [`Menu`] holds a fixed list of pages, at most one of which is active.
//! Incoming [`MenuEvent`]s go to the active page's handler if it binds
//! one, then to the menu's, and are ignored otherwise. Handlers are plain
//! functions over the menu, the externally owned state `C` and the
//! [`Platform`].
//!
//! ## Layout
//!
//! - `item`: item kinds and value accessors
//! - `page`: cursor arithmetic and the generic page handlers
//! - `ordering`: custom item/page order
//! - `paging`: windowed loading of external records
//! - `main_menu`, `named_temps`: the two menus of the add-on

pub mod item;
pub mod main_menu;
pub mod named_temps;
pub mod ordering;
pub mod page;
pub mod paging;

#[cfg(test)]
mod tests;

use crate::action::Action;
use crate::config::{MAX_PAGES, REPEAT_ACCELERATION};
use crate::platform::{ActionQueue, Color, Display, Platform};
use heapless::Vec;
use item::{Item, ItemKind};
use page::{Page, PageDef};

/// Events a menu reacts to. Most come from buttons; `Open`, `Display`,
/// `Refresh`, `Finish` and `Save` are raised by the engine itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEvent {
    Menu,
    Disp,
    Jump,
    Play,
    Trash,
    Set,
    Prev,
    Next,
    Up,
    Down,
    Right,
    Left,
    Dp,
    Av,
    AvUp,
    Out,
    In,
    Open,
    Display,
    Refresh,
    Finish,
    Save,
}

/// Handler bound to an event.
pub type MenuAction<C> = fn(&mut Menu<C>, &mut C, &mut dyn Platform);

/// Event table of a page or a menu.
pub type Bindings<C> = &'static [(MenuEvent, MenuAction<C>)];

/// Table entry.
pub const fn on<C>(event: MenuEvent, action: MenuAction<C>) -> (MenuEvent, MenuAction<C>) {
    (event, action)
}

fn lookup<C>(bindings: Bindings<C>, event: MenuEvent) -> Option<MenuAction<C>> {
    bindings
        .iter()
        .find(|(bound, _)| *bound == event)
        .map(|(_, action)| *action)
}

/// Access to the persisted orderings of the menu state.
pub trait MenuState {
    fn ordering(&self, key: &str) -> Option<&[i32]>;
    fn ordering_mut(&mut self, key: &str) -> Option<&mut [i32]>;
}

/// Static description of a menu.
pub struct MenuDef<C: 'static> {
    pub color: Color,
    pub pages: &'static [&'static PageDef<C>],
    /// The first `browsable` pages are reached with NEXT/PREV and through
    /// the menu ordering; the rest are only entered by links.
    pub browsable: usize,
    pub actions: Bindings<C>,
    pub ordering: Option<&'static str>,
}

pub struct Menu<C: 'static> {
    def: &'static MenuDef<C>,
    pages: Vec<Page<C>, MAX_PAGES>,
    /// Cursor over the browsable pages, in ordering space.
    pub current_posn: usize,
    current_page: Option<usize>,
    /// Some value or ordering changed while the menu was open.
    pub changed: bool,
    /// The event being handled is an auto-repeat.
    pub repeating: bool,
}

impl<C: MenuState> Menu<C> {
    pub fn new(def: &'static MenuDef<C>) -> Self {
        let mut pages = Vec::new();
        for page in def.pages {
            if pages.push(Page::new(*page)).is_err() {
                warn!("menu has more than {} pages", MAX_PAGES);
                break;
            }
        }
        Self {
            def,
            pages,
            current_posn: 0,
            current_page: None,
            changed: false,
            repeating: false,
        }
    }

    pub fn color(&self) -> Color {
        self.def.color
    }

    pub fn is_open(&self) -> bool {
        self.current_page.is_some()
    }

    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    pub fn browsable(&self) -> usize {
        self.def.browsable.min(self.pages.len())
    }

    pub fn page(&self) -> Option<&Page<C>> {
        self.current_page.and_then(|id| self.pages.get(id))
    }

    pub fn page_mut(&mut self) -> Option<&mut Page<C>> {
        self.current_page.and_then(|id| self.pages.get_mut(id))
    }

    pub fn page_at(&self, id: usize) -> Option<&Page<C>> {
        self.pages.get(id)
    }

    pub fn page_at_mut(&mut self, id: usize) -> Option<&mut Page<C>> {
        self.pages.get_mut(id)
    }

    /// Page shown at menu position `posn`.
    pub fn page_for(&self, ctx: &C, posn: usize) -> usize {
        let ordering = self.def.ordering.and_then(|key| ctx.ordering(key));
        ordering::resolve(ordering, posn, self.browsable())
    }

    /// Feed one event to the active page, falling back to the menu.
    pub fn event(&mut self, event: MenuEvent, ctx: &mut C, platform: &mut dyn Platform) {
        let page_action = self.page().and_then(|page| lookup(page.def.actions, event));
        let action = page_action.or_else(|| lookup(self.def.actions, event));
        match action {
            Some(action) => action(self, ctx, platform),
            None => trace!("menu ignores {:?}", event),
        }
    }

    /// Open the menu on the page at `current_posn`.
    pub fn create(&mut self, ctx: &mut C, platform: &mut dyn Platform) {
        self.changed = false;
        self.repeating = false;
        platform.open(self.def.color);
        let posn = self.current_posn.min(self.browsable().saturating_sub(1));
        self.set_posn(posn, ctx, platform);
    }

    /// Move the menu cursor and open the page it designates.
    pub fn set_posn(&mut self, posn: usize, ctx: &mut C, platform: &mut dyn Platform) {
        self.current_posn = posn;
        let id = self.page_for(ctx, posn);
        self.set_page(id, ctx, platform);
    }

    /// Make page `id` current, let it load, then draw it. An item still
    /// grabbed on the page being left is dropped where it is.
    pub fn set_page(&mut self, id: usize, ctx: &mut C, platform: &mut dyn Platform) {
        if id >= self.pages.len() {
            warn!("no page {}", id);
            return;
        }
        self.drop_grabbed(platform);
        if let Some(page) = self.pages.get_mut(id) {
            page.grabbed = false;
        }
        self.current_page = Some(id);
        self.event(MenuEvent::Open, ctx, platform);
        self.event(MenuEvent::Display, ctx, platform);
    }

    /// Run the page and menu SAVE handlers, then close.
    pub fn finish(&mut self, ctx: &mut C, platform: &mut dyn Platform) {
        if !self.is_open() {
            return;
        }
        self.drop_grabbed(platform);
        let page_save = self.page().and_then(|page| lookup(page.def.actions, MenuEvent::Save));
        if let Some(save) = page_save {
            save(self, ctx, platform);
        }
        let menu_save = lookup(self.def.actions, MenuEvent::Save);
        if let Some(save) = menu_save {
            save(self, ctx, platform);
        }
        self.current_page = None;
        platform.close();
        debug!("menu closed");
    }

    /// Release the item grabbed on the active page at its current
    /// position, mark the menu changed and queue the ordering write.
    /// Returns `false` when nothing was grabbed.
    pub fn drop_grabbed(&mut self, platform: &mut dyn Platform) -> bool {
        let Some(page) = self.page_mut() else {
            return false;
        };
        if !page.grabbed {
            return false;
        }
        page.grabbed = false;
        debug!("dropped item {} -> {}", page.drag_source, page.cursor.posn);
        self.changed = true;
        platform.enqueue(Action::SaveOrdering);
        true
    }

    /// Item under the cursor of the active page, and its slot.
    pub fn current_item(&self, ctx: &C) -> Option<(&'static Item<C>, usize)> {
        self.page().and_then(|page| page.current_item(ctx))
    }

    fn adjust(&mut self, ctx: &mut C, platform: &mut dyn Platform, direction: i32) {
        let Some((item, slot)) = self.current_item(ctx) else {
            return;
        };
        let steps = if self.repeating {
            direction * REPEAT_ACCELERATION
        } else {
            direction
        };
        if item.adjust(ctx, slot, steps) {
            self.changed = true;
            self.event(MenuEvent::Refresh, ctx, platform);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Generic menu handlers
// ═══════════════════════════════════════════════════════════════════════════

/// SET: run the item action, or follow a bare link.
pub fn set<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some((item, slot)) = menu.current_item(ctx) else {
        return;
    };
    if let Some(action) = item.on_set {
        action(menu, ctx, platform, slot);
    } else if let ItemKind::Link(id) = item.kind {
        menu.set_page(id, ctx, platform);
    }
}

/// RIGHT: increase the value, or enter a linked page.
pub fn right<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some((item, _)) = menu.current_item(ctx) else {
        return;
    };
    match item.kind {
        ItemKind::Link(id) => menu.set_page(id, ctx, platform),
        _ => menu.adjust(ctx, platform, 1),
    }
}

/// LEFT: decrease the value.
pub fn left<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    menu.adjust(ctx, platform, -1);
}

/// Wheel right: next browsable page, wrapping around.
pub fn next<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let count = menu.browsable();
    if count == 0 {
        return;
    }
    let posn = (menu.current_posn + 1) % count;
    menu.set_posn(posn, ctx, platform);
}

/// Wheel left: previous browsable page, wrapping around.
pub fn prev<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let count = menu.browsable();
    if count == 0 {
        return;
    }
    let posn = (menu.current_posn + count - 1) % count;
    menu.set_posn(posn, ctx, platform);
}

pub fn finish<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    menu.finish(ctx, platform);
}
