//! Pages, the scrolling cursor and the generic page handlers.
//!
//! A page shows a window of [`MENU_HEIGHT`] lines over its items.
//! `Cursor::posn` is the logical item position, `Cursor::line` the row of
//! that item inside the visible window. Every operation keeps
//! `line <= posn`, `line < MENU_HEIGHT` and `posn < size` (both 0 on an
//! empty page).

use super::item::Item;
use super::{ordering, Bindings, Menu, MenuEvent, MenuState};
use crate::config::MENU_HEIGHT;
use crate::platform::{Display, Platform};

/// Cursor over a list of `size` items seen through a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub size: usize,
    pub line: usize,
    pub posn: usize,
}

impl Cursor {
    pub const fn new(size: usize) -> Self {
        Self {
            size,
            line: 0,
            posn: 0,
        }
    }

    /// Logical position of the first visible line.
    pub const fn top(&self) -> usize {
        self.posn - self.line
    }

    /// Pull `posn` and `line` back inside their bounds.
    pub fn settle(&mut self) {
        if self.size == 0 {
            self.posn = 0;
            self.line = 0;
            return;
        }
        self.posn = self.posn.min(self.size - 1);
        self.line = self.line.min(self.posn).min(MENU_HEIGHT - 1);
    }

    /// Put both the line and the position on `posn`.
    pub fn park(&mut self, posn: usize) {
        self.posn = posn;
        self.line = posn;
        self.settle();
    }

    pub fn up(&mut self) -> bool {
        if self.posn == 0 {
            return false;
        }
        self.posn -= 1;
        self.line = self.line.saturating_sub(1);
        true
    }

    pub fn down(&mut self) -> bool {
        if self.posn + 1 >= self.size {
            return false;
        }
        self.posn += 1;
        if self.line + 1 < MENU_HEIGHT {
            self.line += 1;
        }
        true
    }

    pub fn page_up(&mut self) {
        self.posn = self.posn.saturating_sub(MENU_HEIGHT);
        self.settle();
    }

    pub fn page_down(&mut self) {
        if self.size == 0 {
            return;
        }
        self.posn = (self.posn + MENU_HEIGHT).min(self.size - 1);
        self.settle();
    }
}

/// Static description of a page.
pub struct PageDef<C: 'static> {
    pub name: &'static str,
    pub items: &'static [Item<C>],
    /// Handlers that take precedence over the menu's.
    pub actions: Bindings<C>,
    /// Key of the persisted item ordering, if items can be reordered.
    pub ordering: Option<&'static str>,
}

/// A page with its navigation state.
pub struct Page<C: 'static> {
    pub def: &'static PageDef<C>,
    pub cursor: Cursor,
    pub grabbed: bool,
    pub drag_source: usize,
}

impl<C: MenuState> Page<C> {
    pub fn new(def: &'static PageDef<C>) -> Self {
        Self {
            def,
            cursor: Cursor::new(def.items.len()),
            grabbed: false,
            drag_source: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    /// Item index shown at logical position `posn`.
    pub fn item_id(&self, ctx: &C, posn: usize) -> usize {
        let ordering = self.def.ordering.and_then(|key| ctx.ordering(key));
        ordering::resolve(ordering, posn, self.def.items.len())
    }

    /// Item under the cursor and its slot.
    pub fn current_item(&self, ctx: &C) -> Option<(&'static Item<C>, usize)> {
        if self.cursor.size == 0 {
            return None;
        }
        let slot = self.item_id(ctx, self.cursor.posn);
        self.def.items.get(slot).map(|item| (item, slot))
    }

    /// Render the visible window, then highlight the cursor line.
    pub fn render(&self, ctx: &C, platform: &mut dyn Platform) {
        let top = self.cursor.top();
        for line in 0..MENU_HEIGHT {
            let posn = top + line;
            if posn >= self.cursor.size {
                platform.set_line(line, "");
                continue;
            }
            let slot = self.item_id(ctx, posn);
            match self.def.items.get(slot) {
                Some(item) => {
                    let grabbed = self.grabbed && posn == self.cursor.posn;
                    platform.set_line(line, &item.render(ctx, slot, grabbed));
                }
                None => platform.set_line(line, ""),
            }
        }
        platform.highlight(self.cursor.line);
    }

    /// Swap the item under the cursor with its neighbour at `to`.
    fn drag_to(&self, ctx: &mut C, from: usize, to: usize) {
        let Some(key) = self.def.ordering else {
            return;
        };
        if let Some(o) = ctx.ordering_mut(key) {
            ordering::swap(o, from, to);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Generic handlers
// ═══════════════════════════════════════════════════════════════════════════

pub fn up<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some(page) = menu.page_mut() else {
        return;
    };
    let from = page.cursor.posn;
    if page.cursor.up() && page.grabbed {
        page.drag_to(ctx, from, from - 1);
    }
    menu.event(MenuEvent::Refresh, ctx, platform);
}

pub fn down<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some(page) = menu.page_mut() else {
        return;
    };
    let from = page.cursor.posn;
    if page.cursor.down() && page.grabbed {
        page.drag_to(ctx, from, from + 1);
    }
    menu.event(MenuEvent::Refresh, ctx, platform);
}

pub fn pgup<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some(page) = menu.page_mut() else {
        return;
    };
    if page.grabbed {
        return;
    }
    page.cursor.page_up();
    menu.event(MenuEvent::Refresh, ctx, platform);
}

pub fn pgdown<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some(page) = menu.page_mut() else {
        return;
    };
    if page.grabbed {
        return;
    }
    page.cursor.page_down();
    menu.event(MenuEvent::Refresh, ctx, platform);
}

/// PLAY: grab the item under the cursor, or drop the grabbed one.
///
/// Dropping marks the menu changed and queues the ordering write.
pub fn drag_drop<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some(page) = menu.page_mut() else {
        return;
    };
    if page.def.ordering.is_none() || page.cursor.size == 0 {
        return;
    }
    if !menu.drop_grabbed(platform) {
        if let Some(page) = menu.page_mut() {
            page.grabbed = true;
            page.drag_source = page.cursor.posn;
        }
    }
    menu.event(MenuEvent::Refresh, ctx, platform);
}

/// Full redraw: title, lines and highlight.
pub fn display<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some(page) = menu.page() else {
        return;
    };
    platform.set_title(page.name());
    page.render(ctx, platform);
    platform.refresh();
}

/// Redraw the lines only.
pub fn refresh<C: MenuState>(menu: &mut Menu<C>, ctx: &mut C, platform: &mut dyn Platform) {
    let Some(page) = menu.page() else {
        return;
    };
    page.render(ctx, platform);
    platform.refresh();
}
