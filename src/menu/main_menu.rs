//! The add-on main menu.
//!
//! Three browsable pages (parameters, shortcuts, settings) in the order
//! given by the `main` ordering, plus two auxiliary pages: the menu options
//! reached by a link from the settings page, and the page list shown while
//! AV is held.

use super::item::{Item, Value};
use super::page::{self, PageDef};
use super::{on, Bindings, Menu, MenuDef, MenuEvent};
use crate::action::Action;
use crate::config::MENU_HEIGHT;
use crate::controller::Context;
use crate::mode::Shortcut;
use crate::platform::{ActionQueue, Color, Display, Platform};

pub const PAGE_PARAMS: usize = 0;
pub const PAGE_SHORTCUTS: usize = 1;
pub const PAGE_SETTINGS: usize = 2;
pub const PAGE_MENU_OPTIONS: usize = 3;
pub const PAGE_LIST: usize = 4;

/// Line of the page list that holds the current entry.
const LIST_LINE: usize = 2;

const LANGUAGES: i32 = 4;

/// Accessor pair for a field of [`crate::settings::Settings`].
macro_rules! setting {
    ($($field:tt)+) => {
        Value {
            get: |ctx: &Context, _| ctx.settings.$($field)+,
            set: |ctx: &mut Context, _, v| ctx.settings.$($field)+ = v,
        }
    };
}

static PARAMS_ITEMS: [Item<Context>; 6] = [
    Item::int("Auto ISO", setting!(autoiso_enable), 0, 1),
    Item::int("ISO AEB 100", setting!(iso_aeb[0]), 0, 1),
    Item::int("ISO AEB 200", setting!(iso_aeb[1]), 0, 1),
    Item::int("ISO AEB 400", setting!(iso_aeb[2]), 0, 1),
    Item::int("ISO AEB 800", setting!(iso_aeb[3]), 0, 1),
    Item::int("ISO AEB 1600", setting!(iso_aeb[4]), 0, 1),
];

static SHORTCUTS_ITEMS: [Item<Context>; 3] = [
    Item::int("JUMP", setting!(shortcut_jump), 0, Shortcut::COUNT as i32 - 1),
    Item::int("TRASH", setting!(shortcut_trash), 0, Shortcut::COUNT as i32 - 1),
    Item::int("DISP button", setting!(button_disp), 0, 1),
];

static SETTINGS_ITEMS: [Item<Context>; 4] = [
    Item::int("Use D-Pad", setting!(use_dpad), 0, 1),
    Item::link("Menu options", PAGE_MENU_OPTIONS),
    Item::int("Language", setting!(language), 0, LANGUAGES - 1),
    Item::int("Developers menu", setting!(developers_menu), 0, 1),
];

static MENU_OPTIONS_ITEMS: [Item<Context>; 4] = [
    Item::int("Navigate main", setting!(menu_navmain), 0, 1),
    Item::int("Enter main", setting!(menu_entermain), 0, 1),
    Item::int("Autosave", setting!(menu_autosave), 0, 1),
    Item::action("Back", back),
];

static LIST_ITEMS: [Item<Context>; 3] = [
    Item::link("Parameters", PAGE_PARAMS),
    Item::link("Shortcuts", PAGE_SHORTCUTS),
    Item::link("Settings", PAGE_SETTINGS),
];

static PARAMS: PageDef<Context> = PageDef {
    name: "Parameters",
    items: &PARAMS_ITEMS,
    actions: &[],
    ordering: Some("params"),
};

static SHORTCUTS: PageDef<Context> = PageDef {
    name: "Shortcuts",
    items: &SHORTCUTS_ITEMS,
    actions: &[],
    ordering: Some("shortcuts"),
};

static SETTINGS: PageDef<Context> = PageDef {
    name: "Settings",
    items: &SETTINGS_ITEMS,
    actions: &[],
    ordering: Some("settings"),
};

static MENU_OPTIONS: PageDef<Context> = PageDef {
    name: "Menu options",
    items: &MENU_OPTIONS_ITEMS,
    actions: &[],
    ordering: None,
};

static LIST_ACTIONS: Bindings<Context> = &[
    on(MenuEvent::Play, list_select),
    on(MenuEvent::Set, list_select),
    on(MenuEvent::Up, list_up),
    on(MenuEvent::Prev, list_up),
    on(MenuEvent::Down, list_down),
    on(MenuEvent::Next, list_down),
    on(MenuEvent::AvUp, list_hide),
    on(MenuEvent::Display, list_render),
    on(MenuEvent::Refresh, list_render),
];

static LIST: PageDef<Context> = PageDef {
    name: "hack420",
    items: &LIST_ITEMS,
    actions: LIST_ACTIONS,
    ordering: Some("main"),
};

static MAIN_ACTIONS: Bindings<Context> = &[
    on(MenuEvent::Play, page::drag_drop),
    on(MenuEvent::Up, page::up),
    on(MenuEvent::Down, page::down),
    on(MenuEvent::Set, super::set),
    on(MenuEvent::Left, super::left),
    on(MenuEvent::Right, super::right),
    on(MenuEvent::Next, super::next),
    on(MenuEvent::Prev, super::prev),
    on(MenuEvent::In, page::pgdown),
    on(MenuEvent::Out, page::pgup),
    on(MenuEvent::Display, page::display),
    on(MenuEvent::Refresh, page::refresh),
    on(MenuEvent::Finish, super::finish),
    on(MenuEvent::Save, save),
    on(MenuEvent::Av, list_display),
];

pub static MAIN_MENU: MenuDef<Context> = MenuDef {
    color: Color::Red,
    pages: &[&PARAMS, &SHORTCUTS, &SETTINGS, &MENU_OPTIONS, &LIST],
    browsable: 3,
    actions: MAIN_ACTIONS,
    ordering: Some("main"),
};

/// Open the main menu, on the last visited page if autosave is on.
pub fn start(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    if ctx.settings.menu_autosave != 0 {
        menu.current_posn = usize::try_from(ctx.settings.menu_last_page).unwrap_or(0);
    }
    menu.create(ctx, platform);
    if ctx.settings.menu_entermain != 0 {
        list_display(menu, ctx, platform);
    }
}

/// Remember the page and queue a settings write when anything changed.
fn save(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    let posn = menu.current_posn as i32;
    if ctx.settings.menu_last_page != posn || menu.changed {
        ctx.settings.menu_last_page = posn;
        platform.enqueue(Action::SaveSettings);
    }
}

fn back(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform, _slot: usize) {
    let posn = menu.current_posn;
    menu.set_posn(posn, ctx, platform);
}

// ═══════════════════════════════════════════════════════════════════════════
// Page list
// ═══════════════════════════════════════════════════════════════════════════

/// AV: show the page list on the current page.
pub fn list_display(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    let posn = menu.current_posn;
    if let Some(list) = menu.page_at_mut(PAGE_LIST) {
        list.cursor.park(posn);
    }
    menu.set_page(PAGE_LIST, ctx, platform);
}

fn list_step(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform, forward: bool) {
    let Some(list) = menu.page_mut() else {
        return;
    };
    let n = list.cursor.size;
    if n == 0 {
        return;
    }
    let posn = list.cursor.posn;
    let next = if forward { (posn + 1) % n } else { (posn + n - 1) % n };
    list.cursor.park(next);
    menu.event(MenuEvent::Display, ctx, platform);
}

fn list_up(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    list_step(menu, ctx, platform, false);
}

fn list_down(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    list_step(menu, ctx, platform, true);
}

/// SET / PLAY: jump to the selected page.
fn list_select(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    let Some(list) = menu.page() else {
        return;
    };
    let posn = list.cursor.posn;
    menu.set_posn(posn, ctx, platform);
}

/// AV released: jump to the selected page, unless nothing moved and the
/// list is set to stay open.
fn list_hide(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    let Some(list) = menu.page() else {
        return;
    };
    let posn = list.cursor.posn;
    if posn != menu.current_posn || ctx.settings.menu_navmain == 0 {
        menu.set_posn(posn, ctx, platform);
    }
}

/// Carousel: the selected entry sits on `LIST_LINE`, neighbours wrap
/// around. Lists shorter than the window leave the outer lines blank.
fn list_render(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    let Some(list) = menu.page() else {
        return;
    };
    let n = list.cursor.size;
    platform.set_title(list.name());
    for line in 0..MENU_HEIGHT {
        let offset = line as isize - LIST_LINE as isize;
        let shown = n as isize;
        let visible = shown >= MENU_HEIGHT as isize
            || (offset >= -((shown - 1) / 2) && offset <= shown / 2);
        if n == 0 || !visible {
            platform.set_line(line, "");
            continue;
        }
        let posn = (list.cursor.posn as isize + offset).rem_euclid(shown) as usize;
        let slot = list.item_id(ctx, posn);
        match list.def.items.get(slot) {
            Some(item) => platform.set_line(line, &item.render(ctx, slot, false)),
            None => platform.set_line(line, ""),
        }
    }
    platform.highlight(LIST_LINE);
    platform.refresh();
}
