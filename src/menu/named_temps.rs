//! Named colour temperature dialog.
//!
//! Opened with DP from the firmware's WB dialog. The records come from
//! `NAMED_TEMPS.CSV` one window at a time; each item can be tuned within
//! the record's bounds, and SET applies it as the custom colour temperature.

use super::item::{Item, ItemKind, Value};
use super::page::{self, Cursor, PageDef};
use super::paging::PagedWindow;
use super::{on, Bindings, Menu, MenuDef, MenuEvent};
use crate::action::Action;
use crate::config::{COLOR_TEMP_STEP, MENU_HEIGHT};
use crate::controller::Context;
use crate::platform::{ActionQueue, Color, Command, Intercom, Platform, WB_MODE_COLOR_TEMP};

const TEMP: Item<Context> = Item {
    label: "",
    kind: ItemKind::Named {
        name: temp_name,
        value: Value {
            get: temp_value,
            set: set_temp_value,
        },
        bounds: temp_bounds,
        step: COLOR_TEMP_STEP,
    },
    on_set: Some(apply),
};

static TEMP_ITEMS: [Item<Context>; MENU_HEIGHT] = [TEMP; MENU_HEIGHT];

static TEMPS_ACTIONS: Bindings<Context> = &[
    on(MenuEvent::Open, open),
    on(MenuEvent::In, page_down),
    on(MenuEvent::Out, page_up),
    on(MenuEvent::Up, up),
    on(MenuEvent::Prev, up),
    on(MenuEvent::Down, down),
    on(MenuEvent::Next, down),
    on(MenuEvent::Save, save),
];

static NAMED_TEMPS: PageDef<Context> = PageDef {
    name: "Named temperatures",
    items: &TEMP_ITEMS,
    actions: TEMPS_ACTIONS,
    ordering: None,
};

static DIALOG_ACTIONS: Bindings<Context> = &[
    on(MenuEvent::Set, super::set),
    on(MenuEvent::Up, page::up),
    on(MenuEvent::Down, page::down),
    on(MenuEvent::Prev, page::up),
    on(MenuEvent::Next, page::down),
    on(MenuEvent::Left, super::left),
    on(MenuEvent::Right, super::right),
    on(MenuEvent::Display, page::display),
    on(MenuEvent::Refresh, page::refresh),
    on(MenuEvent::Finish, super::finish),
];

pub static DIALOGS: MenuDef<Context> = MenuDef {
    color: Color::DarkBlue,
    pages: &[&NAMED_TEMPS],
    browsable: 1,
    actions: DIALOG_ACTIONS,
    ordering: None,
};

/// Open the dialog where it was last closed.
pub fn start(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    let top = usize::try_from(ctx.settings.named_temps_top_of_page_line).unwrap_or(0);
    let line = usize::try_from(ctx.settings.named_temps_cur_line).unwrap_or(0);
    ctx.named_temps.invalidate();
    ctx.named_temps.set_top(top);
    if let Some(page) = menu.page_at_mut(0) {
        page.cursor.park(line);
    }
    menu.current_posn = 0;
    menu.create(ctx, platform);
}

fn temp_name(ctx: &Context, slot: usize) -> &str {
    ctx.named_temps.record(slot).map_or("", |r| r.name.as_str())
}

fn temp_value(ctx: &Context, slot: usize) -> i32 {
    ctx.named_temps.record(slot).map_or(0, |r| r.value)
}

fn set_temp_value(ctx: &mut Context, slot: usize, value: i32) {
    if let Some(record) = ctx.named_temps.record_mut(slot) {
        record.value = value;
    }
}

fn temp_bounds(ctx: &Context, slot: usize) -> (i32, i32) {
    ctx.named_temps.record(slot).map_or((0, 0), |r| (r.min, r.max))
}

/// SET: use the value as custom white balance, then leave.
fn apply(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform, slot: usize) {
    let Some(record) = ctx.named_temps.record(slot) else {
        return;
    };
    let value = record.value;
    info!("colour temperature {}K", value);
    platform.send(Command::SetWb, WB_MODE_COLOR_TEMP);
    platform.send(Command::SetColorTemp, value);
    platform.beep();
    menu.finish(ctx, platform);
}

/// Run a window operation on the page cursor.
fn with_window(
    menu: &mut Menu<Context>,
    ctx: &mut Context,
    platform: &mut dyn Platform,
    op: fn(&mut PagedWindow, &mut Cursor, &mut dyn Platform),
) {
    let Some(page) = menu.page_mut() else {
        return;
    };
    op(&mut ctx.named_temps, &mut page.cursor, platform);
}

fn open(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    with_window(menu, ctx, platform, |w, c, p| w.open(c, p));
}

fn page_down(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    with_window(menu, ctx, platform, |w, c, p| w.page_down(c, p));
    menu.event(MenuEvent::Display, ctx, platform);
}

fn page_up(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    with_window(menu, ctx, platform, |w, c, p| w.page_up(c, p));
    menu.event(MenuEvent::Display, ctx, platform);
}

fn up(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    with_window(menu, ctx, platform, |w, c, p| {
        w.up(c, p);
    });
    menu.event(MenuEvent::Display, ctx, platform);
}

fn down(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    with_window(menu, ctx, platform, |w, c, p| {
        w.down(c, p);
    });
    menu.event(MenuEvent::Display, ctx, platform);
}

/// Remember the cursor so the dialog reopens on the same record.
fn save(menu: &mut Menu<Context>, ctx: &mut Context, platform: &mut dyn Platform) {
    let Some(page) = menu.page() else {
        return;
    };
    let line = page.cursor.line as i32;
    let top = ctx.named_temps.top() as i32;
    debug!("named temps saved at line {} top {}", line, top);
    let settings = &mut ctx.settings;
    if settings.named_temps_cur_line != line || settings.named_temps_top_of_page_line != top {
        settings.named_temps_cur_line = line;
        settings.named_temps_top_of_page_line = top;
        platform.enqueue(Action::SaveSettings);
    }
}
