//! Engine-level scenarios over a small test menu.

use super::item::{Item, Value};
use super::page::{self, PageDef};
use super::*;
use crate::action::{Action, HostAction};
use crate::config::{MENU_HEIGHT, MENU_WIDTH};
use crate::csv::Window;
use crate::error::{Error, Result};
use crate::mode::GuiMode;
use crate::pattern::{AfPattern, Orientation};
use crate::platform::{ActionQueue, Camera, Command, Display, FileId, Intercom, LineSource, Storage};
use crate::settings::is_permutation;
use core::cell::RefCell;
use std::string::String;
use std::vec::Vec;

// ═══════════════════════════════════════════════════════════════════════════
// Test state and platform
// ═══════════════════════════════════════════════════════════════════════════

struct Ctx {
    values: [i32; 8],
    items: [i32; 4],
    pages: [i32; 2],
    log: Vec<&'static str>,
}

impl Ctx {
    fn new() -> Self {
        Self {
            values: [50; 8],
            items: [0, 1, 2, 3],
            pages: [0, 1],
            log: Vec::new(),
        }
    }
}

impl MenuState for Ctx {
    fn ordering(&self, key: &str) -> Option<&[i32]> {
        match key {
            "items" => Some(&self.items),
            "pages" => Some(&self.pages),
            _ => None,
        }
    }

    fn ordering_mut(&mut self, key: &str) -> Option<&mut [i32]> {
        match key {
            "items" => Some(&mut self.items),
            "pages" => Some(&mut self.pages),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Mock {
    queue: RefCell<Vec<Action>>,
    title: String,
    lines: [String; MENU_HEIGHT],
    highlighted: Option<usize>,
    opened: usize,
    closed: usize,
    beeps: usize,
}

impl ActionQueue for Mock {
    fn enqueue(&self, action: Action) -> bool {
        self.queue.borrow_mut().push(action);
        true
    }
}

impl Intercom for Mock {
    fn send(&mut self, _command: Command, _value: i32) {}
}

impl Display for Mock {
    fn open(&mut self, _color: Color) {
        self.opened += 1;
    }
    fn set_title(&mut self, title: &str) {
        self.title = title.into();
    }
    fn set_line(&mut self, line: usize, text: &str) {
        self.lines[line] = text.into();
    }
    fn highlight(&mut self, line: usize) {
        self.highlighted = Some(line);
    }
    fn refresh(&mut self) {}
    fn close(&mut self) {
        self.closed += 1;
    }
}

impl LineSource for Mock {
    fn fetch(&mut self, _start: usize, window: &mut Window) -> Result<()> {
        window.clear();
        Ok(())
    }
}

impl Storage for Mock {
    fn read_at(&mut self, _file: FileId, _offset: usize, _buf: &mut [u8]) -> Result<usize> {
        Err(Error::NotFound)
    }
    fn write(&mut self, _file: FileId, _data: &[u8]) -> Result<()> {
        Ok(())
    }
    fn remove(&mut self, _file: FileId) -> Result<()> {
        Ok(())
    }
}

impl Camera for Mock {
    fn gui_mode(&self) -> GuiMode {
        GuiMode::Olc
    }
    fn af_point(&self) -> AfPattern {
        AfPattern::CENTER
    }
    fn orientation(&self) -> Orientation {
        Orientation::Horizontal
    }
}

impl Platform for Mock {
    fn beep(&mut self) {
        self.beeps += 1;
    }
    fn perform(&mut self, _action: HostAction) {}
}

// ═══════════════════════════════════════════════════════════════════════════
// Test menu
// ═══════════════════════════════════════════════════════════════════════════

const SLOT: Value<Ctx> = Value {
    get: |ctx, slot| ctx.values[slot],
    set: |ctx, slot, v| ctx.values[slot] = v,
};

fn mark_page(_: &mut Menu<Ctx>, ctx: &mut Ctx, _: &mut dyn Platform) {
    ctx.log.push("page");
}

fn mark_menu(_: &mut Menu<Ctx>, ctx: &mut Ctx, _: &mut dyn Platform) {
    ctx.log.push("menu");
}

fn page_save(_: &mut Menu<Ctx>, ctx: &mut Ctx, _: &mut dyn Platform) {
    ctx.log.push("page save");
}

fn menu_save(_: &mut Menu<Ctx>, ctx: &mut Ctx, _: &mut dyn Platform) {
    ctx.log.push("menu save");
}

fn run(_: &mut Menu<Ctx>, ctx: &mut Ctx, _: &mut dyn Platform, slot: usize) {
    ctx.log.push(if slot == 1 { "run" } else { "run?" });
}

static ALPHA_ITEMS: [Item<Ctx>; 4] = [
    Item::int("a0", SLOT, 0, 100),
    Item::int("a1", SLOT, 0, 100),
    Item::int("a2", SLOT, 0, 100),
    Item::int("a3", SLOT, 0, 100),
];

static BETA_ITEMS: [Item<Ctx>; 7] = [
    Item::link("to gamma", 2),
    Item::action("run", run),
    Item::int("b2", SLOT, 0, 100),
    Item::int("b3", SLOT, 0, 100),
    Item::int("b4", SLOT, 0, 100),
    Item::int("b5", SLOT, 0, 100),
    Item::int("b6", SLOT, 0, 100),
];

static ALPHA: PageDef<Ctx> = PageDef {
    name: "Alpha",
    items: &ALPHA_ITEMS,
    actions: &[on(MenuEvent::Dp, mark_page), on(MenuEvent::Save, page_save)],
    ordering: Some("items"),
};

static BETA: PageDef<Ctx> = PageDef {
    name: "Beta",
    items: &BETA_ITEMS,
    actions: &[],
    ordering: None,
};

static GAMMA: PageDef<Ctx> = PageDef {
    name: "Gamma",
    items: &[],
    actions: &[],
    ordering: None,
};

static ACTIONS: Bindings<Ctx> = &[
    on(MenuEvent::Dp, mark_menu),
    on(MenuEvent::Jump, mark_menu),
    on(MenuEvent::Play, page::drag_drop),
    on(MenuEvent::Up, page::up),
    on(MenuEvent::Down, page::down),
    on(MenuEvent::In, page::pgdown),
    on(MenuEvent::Out, page::pgup),
    on(MenuEvent::Set, set),
    on(MenuEvent::Left, left),
    on(MenuEvent::Right, right),
    on(MenuEvent::Next, next),
    on(MenuEvent::Prev, prev),
    on(MenuEvent::Display, page::display),
    on(MenuEvent::Refresh, page::refresh),
    on(MenuEvent::Finish, finish),
    on(MenuEvent::Save, menu_save),
];

static TEST_MENU: MenuDef<Ctx> = MenuDef {
    color: Color::Blue,
    pages: &[&ALPHA, &BETA, &GAMMA],
    browsable: 2,
    actions: ACTIONS,
    ordering: Some("pages"),
};

fn opened() -> (Menu<Ctx>, Ctx, Mock) {
    let mut menu = Menu::new(&TEST_MENU);
    let mut ctx = Ctx::new();
    let mut mock = Mock::default();
    menu.create(&mut ctx, &mut mock);
    (menu, ctx, mock)
}

fn send(menu: &mut Menu<Ctx>, ctx: &mut Ctx, mock: &mut Mock, events: &[MenuEvent]) {
    for &ev in events {
        menu.event(ev, ctx, mock);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn create_opens_first_page_and_draws_it() {
    let (menu, _ctx, mock) = opened();
    assert!(menu.is_open());
    assert_eq!(menu.current_page(), Some(0));
    assert_eq!(mock.opened, 1);
    assert_eq!(mock.title, "Alpha");
    assert_eq!(mock.highlighted, Some(0));
    assert_eq!(mock.lines[0].len(), MENU_WIDTH);
    assert!(mock.lines[0].starts_with(" a0"));
    assert!(mock.lines[0].ends_with("50"));
    // Four items, five lines.
    assert_eq!(mock.lines[4], "");
}

#[test]
fn page_binding_wins_over_menu_binding() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Dp, MenuEvent::Jump, MenuEvent::Trash]);
    assert_eq!(ctx.log, ["page", "menu"]);
}

#[test]
fn drag_moves_item_by_available_room() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Down, MenuEvent::Play]);
    assert!(menu.page().unwrap().grabbed);
    assert!(mock.lines[1].starts_with(">a1"));

    // Five steps requested, only two positions below.
    for _ in 0..5 {
        menu.event(MenuEvent::Down, &mut ctx, &mut mock);
    }
    assert_eq!(ctx.items, [0, 2, 3, 1]);
    assert_eq!(menu.page().unwrap().cursor.posn, 3);
    assert!(is_permutation(&ctx.items));
    assert!(mock.queue.borrow().is_empty());

    menu.event(MenuEvent::Play, &mut ctx, &mut mock);
    assert!(!menu.page().unwrap().grabbed);
    assert!(menu.changed);
    assert_eq!(*mock.queue.borrow(), [Action::SaveOrdering]);
}

#[test]
fn drag_up_is_clamped_at_top() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Down, MenuEvent::Down, MenuEvent::Play]);
    for _ in 0..4 {
        menu.event(MenuEvent::Up, &mut ctx, &mut mock);
    }
    menu.event(MenuEvent::Play, &mut ctx, &mut mock);
    assert_eq!(ctx.items, [2, 0, 1, 3]);
}

#[test]
fn moving_without_grab_keeps_ordering() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Down, MenuEvent::Down, MenuEvent::Up]);
    assert_eq!(ctx.items, [0, 1, 2, 3]);
    assert_eq!(menu.page().unwrap().cursor.posn, 1);
}

#[test]
fn paging_is_ignored_while_grabbed() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Play, MenuEvent::In]);
    assert_eq!(menu.page().unwrap().cursor.posn, 0);
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Play, MenuEvent::In]);
    assert_eq!(menu.page().unwrap().cursor.posn, 3);
}

#[test]
fn leaving_page_drops_grabbed_item() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Play, MenuEvent::Down, MenuEvent::Next]);
    assert_eq!(ctx.items, [1, 0, 2, 3]);
    assert_eq!(menu.current_page(), Some(1));
    assert!(!menu.page_at(0).unwrap().grabbed);
    assert!(menu.changed);
    assert_eq!(*mock.queue.borrow(), [Action::SaveOrdering]);

    // Back on the page nothing is grabbed; PLAY grabs anew.
    menu.event(MenuEvent::Prev, &mut ctx, &mut mock);
    menu.event(MenuEvent::Play, &mut ctx, &mut mock);
    assert!(menu.page().unwrap().grabbed);
    assert_eq!(mock.queue.borrow().len(), 1);
}

#[test]
fn closing_with_grabbed_item_keeps_the_move() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Play, MenuEvent::Down, MenuEvent::Finish]);
    assert!(!menu.is_open());
    assert!(!menu.page_at(0).unwrap().grabbed);
    assert_eq!(ctx.items, [1, 0, 2, 3]);
    assert!(menu.changed);
    assert_eq!(*mock.queue.borrow(), [Action::SaveOrdering]);
    assert_eq!(ctx.log, ["page save", "menu save"]);
}

#[test]
fn left_right_step_clamp_and_accelerate() {
    let (mut menu, mut ctx, mut mock) = opened();
    menu.event(MenuEvent::Right, &mut ctx, &mut mock);
    assert_eq!(ctx.values[0], 51);
    assert!(menu.changed);

    menu.repeating = true;
    menu.event(MenuEvent::Right, &mut ctx, &mut mock);
    assert_eq!(ctx.values[0], 61);
    for _ in 0..10 {
        menu.event(MenuEvent::Left, &mut ctx, &mut mock);
    }
    assert_eq!(ctx.values[0], 0);
    for _ in 0..20 {
        menu.event(MenuEvent::Right, &mut ctx, &mut mock);
    }
    assert_eq!(ctx.values[0], 100);
}

#[test]
fn values_follow_item_ordering() {
    let (mut menu, mut ctx, mut mock) = opened();
    ctx.items = [3, 2, 1, 0];
    menu.event(MenuEvent::Right, &mut ctx, &mut mock);
    assert_eq!(ctx.values[3], 51);
    assert_eq!(ctx.values[0], 50);
}

#[test]
fn wheel_cycles_through_browsable_pages() {
    let mut menu = Menu::new(&TEST_MENU);
    let mut ctx = Ctx::new();
    let mut mock = Mock::default();
    ctx.pages = [1, 0];
    menu.create(&mut ctx, &mut mock);
    assert_eq!(menu.current_page(), Some(1));

    menu.event(MenuEvent::Next, &mut ctx, &mut mock);
    assert_eq!((menu.current_posn, menu.current_page()), (1, Some(0)));
    menu.event(MenuEvent::Next, &mut ctx, &mut mock);
    assert_eq!((menu.current_posn, menu.current_page()), (0, Some(1)));
    menu.event(MenuEvent::Prev, &mut ctx, &mut mock);
    assert_eq!((menu.current_posn, menu.current_page()), (1, Some(0)));
    assert_eq!(mock.title, "Alpha");
}

#[test]
fn set_runs_item_action_or_follows_link() {
    let (mut menu, mut ctx, mut mock) = opened();
    menu.event(MenuEvent::Next, &mut ctx, &mut mock);
    assert_eq!(menu.current_page(), Some(1));

    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Down, MenuEvent::Set]);
    assert_eq!(ctx.log, ["run"]);

    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Up, MenuEvent::Set]);
    assert_eq!(menu.current_page(), Some(2));
    assert_eq!(mock.title, "Gamma");
    // The menu cursor still points at the browsable page.
    assert_eq!(menu.current_posn, 1);
}

#[test]
fn right_on_link_enters_page() {
    let (mut menu, mut ctx, mut mock) = opened();
    send(&mut menu, &mut ctx, &mut mock, &[MenuEvent::Next, MenuEvent::Right]);
    assert_eq!(menu.current_page(), Some(2));
}

#[test]
fn empty_page_ignores_navigation() {
    let (mut menu, mut ctx, mut mock) = opened();
    menu.set_page(2, &mut ctx, &mut mock);
    send(
        &mut menu,
        &mut ctx,
        &mut mock,
        &[
            MenuEvent::Down,
            MenuEvent::In,
            MenuEvent::Up,
            MenuEvent::Out,
            MenuEvent::Right,
            MenuEvent::Set,
            MenuEvent::Play,
        ],
    );
    let cursor = menu.page().unwrap().cursor;
    assert_eq!((cursor.posn, cursor.line), (0, 0));
    assert!(mock.lines.iter().all(|l| l.is_empty()));
    assert!(mock.queue.borrow().is_empty());
}

#[test]
fn long_page_scrolls_window() {
    let (mut menu, mut ctx, mut mock) = opened();
    menu.event(MenuEvent::Next, &mut ctx, &mut mock);
    for _ in 0..6 {
        menu.event(MenuEvent::Down, &mut ctx, &mut mock);
    }
    let cursor = menu.page().unwrap().cursor;
    assert_eq!((cursor.posn, cursor.line), (6, MENU_HEIGHT - 1));
    assert!(mock.lines[0].starts_with(" b2"));
    assert!(mock.lines[4].starts_with(" b6"));
    assert_eq!(mock.highlighted, Some(MENU_HEIGHT - 1));
}

#[test]
fn finish_saves_page_then_menu_and_closes() {
    let (mut menu, mut ctx, mut mock) = opened();
    menu.event(MenuEvent::Finish, &mut ctx, &mut mock);
    assert_eq!(ctx.log, ["page save", "menu save"]);
    assert!(!menu.is_open());
    assert_eq!(mock.closed, 1);

    // Closed menus ignore events and do not close twice.
    menu.event(MenuEvent::Finish, &mut ctx, &mut mock);
    menu.event(MenuEvent::Dp, &mut ctx, &mut mock);
    assert_eq!(mock.closed, 1);
    assert_eq!(ctx.log, ["page save", "menu save", "menu"]);
}

#[test]
fn create_clamps_stale_position() {
    let mut menu = Menu::new(&TEST_MENU);
    let mut ctx = Ctx::new();
    let mut mock = Mock::default();
    menu.current_posn = 7;
    menu.create(&mut ctx, &mut mock);
    assert_eq!(menu.current_posn, 1);
    assert_eq!(menu.current_page(), Some(1));
}
