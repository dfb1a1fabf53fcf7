//! Menu items.
//!
//! Items never own their values: adjustable kinds carry a [`Value`]
//! accessor pair into the menu state `C`. The accessor receives the item
//! slot, which lets one static item list serve a window of dynamically
//! loaded records.

use super::{Menu, MenuState};
use crate::config::MENU_WIDTH;
use crate::platform::Platform;
use core::fmt::{self, Write};
use heapless::String;

/// Action bound to SET on an item; receives the item slot.
pub type ItemAction<C> = fn(&mut Menu<C>, &mut C, &mut dyn Platform, usize);

/// Rendered menu line.
pub type Line = String<MENU_WIDTH>;

/// Accessor pair for a value owned by the menu state.
pub struct Value<C: 'static> {
    pub get: fn(&C, usize) -> i32,
    pub set: fn(&mut C, usize, i32),
}

/// Closed set of item kinds.
pub enum ItemKind<C: 'static> {
    /// Only does something on SET.
    Action,
    /// Enters another page of the same menu.
    Link(usize),
    /// Integer adjustable with LEFT/RIGHT.
    Int {
        value: Value<C>,
        min: i32,
        max: i32,
        step: i32,
    },
    /// Record from a dynamic source: name and bounds come from the state.
    Named {
        name: fn(&C, usize) -> &str,
        value: Value<C>,
        bounds: fn(&C, usize) -> (i32, i32),
        step: i32,
    },
}

pub struct Item<C: 'static> {
    pub label: &'static str,
    pub kind: ItemKind<C>,
    pub on_set: Option<ItemAction<C>>,
}

impl<C: MenuState> Item<C> {
    pub const fn action(label: &'static str, on_set: ItemAction<C>) -> Self {
        Self {
            label,
            kind: ItemKind::Action,
            on_set: Some(on_set),
        }
    }

    pub const fn link(label: &'static str, page: usize) -> Self {
        Self {
            label,
            kind: ItemKind::Link(page),
            on_set: None,
        }
    }

    pub const fn int(label: &'static str, value: Value<C>, min: i32, max: i32) -> Self {
        Self {
            label,
            kind: ItemKind::Int {
                value,
                min,
                max,
                step: 1,
            },
            on_set: None,
        }
    }

    /// Current value, for adjustable kinds.
    pub fn value(&self, ctx: &C, slot: usize) -> Option<i32> {
        match &self.kind {
            ItemKind::Int { value, .. } | ItemKind::Named { value, .. } => {
                Some((value.get)(ctx, slot))
            }
            _ => None,
        }
    }

    pub fn bounds(&self, ctx: &C, slot: usize) -> Option<(i32, i32)> {
        match &self.kind {
            ItemKind::Int { min, max, .. } => Some((*min, *max)),
            ItemKind::Named { bounds, .. } => Some(bounds(ctx, slot)),
            _ => None,
        }
    }

    /// Move the value by `steps` steps, clamped to the item bounds.
    /// Returns `true` if the value changed.
    pub fn adjust(&self, ctx: &mut C, slot: usize, steps: i32) -> bool {
        let (value, step) = match &self.kind {
            ItemKind::Int { value, step, .. } | ItemKind::Named { value, step, .. } => {
                (value, *step)
            }
            _ => return false,
        };
        let Some((min, max)) = self.bounds(ctx, slot) else {
            return false;
        };
        let current = (value.get)(ctx, slot);
        let next = current
            .saturating_add(steps.saturating_mul(step))
            .clamp(min, max.max(min));
        if next == current {
            return false;
        }
        (value.set)(ctx, slot, next);
        true
    }

    /// Text shown for this item; `grabbed` marks an item being dragged.
    pub fn render(&self, ctx: &C, slot: usize, grabbed: bool) -> Line {
        let mut out = Truncating(String::new());
        let marker = if grabbed { '>' } else { ' ' };
        let _ = self.write_line(&mut out, ctx, slot, marker);
        out.0
    }

    fn write_line<W: Write>(&self, out: &mut W, ctx: &C, slot: usize, marker: char) -> fmt::Result {
        const VALUE_WIDTH: usize = 6;
        const LABEL_WIDTH: usize = MENU_WIDTH - 1 - VALUE_WIDTH;

        out.write_char(marker)?;
        match &self.kind {
            ItemKind::Action => out.write_str(self.label),
            ItemKind::Link(_) => write!(out, "{:<w$}>", self.label, w = MENU_WIDTH - 2),
            ItemKind::Int { value, .. } => write!(
                out,
                "{:<lw$}{:>vw$}",
                self.label,
                (value.get)(ctx, slot),
                lw = LABEL_WIDTH,
                vw = VALUE_WIDTH
            ),
            ItemKind::Named { name, value, .. } => write!(
                out,
                "{:<lw$}{:>vw$}",
                name(ctx, slot),
                (value.get)(ctx, slot),
                lw = LABEL_WIDTH,
                vw = VALUE_WIDTH
            ),
        }
    }
}

/// Writer that drops whatever does not fit on the line.
struct Truncating(Line);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
