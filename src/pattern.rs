//! Direction-driven selection walker and the AF pattern graph.
//!
//! A selection value moves through a static adjacency table: every node
//! lists its successor under each of the five directions. Lookup is a
//! linear scan by equality; values absent from the table fall back to the
//! table's base node instead of failing.

use crate::platform::{Command, Intercom};
use crate::settings::Settings;

/// Direction pressed on the d-pad (SET counts as `Center`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Center,
    Up,
    Down,
    Left,
    Right,
}

/// Successors of one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Adjacency<T> {
    pub node: T,
    pub center: T,
    pub up: T,
    pub down: T,
    pub left: T,
    pub right: T,
}

impl<T: Copy> Adjacency<T> {
    const fn toward(&self, direction: Direction) -> T {
        match direction {
            Direction::Center => self.center,
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Static graph of selection states.
pub struct AdjacencyTable<T: 'static> {
    entries: &'static [Adjacency<T>],
    base: T,
}

impl<T: Copy + PartialEq> AdjacencyTable<T> {
    pub const fn new(entries: &'static [Adjacency<T>], base: T) -> Self {
        Self { entries, base }
    }

    /// Node reached from `current` by pressing `direction`.
    pub fn next(&self, current: T, direction: Direction) -> T {
        self.entries
            .iter()
            .find(|entry| entry.node == current)
            .map(|entry| entry.toward(direction))
            .unwrap_or(self.base)
    }

    pub fn base(&self) -> T {
        self.base
    }

    pub fn nodes(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// AF patterns
// ═══════════════════════════════════════════════════════════════════════════

/// Bitset over the nine AF points, as understood by the camera's
/// SET_AF_POINT command.
///
/// ```text
///        T
///     TL   TR
///   L    C    R
///     BL   BR
///        B
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AfPattern(pub u16);

const C: u16 = 0x0001;
const T: u16 = 0x0002;
const B: u16 = 0x0004;
const TL: u16 = 0x0008;
const TR: u16 = 0x0010;
const BL: u16 = 0x0020;
const BR: u16 = 0x0040;
const L: u16 = 0x0080;
const R: u16 = 0x0100;

impl AfPattern {
    pub const CENTER: Self = Self(C);
    pub const SQUARE: Self = Self(C | TL | TR | BL | BR);
    pub const HLINE: Self = Self(L | C | R);
    pub const VLINE: Self = Self(T | C | B);
    pub const ALL: Self = Self(C | T | B | TL | TR | BL | BR | L | R);

    pub const TOP: Self = Self(T);
    pub const TOPTRIANGLE: Self = Self(T | TL | TR);
    pub const TOPDIAMOND: Self = Self(T | TL | TR | C);
    pub const TOPHALF: Self = Self(T | TL | TR | L | C | R);

    pub const BOTTOM: Self = Self(B);
    pub const BOTTOMTRIANGLE: Self = Self(B | BL | BR);
    pub const BOTTOMDIAMOND: Self = Self(B | BL | BR | C);
    pub const BOTTOMHALF: Self = Self(B | BL | BR | L | C | R);

    pub const TOPLEFT: Self = Self(TL);
    pub const TOPRIGHT: Self = Self(TR);
    pub const BOTTOMLEFT: Self = Self(BL);
    pub const BOTTOMRIGHT: Self = Self(BR);

    pub const LEFT: Self = Self(L);
    pub const LEFTTRIANGLE: Self = Self(L | TL | BL);
    pub const LEFTDIAMOND: Self = Self(L | TL | BL | C);
    pub const LEFTHALF: Self = Self(L | TL | BL | T | C | B);

    pub const RIGHT: Self = Self(R);
    pub const RIGHTTRIANGLE: Self = Self(R | TR | BR);
    pub const RIGHTDIAMOND: Self = Self(R | TR | BR | C);
    pub const RIGHTHALF: Self = Self(R | TR | BR | T | C | B);

    /// Number of active AF points.
    pub const fn points(self) -> u32 {
        self.0.count_ones()
    }
}

const fn afp(
    node: AfPattern,
    center: AfPattern,
    up: AfPattern,
    down: AfPattern,
    left: AfPattern,
    right: AfPattern,
) -> Adjacency<AfPattern> {
    Adjacency {
        node,
        center,
        up,
        down,
        left,
        right,
    }
}

use AfPattern as P;

#[rustfmt::skip]
static AF_PATTERN_GRAPH: [Adjacency<AfPattern>; 25] = [
    //   pattern            center      up                down               left             right
    afp(P::CENTER,         P::SQUARE,  P::TOPHALF,       P::BOTTOMHALF,     P::LEFTHALF,     P::RIGHTHALF),
    afp(P::SQUARE,         P::HLINE,   P::TOPHALF,       P::BOTTOMHALF,     P::LEFTHALF,     P::RIGHTHALF),

    afp(P::TOP,            P::CENTER,  P::TOP,           P::TOPTRIANGLE,    P::TOPLEFT,      P::TOPRIGHT),
    afp(P::TOPTRIANGLE,    P::CENTER,  P::TOP,           P::TOPDIAMOND,     P::LEFTTRIANGLE, P::RIGHTTRIANGLE),
    afp(P::TOPDIAMOND,     P::CENTER,  P::TOPTRIANGLE,   P::TOPHALF,        P::LEFTDIAMOND,  P::RIGHTDIAMOND),
    afp(P::TOPHALF,        P::CENTER,  P::TOPDIAMOND,    P::HLINE,          P::LEFTHALF,     P::RIGHTHALF),

    afp(P::BOTTOM,         P::CENTER,  P::BOTTOMTRIANGLE, P::BOTTOM,        P::BOTTOMLEFT,   P::BOTTOMRIGHT),
    afp(P::BOTTOMTRIANGLE, P::CENTER,  P::BOTTOMDIAMOND, P::BOTTOM,         P::LEFTTRIANGLE, P::RIGHTTRIANGLE),
    afp(P::BOTTOMDIAMOND,  P::CENTER,  P::BOTTOMHALF,    P::BOTTOMTRIANGLE, P::LEFTDIAMOND,  P::RIGHTDIAMOND),
    afp(P::BOTTOMHALF,     P::CENTER,  P::HLINE,         P::BOTTOMDIAMOND,  P::LEFTHALF,     P::RIGHTHALF),

    afp(P::TOPLEFT,        P::CENTER,  P::TOP,           P::BOTTOMLEFT,     P::LEFT,         P::TOPRIGHT),
    afp(P::TOPRIGHT,       P::CENTER,  P::TOP,           P::BOTTOMRIGHT,    P::TOPLEFT,      P::RIGHT),
    afp(P::BOTTOMLEFT,     P::CENTER,  P::TOPLEFT,       P::BOTTOM,         P::LEFT,         P::BOTTOMRIGHT),
    afp(P::BOTTOMRIGHT,    P::CENTER,  P::TOPRIGHT,      P::BOTTOM,         P::BOTTOMLEFT,   P::RIGHT),

    afp(P::LEFT,           P::CENTER,  P::TOPLEFT,       P::BOTTOMLEFT,     P::LEFT,         P::LEFTTRIANGLE),
    afp(P::LEFTTRIANGLE,   P::CENTER,  P::TOPTRIANGLE,   P::BOTTOMTRIANGLE, P::LEFT,         P::LEFTDIAMOND),
    afp(P::LEFTDIAMOND,    P::CENTER,  P::TOPDIAMOND,    P::BOTTOMDIAMOND,  P::LEFTTRIANGLE, P::LEFTHALF),
    afp(P::LEFTHALF,       P::CENTER,  P::TOPHALF,       P::BOTTOMHALF,     P::LEFTDIAMOND,  P::VLINE),

    afp(P::RIGHT,          P::CENTER,  P::TOPRIGHT,      P::BOTTOMRIGHT,    P::RIGHTTRIANGLE, P::RIGHT),
    afp(P::RIGHTTRIANGLE,  P::CENTER,  P::TOPTRIANGLE,   P::BOTTOMTRIANGLE, P::RIGHTDIAMOND, P::RIGHT),
    afp(P::RIGHTDIAMOND,   P::CENTER,  P::TOPDIAMOND,    P::BOTTOMDIAMOND,  P::RIGHTHALF,    P::RIGHTTRIANGLE),
    afp(P::RIGHTHALF,      P::CENTER,  P::TOPHALF,       P::BOTTOMHALF,     P::VLINE,        P::RIGHTDIAMOND),

    afp(P::HLINE,          P::VLINE,   P::TOPHALF,       P::BOTTOMHALF,     P::LEFTHALF,     P::RIGHTHALF),
    afp(P::VLINE,          P::ALL,     P::TOPHALF,       P::BOTTOMHALF,     P::LEFTHALF,     P::RIGHTHALF),

    afp(P::ALL,            P::CENTER,  P::TOPHALF,       P::BOTTOMHALF,     P::LEFTHALF,     P::RIGHTHALF),
];

/// AF pattern graph; unknown patterns fall back to the center point.
pub static AF_PATTERNS: AdjacencyTable<AfPattern> =
    AdjacencyTable::new(&AF_PATTERN_GRAPH, AfPattern::CENTER);

/// Camera orientation as reported by the tilt sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Horizontal,
    VerticalLeft,
    VerticalRight,
}

/// Move the AF selection one step and remember it for this orientation.
pub fn apply_af_pattern<I: Intercom + ?Sized>(
    intercom: &mut I,
    settings: &mut Settings,
    current: AfPattern,
    orientation: Orientation,
    direction: Direction,
) -> AfPattern {
    let next = AF_PATTERNS.next(current, direction);
    debug!(
        "AF pattern {} -> {} ({:?})",
        current.0,
        next.0,
        direction
    );

    intercom.send(Command::SetAfPoint, i32::from(next.0));

    let slot = match orientation {
        Orientation::Horizontal => &mut settings.af_pattern_horizontal,
        Orientation::VerticalLeft => &mut settings.af_pattern_vertical_left,
        Orientation::VerticalRight => &mut settings.af_pattern_vertical_right,
    };
    *slot = i32::from(next.0);

    next
}
