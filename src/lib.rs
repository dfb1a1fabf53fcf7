//! hack420: input dispatch and menu engine of a DSLR firmware add-on.
//!
//! The add-on runs beside the vendor's event loop. Button transitions are
//! resolved against mode-dependent reaction tables and turned into queued
//! [`Action`]s; the main loop drains the queue through the
//! [`InputController`], which drives the paged menus, the shortcut keys
//! and the persisted settings. Everything outside that core (LCD, intercom,
//! memory card, beeper) is reached through the traits in [`platform`].
//!
//! Host tests: `cargo test`. With `--features log` the crate logs through
//! the `log` facade; target builds use `--features defmt`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

pub mod action;
pub mod config;
pub mod controller;
pub mod csv;
pub mod error;
pub mod input;
pub mod menu;
pub mod mode;
pub mod pattern;
pub mod platform;
pub mod reaction;
pub mod serialize;
pub mod settings;
pub mod shortcut;
pub mod storage;

pub use action::{Action, ActionFifo, HostAction};
pub use controller::{Context, InputController, MenuKind};
pub use error::{Error, Result};
pub use input::Button;
pub use mode::{Ambient, GuiMode, Mode};
pub use platform::Platform;
pub use settings::{MenuOrder, Settings};
pub use storage::{MemoryStorage, SettingsStore};
