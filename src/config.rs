//! Application-wide constants and compile-time configuration.
//!
//! Menu geometry, timing parameters, buffer sizes and file names live
//! here so they can be tuned in one place. Runtime configuration is in
//! [`crate::settings`].

// Menu geometry

/// Characters per menu line.
pub const MENU_WIDTH: usize = 27;

/// Visible lines per menu page (the scrolling window height).
pub const MENU_HEIGHT: usize = 5;

/// Maximum number of pages held by one menu (browsable + auxiliary).
pub const MAX_PAGES: usize = 8;

/// Maximum number of items in an ordering permutation.
pub const MAX_ORDERING: usize = 16;

// Auto-repeat

/// Base unit of the auto-repeat delays (ms).
pub const AUTOREPEAT_DELAY_UNIT: u32 = 50;

/// Delay before the first repetition, in units.
pub const AUTOREPEAT_DELAY_LONG: u32 = 10;

/// Delay between later repetitions, in units.
pub const AUTOREPEAT_DELAY_SHORT: u32 = 4;

/// Step multiplier applied to adjustable items while repeating.
pub const REPEAT_ACCELERATION: i32 = 10;

// Action queue

/// Depth of the action FIFO between the input path and the main loop.
pub const ACTION_QUEUE_DEPTH: usize = 16;

// Named temperatures / CSV

/// Longest CSV line we accept (bytes); longer lines are truncated.
pub const MAX_CSV_LINE: usize = 100;

/// Longest record name kept in memory.
pub const MAX_NAME_LEN: usize = 24;

/// CSV field delimiter.
pub const CSV_DELIM: char = ';';

/// Colour temperature step for named-temperature items (K).
pub const COLOR_TEMP_STEP: i32 = 100;

// Persistence

/// Size of the buffer a settings file is serialized into or read from.
pub const SETTINGS_BUFFER_SIZE: usize = 2048;

/// Largest file the in-memory card of host builds holds.
pub const MEMORY_FILE_SIZE: usize = 8192;

/// Column width the parameter names are padded to in settings files.
pub const SETTINGS_KEY_WIDTH: usize = 30;

pub const SETTINGS_FILENAME: &str = "SETTINGS.INI";
pub const MENU_ORDER_FILENAME: &str = "MENU_ORDER.INI";
pub const NAMED_TEMPS_FILENAME: &str = "NAMED_TEMPS.CSV";
