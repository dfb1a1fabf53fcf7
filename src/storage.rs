//! Persistence of the settings and the menu ordering.
//!
//! Both live on the memory card as small text files in the format of
//! [`crate::serialize`]. The store keeps a snapshot of what was last read
//! or written, so repeated save requests for unchanged state do not touch
//! the card.
//!
//! File layout:
//!   - `SETTINGS.INI`: one `[settings]` section.
//!   - `MENU_ORDER.INI`: one `[menu_order]` section with the page and item
//!     permutations of the main menu.

use crate::config::{MEMORY_FILE_SIZE, SETTINGS_BUFFER_SIZE};
use crate::csv::{self, Window};
use crate::error::{Error, Result};
use crate::platform::{FileId, LineSource, Storage};
use crate::serialize::{read_section, write_section};
use crate::settings::{MenuOrder, Section, Settings};
use heapless::{String, Vec};

/// Snapshot-tracking front end for the two settings files.
#[derive(Debug, Default)]
pub struct SettingsStore {
    /// Settings as last read or written; `None` when unknown.
    saved_settings: Option<Settings>,
    saved_order: Option<MenuOrder>,
}

impl SettingsStore {
    pub const fn new() -> Self {
        Self {
            saved_settings: None,
            saved_order: None,
        }
    }

    /// Reset both structures to defaults and overlay whatever the card
    /// holds. Returns `true` if at least one file was read.
    pub fn load<S: Storage + ?Sized>(
        &mut self,
        settings: &mut Settings,
        order: &mut MenuOrder,
        storage: &mut S,
    ) -> bool {
        *settings = Settings::default();
        *order = MenuOrder::default();

        let mut buf = [0u8; SETTINGS_BUFFER_SIZE];
        let found_settings = read_file(storage, FileId::Settings, &mut buf, settings);
        let found_order = read_file(storage, FileId::MenuOrder, &mut buf, order);

        self.saved_settings = Some(settings.clone());
        // A repaired ordering differs from the file; write it back on the
        // next save.
        self.saved_order = if order.repair() { None } else { Some(order.clone()) };

        found_settings || found_order
    }

    /// Write the settings unless they match the last snapshot.
    pub fn save_settings<S: Storage + ?Sized>(&mut self, settings: &Settings, storage: &mut S) -> Result<()> {
        if self.saved_settings.as_ref() == Some(settings) {
            debug!("settings: no changes to save");
            return Ok(());
        }
        write_file(storage, FileId::Settings, settings)?;
        self.saved_settings = Some(settings.clone());
        Ok(())
    }

    /// Write the menu ordering unless it matches the last snapshot.
    pub fn save_ordering<S: Storage + ?Sized>(&mut self, order: &MenuOrder, storage: &mut S) -> Result<()> {
        if self.saved_order.as_ref() == Some(order) {
            debug!("menu order: no changes to save");
            return Ok(());
        }
        write_file(storage, FileId::MenuOrder, order)?;
        self.saved_order = Some(order.clone());
        Ok(())
    }
}

fn read_file<S: Storage + ?Sized, T: Section>(
    storage: &mut S,
    file: FileId,
    buf: &mut [u8],
    section: &mut T,
) -> bool {
    match storage.read(file, buf) {
        Ok(len) => match core::str::from_utf8(&buf[..len]) {
            Ok(text) => {
                let n = read_section(text, section);
                info!("{} values from {}", n, file.name());
                true
            }
            Err(_) => {
                warn!("{} is not text, using defaults", file.name());
                false
            }
        },
        Err(Error::NotFound) => {
            info!("no {}, using defaults", file.name());
            false
        }
        Err(e) => {
            error!("reading {} failed: {}", file.name(), e);
            false
        }
    }
}

/// Serialize and write one section. A failed write leaves no partial
/// file behind.
fn write_file<S: Storage + ?Sized, T: Section>(storage: &mut S, file: FileId, section: &T) -> Result<()> {
    let mut text: String<SETTINGS_BUFFER_SIZE> = String::new();
    if write_section(section, &mut text).is_err() {
        error!("{} does not fit the buffer", file.name());
        return Err(Error::BufferOverflow);
    }

    match storage.write(file, text.as_bytes()) {
        Ok(()) => {
            info!("saved {} ({} bytes)", file.name(), text.len());
            Ok(())
        }
        Err(e) => {
            error!("writing {} failed: {}", file.name(), e);
            if let Err(e) = storage.remove(file) {
                warn!("removing {} failed: {}", file.name(), e);
            }
            Err(e)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// In-memory card
// ═══════════════════════════════════════════════════════════════════════════

type FileData = Vec<u8, MEMORY_FILE_SIZE>;

/// RAM-backed [`Storage`] for host builds and simulators.
///
/// `capacity` limits how many bytes one write may store; a longer write
/// keeps only the prefix that fit and fails, like a full card.
#[derive(Debug)]
pub struct MemoryStorage {
    files: [Option<FileData>; 3],
    capacity: usize,
}

impl MemoryStorage {
    pub const fn new() -> Self {
        Self {
            files: [None, None, None],
            capacity: MEMORY_FILE_SIZE,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.min(MEMORY_FILE_SIZE),
            ..Self::new()
        }
    }

    fn slot(file: FileId) -> usize {
        match file {
            FileId::Settings => 0,
            FileId::MenuOrder => 1,
            FileId::NamedTemps => 2,
        }
    }

    /// Put `text` on the card as `file`, ignoring the capacity.
    pub fn insert(&mut self, file: FileId, text: &str) -> Result<()> {
        let data = FileData::from_slice(text.as_bytes()).map_err(|_| Error::BufferOverflow)?;
        self.files[Self::slot(file)] = Some(data);
        Ok(())
    }

    pub fn contents(&self, file: FileId) -> Option<&str> {
        let data = self.files[Self::slot(file)].as_ref()?;
        core::str::from_utf8(data).ok()
    }

    pub fn exists(&self, file: FileId) -> bool {
        self.files[Self::slot(file)].is_some()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn read_at(&mut self, file: FileId, offset: usize, buf: &mut [u8]) -> Result<usize> {
        let data = self.files[Self::slot(file)].as_ref().ok_or(Error::NotFound)?;
        let rest = data.get(offset..).unwrap_or(&[]);
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        Ok(n)
    }

    fn write(&mut self, file: FileId, data: &[u8]) -> Result<()> {
        let fit = data.len().min(self.capacity);
        let stored = FileData::from_slice(&data[..fit]).map_err(|_| Error::BufferOverflow)?;
        self.files[Self::slot(file)] = Some(stored);
        if fit < data.len() {
            return Err(Error::Storage);
        }
        Ok(())
    }

    fn remove(&mut self, file: FileId) -> Result<()> {
        self.files[Self::slot(file)].take().map(|_| ()).ok_or(Error::NotFound)
    }
}

impl LineSource for MemoryStorage {
    fn fetch(&mut self, start: usize, window: &mut Window) -> Result<()> {
        csv::fetch_from_storage(self, FileId::NamedTemps, start, window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_keep_defaults() {
        let mut storage = MemoryStorage::new();
        let mut store = SettingsStore::new();
        let mut settings = Settings::default();
        settings.language = 3;
        let mut order = MenuOrder::default();
        order.main = [2, 1, 0];

        assert!(!store.load(&mut settings, &mut order, &mut storage));
        assert_eq!(settings, Settings::default());
        assert_eq!(order, MenuOrder::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let mut storage = MemoryStorage::new();
        let mut store = SettingsStore::new();

        let mut settings = Settings::default();
        settings.iso_aeb = [0, 1, 0, 1, 1];
        settings.shortcut_trash = 5;
        settings.menu_last_page = 2;
        store.save_settings(&settings, &mut storage).unwrap();

        let mut order = MenuOrder::default();
        order.params = [5, 4, 3, 2, 1, 0];
        store.save_ordering(&order, &mut storage).unwrap();

        let mut loaded = Settings::default();
        let mut loaded_order = MenuOrder::default();
        let mut fresh = SettingsStore::new();
        assert!(fresh.load(&mut loaded, &mut loaded_order, &mut storage));
        assert_eq!(loaded, settings);
        assert_eq!(loaded_order, order);
    }

    #[test]
    fn unchanged_state_is_not_rewritten() {
        let mut storage = MemoryStorage::new();
        let mut store = SettingsStore::new();
        let mut settings = Settings::default();
        let mut order = MenuOrder::default();
        store.load(&mut settings, &mut order, &mut storage);

        store.save_settings(&settings, &mut storage).unwrap();
        assert!(!storage.exists(FileId::Settings));

        settings.language = 1;
        store.save_settings(&settings, &mut storage).unwrap();
        assert!(storage.exists(FileId::Settings));
    }

    #[test]
    fn broken_ordering_is_repaired_and_rewritten() {
        let mut storage = MemoryStorage::new();
        storage
            .insert(FileId::MenuOrder, "[menu_order]\nmain [3]: 0,0,1\n")
            .unwrap();
        let mut store = SettingsStore::new();
        let mut settings = Settings::default();
        let mut order = MenuOrder::default();

        assert!(store.load(&mut settings, &mut order, &mut storage));
        assert_eq!(order.main, [0, 1, 2]);

        store.save_ordering(&order, &mut storage).unwrap();
        let text = storage.contents(FileId::MenuOrder).unwrap();
        assert!(text.contains("0,1,2"));
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let mut storage = MemoryStorage::with_capacity(16);
        let mut store = SettingsStore::new();
        let mut settings = Settings::default();
        settings.language = 2;

        assert_eq!(store.save_settings(&settings, &mut storage), Err(Error::Storage));
        assert!(!storage.exists(FileId::Settings));

        // Still dirty: a later save retries.
        let mut storage = MemoryStorage::new();
        store.save_settings(&settings, &mut storage).unwrap();
        assert!(storage.exists(FileId::Settings));
    }

    #[test]
    fn hand_edited_file_is_read_leniently() {
        let mut storage = MemoryStorage::new();
        storage
            .insert(
                FileId::Settings,
                "; edited on a PC\n[settings]\nlanguage = 2\nbogus: 9\niso_aeb [2]: 0,0\n",
            )
            .unwrap();
        let mut store = SettingsStore::new();
        let mut settings = Settings::default();
        let mut order = MenuOrder::default();

        assert!(store.load(&mut settings, &mut order, &mut storage));
        assert_eq!(settings.language, 2);
        assert_eq!(settings.iso_aeb, [0, 0, 1, 1, 1]);
        assert_eq!(settings.use_dpad, 1);
    }

    #[test]
    fn oversized_settings_file_keeps_defaults() {
        let mut text: String<4096> = String::new();
        text.push_str("[settings]\nlanguage = 2\n").unwrap();
        while text.len() <= SETTINGS_BUFFER_SIZE {
            text.push_str("; padding padding padding\n").unwrap();
        }
        let mut storage = MemoryStorage::new();
        storage.insert(FileId::Settings, &text).unwrap();
        let mut store = SettingsStore::new();
        let mut settings = Settings::default();
        let mut order = MenuOrder::default();

        assert!(!store.load(&mut settings, &mut order, &mut storage));
        assert_eq!(settings.language, Settings::default().language);
    }

    #[test]
    fn memory_card_serves_named_temps() {
        let mut storage = MemoryStorage::new();
        storage
            .insert(FileId::NamedTemps, "# temps\nA;3000;2500;3500\nB;5000;4500;5500\n")
            .unwrap();
        let mut window = Window::new();
        storage.fetch(1, &mut window).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].name.as_str(), "B");

        let mut empty = MemoryStorage::new();
        assert_eq!(empty.fetch(0, &mut window), Err(Error::NotFound));
    }
}
