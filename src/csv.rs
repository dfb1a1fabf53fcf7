//! Tokenizer for `name;value;min;max` record files.
//!
//! Lines are split into borrowed field slices; nothing is copied until a
//! record is accepted into a [`Window`].
//!
//! Rules:
//!   - whitespace around lines and fields is ignored;
//!   - lines starting with `#` are comments and are not counted;
//!   - `"` quotes a field, so it may contain the delimiter;
//!   - a line with fewer than four fields ends the file;
//!   - only the first `MAX_CSV_LINE` bytes of a line are read.
//!
//! Card files are streamed line by line ([`fetch_from_storage`]), so
//! their size is not bounded by any buffer.

use crate::config::{CSV_DELIM, MAX_CSV_LINE, MAX_NAME_LEN, MENU_HEIGHT};
use crate::error::{Error, Result};
use crate::platform::{FileId, Storage};
use crate::serialize::atoi;
use heapless::{String, Vec};

const NUM_FIELDS: usize = 4;

/// One parsed record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: String<MAX_NAME_LEN>,
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl Record {
    pub fn new(name: &str, value: i32, min: i32, max: i32) -> Self {
        let mut n = String::new();
        for c in name.chars() {
            if n.push(c).is_err() {
                break;
            }
        }
        Self {
            name: n,
            value,
            min,
            max,
        }
    }
}

/// One screen worth of records.
pub type Window = Vec<Record, MENU_HEIGHT>;

/// Raw fields of a record line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fields<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub min: &'a str,
    pub max: &'a str,
}

impl Fields<'_> {
    pub fn to_record(&self) -> Record {
        Record::new(self.name, atoi(self.value), atoi(self.min), atoi(self.max))
    }
}

/// Split a (trimmed) line into its four fields.
pub fn split_fields(line: &str) -> Option<Fields<'_>> {
    let mut spans = [(0usize, 0usize); NUM_FIELDS];
    let mut field = 0;
    let mut start = 0;
    // Closing quote, if the current field was quoted.
    let mut end: Option<usize> = None;
    let mut in_quote = false;

    for (i, ch) in line.char_indices() {
        if ch == '"' {
            if in_quote {
                end = Some(i);
            } else {
                start = i + 1;
            }
            in_quote = !in_quote;
        } else if ch == CSV_DELIM && !in_quote {
            spans[field] = (start, end.unwrap_or(i));
            field += 1;
            if field == NUM_FIELDS {
                break;
            }
            start = i + 1;
            end = None;
        }
    }
    if field < NUM_FIELDS {
        if field < NUM_FIELDS - 1 {
            return None;
        }
        spans[field] = (start, end.unwrap_or(line.len()).max(start));
    }

    let field_at = move |n: usize| {
        let (s, e) = spans[n];
        line.get(s..e).unwrap_or("").trim()
    };
    Some(Fields {
        name: field_at(0),
        value: field_at(1),
        min: field_at(2),
        max: field_at(3),
    })
}

/// Longest prefix of `line` within `MAX_CSV_LINE` bytes.
fn clamp_line(line: &str) -> &str {
    if line.len() <= MAX_CSV_LINE {
        return line;
    }
    let mut cut = MAX_CSV_LINE;
    while !line.is_char_boundary(cut) {
        cut -= 1;
    }
    &line[..cut]
}

/// Trimmed content of a line, or `None` for a comment.
fn content(raw: &str) -> Option<&str> {
    let line = clamp_line(raw).trim();
    (!line.starts_with('#')).then_some(line)
}

/// Walk the records of `text`, skipping the first `start_at` of them.
///
/// `handler` receives the 1-based record number and the fields and
/// returns `false` to stop. Returns the number of the last record seen.
pub fn parse<'a, F>(text: &'a str, start_at: usize, mut handler: F) -> usize
where
    F: FnMut(usize, Fields<'a>) -> bool,
{
    let mut lineno = 0;
    for raw in text.lines() {
        let Some(line) = content(raw) else {
            continue;
        };
        lineno += 1;
        if lineno <= start_at {
            continue;
        }
        let Some(fields) = split_fields(line) else {
            break;
        };
        if !handler(lineno, fields) {
            break;
        }
    }
    lineno
}

/// Fill `window` with the records following `start`.
pub fn read_window(text: &str, start: usize, window: &mut Window) {
    window.clear();
    parse(text, start, |_, fields| window.push(fields.to_record()).is_ok() && !window.is_full());
}

/// Sequential reader over a card file, one line per read.
struct LineReader<'s, S: ?Sized> {
    storage: &'s mut S,
    file: FileId,
    offset: usize,
    buf: [u8; MAX_CSV_LINE + 1],
}

impl<'s, S: Storage + ?Sized> LineReader<'s, S> {
    fn new(storage: &'s mut S, file: FileId) -> Self {
        Self {
            storage,
            file,
            offset: 0,
            buf: [0; MAX_CSV_LINE + 1],
        }
    }

    /// Next line without its terminator, cut to `MAX_CSV_LINE` bytes.
    /// `None` at the end of the file.
    fn next_line(&mut self) -> Result<Option<&str>> {
        let n = self.storage.read_at(self.file, self.offset, &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }
        let newline = self.buf[..n].iter().position(|&b| b == b'\n');
        let len = match newline {
            Some(end) => {
                self.offset += end + 1;
                end
            }
            None if n < self.buf.len() => {
                self.offset += n;
                n
            }
            None => {
                self.offset += n;
                self.skip_rest()?;
                MAX_CSV_LINE
            }
        };

        let bytes = &self.buf[..len];
        match core::str::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            // A character split by the cut.
            Err(e) if e.error_len().is_none() => {
                Ok(Some(core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default()))
            }
            Err(_) => Err(Error::Format),
        }
    }

    /// Move past the end of an over-long line.
    fn skip_rest(&mut self) -> Result<()> {
        let mut scratch = [0u8; 32];
        loop {
            let n = self.storage.read_at(self.file, self.offset, &mut scratch)?;
            if n == 0 {
                return Ok(());
            }
            if let Some(end) = scratch[..n].iter().position(|&b| b == b'\n') {
                self.offset += end + 1;
                return Ok(());
            }
            self.offset += n;
        }
    }
}

/// Load the window of records following `start` from a card file.
///
/// The file is read line by line and reading stops once the window is
/// full, so only one window of records is ever held.
pub fn fetch_from_storage<S: Storage + ?Sized>(
    storage: &mut S,
    file: FileId,
    start: usize,
    window: &mut Window,
) -> Result<()> {
    window.clear();
    let mut lines = LineReader::new(storage, file);
    let mut lineno = 0;
    while !window.is_full() {
        let Some(raw) = lines.next_line()? else {
            break;
        };
        let Some(line) = content(raw) else {
            continue;
        };
        lineno += 1;
        if lineno <= start {
            continue;
        }
        let Some(fields) = split_fields(line) else {
            break;
        };
        if window.push(fields.to_record()).is_err() {
            break;
        }
    }
    debug!("{} records from line {}", window.len(), start);
    Ok(())
}
