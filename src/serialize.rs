//! Textual `key: value` format for [`Section`]s.
//!
//! ```text
//! [settings]
//! use_dpad                         : 1
//! iso_aeb                       [5]: 1,1,1,1,1
//! ```
//!
//! Names are padded to [`SETTINGS_KEY_WIDTH`] columns. Reading is lenient:
//! comments (`;`, `#`), blank lines, foreign sections and unknown keys are
//! skipped, missing keys keep whatever the struct already holds, and an
//! array reads at most as many values as both the file and the struct
//! provide.

use crate::config::SETTINGS_KEY_WIDTH;
use crate::settings::Section;
use core::fmt::{self, Write};

/// C-style integer parse: optional sign and leading digits, 0 otherwise.
pub fn atoi(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i32 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add(i32::from(b - b'0'));
    }
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Write a section header followed by one line per parameter.
pub fn write_section<S: Section, W: Write>(section: &S, out: &mut W) -> fmt::Result {
    writeln!(out, "[{}]", S::NAME)?;
    let mut result = Ok(());
    section.for_each(&mut |param| {
        if result.is_err() {
            return;
        }
        result = (|| {
            write!(out, "{:<width$}", param.name, width = SETTINGS_KEY_WIDTH)?;
            if param.array {
                write!(out, "[{}]: ", param.values.len())?;
            } else {
                out.write_str("   : ")?;
            }
            for (i, v) in param.values.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write!(out, "{}", v)?;
            }
            out.write_char('\n')
        })();
    });
    result
}

/// Key of a parameter line: the name and the declared value count.
fn parse_key(key: &str) -> (&str, usize) {
    let key = key.trim();
    let name_end = key.find(['[', ' ', '\t']).unwrap_or(key.len());
    let name = &key[..name_end];
    let count = key[name_end..]
        .trim_start()
        .strip_prefix('[')
        .and_then(|rest| rest.split(']').next())
        .map(|n| atoi(n).max(0) as usize)
        .unwrap_or(1);
    (name, count)
}

/// Apply every recognised line of `text` to `section`.
///
/// Returns the number of parameters read.
pub fn read_section<S: Section>(text: &str, section: &mut S) -> usize {
    let mut in_section = false;
    let mut applied = 0;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[') {
            let name = header.split(']').next().unwrap_or("").trim();
            in_section = name == S::NAME;
            continue;
        }
        if !in_section {
            continue;
        }
        let Some(split) = line.find([':', '=']) else {
            trace!("ignoring line without separator");
            continue;
        };
        let (name, count) = parse_key(&line[..split]);
        let Some(slots) = section.values_mut(name) else {
            debug!("unknown key {}", name);
            continue;
        };
        let n = count.min(slots.len());
        for (slot, value) in slots.iter_mut().zip(line[split + 1..].split(',')).take(n) {
            *slot = atoi(value);
        }
        applied += 1;
    }
    applied
}
