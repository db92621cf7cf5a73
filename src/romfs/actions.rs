//! Per-entry operations applied during traversal.
//!
//! Each configured action is an independent owned object; the walker hands
//! it every visited entry together with the accumulated parent path. An
//! action failure aborts the whole run.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::error::{Result, RomfsError};
use crate::io::ImageStore;

use super::parser::RomfsParser;
use super::structures::{Entry, FileKind};

/// Copy granularity for substitution.
const SUB_CHUNK: usize = 4096;

/// One per-entry operation, applied to every visited entry.
pub trait Action<R: ImageStore> {
    fn apply(&mut self, parser: &RomfsParser<R>, entry: &Entry, parent: &str) -> Result<()>;
}

/// A configured operation decoded from the command-line flag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSpec {
    List,
    ExtractOne { name: String },
    ExtractAll,
    Substitute { name: String, source: PathBuf },
}

impl ActionSpec {
    /// Decode a flag string and its positional arguments.
    ///
    /// Each flag character consumes its arguments left to right; a missing
    /// argument or unknown character aborts before any traversal starts.
    pub fn parse(flags: &str, args: &[String]) -> Result<Vec<ActionSpec>> {
        let mut specs = Vec::new();
        let mut args = args.iter();
        let mut next_arg = |flag: char| {
            args.next()
                .cloned()
                .ok_or(RomfsError::MissingArgument(flag))
        };
        for flag in flags.chars() {
            let spec = match flag {
                'l' => ActionSpec::List,
                'e' => ActionSpec::ExtractOne {
                    name: next_arg('e')?,
                },
                'a' => ActionSpec::ExtractAll,
                's' => ActionSpec::Substitute {
                    name: next_arg('s')?,
                    source: PathBuf::from(next_arg('s')?),
                },
                other => return Err(RomfsError::UnknownFlag(other)),
            };
            specs.push(spec);
        }
        Ok(specs)
    }

    pub fn build<R: ImageStore>(self) -> Box<dyn Action<R>> {
        match self {
            ActionSpec::List => Box::new(List),
            ActionSpec::ExtractOne { name } => Box::new(ExtractOne { name }),
            ActionSpec::ExtractAll => Box::new(ExtractAll),
            ActionSpec::Substitute { name, source } => Box::new(Substitute { name, source }),
        }
    }
}

/// Print one fixed-width metadata row per visited entry.
pub struct List;

impl List {
    /// Column banner, printed once before traversal.
    pub fn print_header() {
        println!(
            "{:<45}{:<15}{:<15}{:<15}{:<10}",
            "[ name ]", "[ next ]", "[ size ]", "[ type ]", "[ exec ]"
        );
    }

    fn format_row(entry: &Entry, parent: &str) -> String {
        let path = if entry.name.starts_with('.') {
            entry.name.clone()
        } else {
            format!("{}{}", parent, entry.name)
        };
        format!(
            "{:<45}{:<15}{:<15}{:<15}{:<10}",
            path,
            entry.next_offset,
            entry.size,
            entry.kind,
            if entry.executable { "Yes" } else { "No" }
        )
    }
}

impl<R: ImageStore> Action<R> for List {
    fn apply(&mut self, _parser: &RomfsParser<R>, entry: &Entry, parent: &str) -> Result<()> {
        println!("{}", Self::format_row(entry, parent));
        Ok(())
    }
}

/// Create `./parent/name` from one entry: directories are created, anything
/// else is written out with exactly `size` content bytes.
fn extract_entry<R: ImageStore>(parser: &RomfsParser<R>, entry: &Entry, parent: &str) -> Result<()> {
    let path = format!("./{}{}", parent, entry.name);
    if entry.kind == FileKind::Directory {
        fs::create_dir(&path)?;
        return Ok(());
    }

    let mut out = match File::create(&path) {
        Ok(file) => file,
        // The full path may not be creatable, e.g. when a single entry is
        // pulled out without its ancestor directories; drop to the bare
        // name in the current directory.
        Err(_) => File::create(&entry.name)?,
    };
    let content = parser.read_content(entry)?;
    out.write_all(&content)?;
    Ok(())
}

/// Extract the single entry whose name matches.
pub struct ExtractOne {
    pub name: String,
}

impl<R: ImageStore> Action<R> for ExtractOne {
    fn apply(&mut self, parser: &RomfsParser<R>, entry: &Entry, parent: &str) -> Result<()> {
        if entry.name != self.name {
            return Ok(());
        }
        extract_entry(parser, entry, parent)
    }
}

/// Extract every entry, skipping the `.` and `..` pseudo entries.
pub struct ExtractAll;

impl<R: ImageStore> Action<R> for ExtractAll {
    fn apply(&mut self, parser: &RomfsParser<R>, entry: &Entry, parent: &str) -> Result<()> {
        if entry.name.len() <= 2 && entry.name.starts_with('.') {
            return Ok(());
        }
        extract_entry(parser, entry, parent)
    }
}

/// Overwrite the content bytes of the entry whose name matches with bytes
/// read from a local file.
///
/// The entry keeps its header untouched: a source larger than the entry is
/// truncated to the entry's size, and a shorter one leaves the tail of the
/// old content in place. The write is flushed durably before the action
/// returns.
pub struct Substitute {
    pub name: String,
    pub source: PathBuf,
}

impl<R: ImageStore> Action<R> for Substitute {
    fn apply(&mut self, parser: &RomfsParser<R>, entry: &Entry, _parent: &str) -> Result<()> {
        if entry.name != self.name {
            return Ok(());
        }

        let mut source = File::open(&self.source)?;
        let mut chunk = [0u8; SUB_CHUNK];
        let mut written = 0u64;
        while written < entry.size {
            let n = source.read(&mut chunk)?;
            if n == 0 {
                break; // short source: the old tail stays
            }
            let take = (n as u64).min(entry.size - written) as usize;
            parser.write_content(entry, written, &chunk[..take])?;
            written += take as u64;
        }

        parser.flush()
    }
}
