//! # romfsr
//!
//! A romfs image tool that lists, extracts and patches entries in place.
//!
//! romfs is a small read-only filesystem format built from singly-linked
//! per-directory entry chains. This crate walks an image embedded at an
//! arbitrary byte offset inside a host file and applies a configurable set
//! of per-entry actions: listing metadata, extracting one entry or the
//! whole tree, and substituting an entry's content bytes in place without
//! touching any structural field.
//!
//! ## Features
//!
//! - Images at any byte offset inside a larger file
//! - Bounds-checked decoding; a corrupt image fails instead of reading
//!   adjacent bytes or looping forever
//! - In-place, never-grow content substitution with a durable flush
//! - Pluggable per-entry actions applied in one traversal pass
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use romfsr::{Action, ActionSpec, ChildOffsetMode, ImageFile, Walker};
//!
//! fn main() -> anyhow::Result<()> {
//!     let image = Arc::new(ImageFile::open(Path::new("a.img"), 0)?);
//!     let walker = Walker::new(image, ChildOffsetMode::Fixed);
//!
//!     let mut actions: Vec<Box<dyn Action<ImageFile>>> =
//!         vec![ActionSpec::List.build()];
//!     walker.walk(&mut actions)?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod romfs;

pub use cli::Cli;
pub use error::{Result, RomfsError};
pub use io::{ImageFile, ImageStore};
pub use romfs::{
    Action, ActionSpec, ChildOffsetMode, Entry, ExtractAll, ExtractOne, FileKind, List,
    RomfsParser, Substitute, VolumeHeader, Walker, align_up_16,
};
