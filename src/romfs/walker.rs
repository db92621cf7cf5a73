use std::sync::Arc;

use crate::error::{Result, RomfsError};
use crate::io::ImageStore;

use super::actions::Action;
use super::parser::RomfsParser;
use super::structures::{ENTRY_HEADER_SIZE, FileKind};

/// How the first entry of a subdirectory is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildOffsetMode {
    /// Fixed 32-byte skip past the directory's own header. Only correct
    /// while the directory name fits in a single 16-byte name block;
    /// longer names misindex their children.
    #[default]
    Fixed,
    /// Skip the directory's real header and padded name.
    Computed,
}

/// Depth-first traversal over the entry chains of an image.
///
/// Entries within one directory are visited in link order, and a
/// directory is visited before its children (pre-order). Every configured
/// action sees every visited entry.
pub struct Walker<R: ImageStore> {
    parser: RomfsParser<R>,
    child_offsets: ChildOffsetMode,
}

impl<R: ImageStore> Walker<R> {
    pub fn new(store: Arc<R>, child_offsets: ChildOffsetMode) -> Self {
        Self {
            parser: RomfsParser::new(store),
            child_offsets,
        }
    }

    pub fn parser(&self) -> &RomfsParser<R> {
        &self.parser
    }

    /// Validate the volume header and walk the whole tree.
    pub fn walk(&self, actions: &mut [Box<dyn Action<R>>]) -> Result<()> {
        let header = self.parser.read_volume_header()?;
        self.walk_dir(header.first_entry_offset, "/", actions)
    }

    fn walk_dir(
        &self,
        start: u64,
        parent: &str,
        actions: &mut [Box<dyn Action<R>>],
    ) -> Result<()> {
        let mut offset = start;
        let mut prev = None;
        loop {
            // Catches an entry linking straight back to itself; longer
            // loops are not detected.
            if prev == Some(offset) {
                return Err(RomfsError::BrokenChain(offset));
            }

            let entry = self.parser.read_entry(offset)?;

            for action in actions.iter_mut() {
                action.apply(&self.parser, &entry, parent)?;
            }

            if entry.kind == FileKind::Directory && entry.name != "." {
                let child = match self.child_offsets {
                    ChildOffsetMode::Fixed => offset + 2 * ENTRY_HEADER_SIZE,
                    ChildOffsetMode::Computed => entry.content_offset,
                };
                let child_parent = format!("{}{}/", parent, entry.name);
                self.walk_dir(child, &child_parent, actions)?;
            }

            prev = Some(offset);
            offset = entry.next_offset;
            if offset == 0 {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::testing::MemImage;
    use crate::romfs::structures::Entry;
    use crate::romfs::testing::ImageBuilder;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records the path and metadata of every visited entry.
    struct Record(Rc<RefCell<Vec<(String, FileKind, u64)>>>);

    impl Action<MemImage> for Record {
        fn apply(
            &mut self,
            _parser: &RomfsParser<MemImage>,
            entry: &Entry,
            parent: &str,
        ) -> Result<()> {
            self.0
                .borrow_mut()
                .push((format!("{parent}{}", entry.name), entry.kind, entry.size));
            Ok(())
        }
    }

    fn walk_and_record(bytes: Vec<u8>, mode: ChildOffsetMode) -> Result<Vec<(String, FileKind, u64)>> {
        let walker = Walker::new(Arc::new(MemImage::new(bytes)), mode);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut actions: Vec<Box<dyn Action<MemImage>>> =
            vec![Box::new(Record(Rc::clone(&seen)))];
        walker.walk(&mut actions)?;
        drop(actions);
        Ok(Rc::try_unwrap(seen).unwrap().into_inner())
    }

    #[test]
    fn visits_siblings_in_link_order() {
        let mut b = ImageBuilder::new("test");
        let a = b.entry(FileKind::RegularFile, false, b"one", b"aa");
        let c = b.entry(FileKind::RegularFile, false, b"two", b"bb");
        let d = b.entry(FileKind::RegularFile, false, b"three", b"cc");
        b.link(a, c);
        b.link(c, d);

        let seen = walk_and_record(b.finish(), ChildOffsetMode::Fixed).unwrap();
        let paths: Vec<&str> = seen.iter().map(|(p, _, _)| p.as_str()).collect();
        assert_eq!(paths, ["/one", "/two", "/three"]);
    }

    #[test]
    fn directories_are_visited_before_their_children() {
        // Root chain: "." -> "sub" -> "after"; "sub" holds one file. The
        // subdirectory entry must land between its own header and the next
        // root sibling.
        let mut b = ImageBuilder::new("test");
        let dot = b.entry(FileKind::Directory, false, b".", b"");
        let sub = b.entry(FileKind::Directory, false, b"sub", b"");
        let inner = b.entry(FileKind::RegularFile, false, b"inner.txt", b"hi");
        let after = b.entry(FileKind::RegularFile, false, b"after", b"zz");
        b.link(dot, sub);
        b.link(sub, after);
        assert_eq!(inner, sub + 32); // fixed-skip child lookup finds it

        let seen = walk_and_record(b.finish(), ChildOffsetMode::Fixed).unwrap();
        let paths: Vec<&str> = seen.iter().map(|(p, _, _)| p.as_str()).collect();
        assert_eq!(paths, ["/.", "/sub", "/sub/inner.txt", "/after"]);
    }

    #[test]
    fn computed_mode_matches_fixed_for_short_names() {
        let mut b = ImageBuilder::new("test");
        let sub = b.entry(FileKind::Directory, false, b"sub", b"");
        let inner = b.entry(FileKind::RegularFile, false, b"inner", b"x");
        let _ = inner;
        let _ = sub;

        let bytes = b.finish();
        let fixed = walk_and_record(bytes.clone(), ChildOffsetMode::Fixed).unwrap();
        let computed = walk_and_record(bytes, ChildOffsetMode::Computed).unwrap();
        assert_eq!(fixed, computed);
    }

    #[test]
    fn computed_mode_follows_long_directory_names() {
        // A 17-byte directory name spills into a second name block; the
        // fixed skip lands inside the name, the computed skip lands on the
        // child entry.
        let mut b = ImageBuilder::new("test");
        let dir = b.entry(FileKind::Directory, false, b"seventeen-bytes-x", b"");
        let inner = b.entry(FileKind::RegularFile, false, b"inner", b"x");
        assert_eq!(inner, dir + 48);

        let seen = walk_and_record(b.finish(), ChildOffsetMode::Computed).unwrap();
        let paths: Vec<&str> = seen.iter().map(|(p, _, _)| p.as_str()).collect();
        assert_eq!(paths, ["/seventeen-bytes-x", "/seventeen-bytes-x/inner"]);
    }

    #[test]
    fn dot_directory_is_not_recursed() {
        let mut b = ImageBuilder::new("test");
        let dot = b.entry(FileKind::Directory, false, b".", b"");
        let file = b.entry(FileKind::RegularFile, false, b"touch.css", b"body{color}\n");
        b.link(dot, file);

        let seen = walk_and_record(b.finish(), ChildOffsetMode::Fixed).unwrap();
        let paths: Vec<&str> = seen.iter().map(|(p, _, _)| p.as_str()).collect();
        assert_eq!(paths, ["/.", "/touch.css"]);
    }

    #[test]
    fn self_linking_entry_trips_the_cycle_guard() {
        let mut b = ImageBuilder::new("test");
        let looped = b.entry(FileKind::RegularFile, false, b"loop", b"");
        b.link(looped, looped);

        let err = walk_and_record(b.finish(), ChildOffsetMode::Fixed).unwrap_err();
        assert!(matches!(err, RomfsError::BrokenChain(off) if off == looped));
    }

    #[test]
    fn runaway_next_offset_is_out_of_bounds() {
        let mut b = ImageBuilder::new("test");
        let only = b.entry(FileKind::RegularFile, false, b"f", b"");
        b.link_raw(only, 0x7fff_0000);

        let err = walk_and_record(b.finish(), ChildOffsetMode::Fixed).unwrap_err();
        assert!(matches!(err, RomfsError::OutOfBounds { .. }));
    }
}
