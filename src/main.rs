//! Main entry point for the romfsr CLI.
//!
//! Decodes the action flag string, opens the image read-write at the
//! requested byte offset and runs one traversal pass with every configured
//! action. Any fatal error surfaces through the anyhow boundary with a
//! non-zero exit status.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use romfsr::{Action, ActionSpec, ChildOffsetMode, Cli, ImageFile, List, Walker};

/// Application entry point.
///
/// Parses command-line arguments, builds the configured actions and runs
/// a single traversal over the image.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Decode the flag string before touching the image so argument
    // mistakes fail fast.
    let specs = ActionSpec::parse(&cli.flags, &cli.args)?;

    let image = ImageFile::open(&cli.image, cli.offset)
        .with_context(|| format!("cannot open image {}", cli.image.display()))?;
    let image = Arc::new(image);

    let mode = if cli.exact_child_offsets {
        ChildOffsetMode::Computed
    } else {
        ChildOffsetMode::Fixed
    };
    let walker = Walker::new(image, mode);

    if specs.contains(&ActionSpec::List) {
        List::print_header();
    }

    let mut actions: Vec<Box<dyn Action<ImageFile>>> =
        specs.into_iter().map(ActionSpec::build).collect();
    walker.walk(&mut actions)?;

    Ok(())
}
