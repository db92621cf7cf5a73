use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "romfsr")]
#[command(version)]
#[command(about = "A romfs image tool that lists, extracts and patches entries", long_about = None)]
#[command(after_help = "Examples:\n  \
  romfsr a.img 802 le touch.css        list the image starting 802 bytes into\n  \
                                       a.img and extract touch.css here\n  \
  romfsr a.img 0 a                     extract the whole tree into the current\n  \
                                       directory\n  \
  romfsr a.img 0 s logo.png new.png    overwrite logo.png's content with the\n  \
                                       bytes of new.png\n\n\
Flags: l - list, e - extract one entry (1 arg), a - extract all with directory\n\
       structure, s - substitute entry content (2 args). The replacement must\n\
       be no larger than the entry it overwrites; headers are never rewritten.")]
pub struct Cli {
    /// File containing the romfs image
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Byte offset of the romfs within the image file
    #[arg(value_name = "OFFSET")]
    pub offset: u64,

    /// Action flag string, e.g. "le"
    #[arg(value_name = "FLAGS")]
    pub flags: String,

    /// Arguments consumed by the action flags, in flag order
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Derive child directory offsets from each directory's name length
    /// instead of the fixed 32-byte skip
    #[arg(long)]
    pub exact_child_offsets: bool,
}
