use thiserror::Error;

/// Errors raised while decoding or mutating a romfs image.
///
/// Every variant is fatal for the run; there is no partial-success
/// continuation. `Io` covers both collaborator files (extraction targets,
/// substitution sources) and the backing image itself.
#[derive(Debug, Error)]
pub enum RomfsError {
    /// The 8-byte signature at the image base did not match.
    #[error("not recognized as a romfs image")]
    BadMagic,

    /// An entry carried a type code outside the 8-entry table.
    #[error("invalid entry type code {0}")]
    BadKind(u32),

    /// An offset or length implied by the image data would touch bytes
    /// past the end of the mapped region.
    #[error("access at offset {offset} ({len} bytes) runs past the image end ({size} bytes)")]
    OutOfBounds { offset: u64, len: u64, size: u64 },

    /// An entry chain linked back to the offset just visited.
    #[error("entry chain loops back to offset {0}, image is broken")]
    BrokenChain(u64),

    #[error("argument not supplied for flag '{0}'")]
    MissingArgument(char),

    #[error("unknown flag '{0}'")]
    UnknownFlag(char),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RomfsError>;
