mod local;

pub use local::ImageFile;

use std::io;

/// Random access over the byte region backing a romfs image.
///
/// Offsets are relative to the start of the image, not the start of the
/// host file. Writes go straight to the backing store and become durable
/// once `flush` returns.
pub trait ImageStore {
    /// Fill `buf` from the image starting at `offset`.
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Write all of `buf` into the image starting at `offset`.
    fn write_all_at(&self, offset: u64, buf: &[u8]) -> io::Result<()>;

    /// Make earlier writes durable.
    fn flush(&self) -> io::Result<()>;

    /// Number of addressable bytes in the image.
    fn len(&self) -> u64;
}
