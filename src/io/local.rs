use super::ImageStore;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

/// Image region backed by an ordinary file, opened read-write.
///
/// The romfs may start anywhere inside the host file; every offset handed
/// to the store is translated by the base before touching the file.
pub struct ImageFile {
    file: std::fs::File,
    base: u64,
    len: u64,
}

impl ImageFile {
    pub fn open(path: &Path, base: u64) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let total = file.metadata()?.len();
        if base > total {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("offset {base} lies past the end of {}", path.display()),
            ));
        }
        Ok(Self {
            file,
            base,
            len: total - base,
        })
    }
}

impl ImageStore for ImageFile {
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_exact_at(buf, self.base + offset)
        }

        #[cfg(not(unix))]
        {
            use std::io::{Read, Seek, SeekFrom};
            // No pread outside unix; seeking a shared handle is fine in a
            // single-threaded run.
            let mut file = &self.file;
            file.seek(SeekFrom::Start(self.base + offset))?;
            file.read_exact(buf)
        }
    }

    fn write_all_at(&self, offset: u64, buf: &[u8]) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.write_all_at(buf, self.base + offset)
        }

        #[cfg(not(unix))]
        {
            use std::io::{Seek, SeekFrom, Write};
            let mut file = &self.file;
            file.seek(SeekFrom::Start(self.base + offset))?;
            file.write_all(buf)
        }
    }

    fn flush(&self) -> io::Result<()> {
        self.file.sync_data()
    }

    fn len(&self) -> u64 {
        self.len
    }
}
