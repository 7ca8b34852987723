use crate::writer::FinishWrite;

use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

pub fn looks_like_gzip<R: Read + Seek>(mut r: R) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let pos = r.stream_position()?;
    let n = r.read(&mut magic)?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}

pub fn open_file(path: &Path) -> io::Result<File> {
    File::open(path)
}

pub fn has_gz_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

#[cfg(not(feature = "gzip"))]
pub fn gzip_disabled() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "gzip support not enabled (build with the `gzip` feature)",
    )
}

/// Buffered output behind a [`Destination`](crate::writer::Destination).
pub enum OutputStream {
    Stdout(BufWriter<io::Stdout>),
    File(BufWriter<File>),
    #[cfg(feature = "gzip")]
    Gzip(BufWriter<flate2::write::GzEncoder<File>>),
}

impl OutputStream {
    pub fn stdout() -> Self {
        OutputStream::Stdout(BufWriter::with_capacity(64 * 1024, io::stdout()))
    }

    /// Create `path` for writing, gzip-compressed when it ends in `.gz`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let f = File::create(path)?;
        if has_gz_extension(path) {
            #[cfg(feature = "gzip")]
            {
                let enc = flate2::write::GzEncoder::new(f, flate2::Compression::default());
                return Ok(OutputStream::Gzip(BufWriter::with_capacity(256 * 1024, enc)));
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(gzip_disabled());
            }
        }
        Ok(OutputStream::File(BufWriter::with_capacity(256 * 1024, f)))
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputStream::Stdout(w) => w.write(buf),
            OutputStream::File(w) => w.write(buf),
            #[cfg(feature = "gzip")]
            OutputStream::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Stdout(w) => w.flush(),
            OutputStream::File(w) => w.flush(),
            #[cfg(feature = "gzip")]
            OutputStream::Gzip(w) => w.flush(),
        }
    }
}

impl FinishWrite for OutputStream {
    fn finish_write(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Stdout(w) => w.flush(),
            OutputStream::File(w) => w.flush(),
            // final deflate block plus the CRC/size trailer
            #[cfg(feature = "gzip")]
            OutputStream::Gzip(w) => {
                w.flush()?;
                w.get_mut().try_finish()
            }
        }
    }
}
