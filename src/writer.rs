use crate::error::{FastqError, IoContext};
use crate::record::FastqRecord;
use crate::tabular::TabularWriter;

pub use crate::util::OutputStream;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Where a writer sends its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Path(PathBuf),
}

impl Destination {
    /// `""` and `"-"` mean stdout; anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg.is_empty() || arg == "-" {
            Destination::Stdout
        } else {
            Destination::Path(PathBuf::from(arg))
        }
    }

    pub fn name(&self) -> String {
        match self {
            Destination::Stdout => "stdout".to_string(),
            Destination::Path(p) => p.display().to_string(),
        }
    }

    pub(crate) fn open(&self) -> Result<OutputStream, FastqError> {
        match self {
            Destination::Stdout => Ok(OutputStream::stdout()),
            Destination::Path(p) => OutputStream::create(p)
                .map_err(|e| FastqError::io_err(e, IoContext::start(&self.name()))),
        }
    }
}

/// Output with a final step beyond `flush`, e.g. a compression trailer.
///
/// Nothing may be written after `finish_write` succeeds.
pub trait FinishWrite: Write {
    fn finish_write(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl FinishWrite for Vec<u8> {}
impl FinishWrite for File {}
impl FinishWrite for io::Stdout {}

impl<W: FinishWrite> FinishWrite for BufWriter<W> {
    fn finish_write(&mut self) -> io::Result<()> {
        self.flush()?;
        self.get_mut().finish_write()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Four-line FASTQ, same as the input.
    Fastq,
    /// One tab-separated line per record.
    Tabular,
}

/// Sink for single-end records.
pub trait SequenceWriter {
    fn write_record(&mut self, record: &FastqRecord) -> Result<(), FastqError>;
    fn flush(&mut self) -> Result<(), FastqError>;
    /// Flush and complete the output (gzip trailer included). Later writes fail.
    fn finish(&mut self) -> Result<(), FastqError>;
    fn destination(&self) -> &str;
}

/// Open `dest` and wrap it in a writer for `format`.
pub fn create_writer(
    format: OutputFormat,
    dest: &Destination,
) -> Result<Box<dyn SequenceWriter + Send>, FastqError> {
    let out = dest.open()?;
    log::debug!("writing {format:?} output to '{}'", dest.name());
    let writer: Box<dyn SequenceWriter + Send> = match format {
        OutputFormat::Fastq => Box::new(FastqWriter::new(out, dest.name())),
        OutputFormat::Tabular => Box::new(TabularWriter::new(out, dest.name())),
    };
    Ok(writer)
}

/// Line-oriented output with position tracking for diagnostics.
pub(crate) struct LineSink<W: Write> {
    out: W,
    name: String,
    line_num: u64,
    byte_pos: u64,
    finished: bool,
}

impl<W: Write> LineSink<W> {
    pub(crate) fn new(out: W, name: String) -> Self {
        Self {
            out,
            name,
            line_num: 0,
            byte_pos: 0,
            finished: false,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Writes `prefix`, `body` and a newline as one line.
    pub(crate) fn line(&mut self, prefix: &[u8], body: &[u8]) -> Result<(), FastqError> {
        if self.finished {
            return Err(self.io_err(io::Error::other("write after output was finished")));
        }
        self.put(prefix, body).map_err(|e| self.io_err(e))?;
        self.line_num += 1;
        self.byte_pos += (prefix.len() + body.len() + 1) as u64;
        Ok(())
    }

    fn put(&mut self, prefix: &[u8], body: &[u8]) -> io::Result<()> {
        self.out.write_all(prefix)?;
        self.out.write_all(body)?;
        self.out.write_all(b"\n")
    }

    pub(crate) fn flush(&mut self) -> Result<(), FastqError> {
        self.out.flush().map_err(|e| self.io_err(e))
    }

    pub(crate) fn into_inner(mut self) -> Result<W, FastqError> {
        self.flush()?;
        Ok(self.out)
    }

    fn io_err(&self, e: io::Error) -> FastqError {
        FastqError::io_err(
            e,
            IoContext {
                source: self.name.clone(),
                line_num: self.line_num + 1,
                byte_pos: self.byte_pos,
            },
        )
    }
}

impl<W: FinishWrite> LineSink<W> {
    pub(crate) fn finish(&mut self) -> Result<(), FastqError> {
        if self.finished {
            return Ok(());
        }
        self.out.finish_write().map_err(|e| self.io_err(e))?;
        self.finished = true;
        log::debug!("'{}': finished after {} lines", self.name, self.line_num);
        Ok(())
    }
}

/// Writes records back as four-line FASTQ, in each record's own quality style.
pub struct FastqWriter<W: Write = OutputStream> {
    sink: LineSink<W>,
    records: u64,
}

impl FastqWriter {
    pub fn create(dest: &Destination) -> Result<Self, FastqError> {
        Ok(Self::new(dest.open()?, dest.name()))
    }
}

impl<W: Write> FastqWriter<W> {
    pub fn new(out: W, name: impl Into<String>) -> Self {
        Self {
            sink: LineSink::new(out, name.into()),
            records: 0,
        }
    }

    /// Serialize one record.
    ///
    /// A record without qualities gets a separator line carrying `id2`, or
    /// `id` when `id2` is empty, followed by a synthesized quality line with
    /// one zero score per byte of that separator text.
    pub fn write(&mut self, record: &FastqRecord) -> Result<(), FastqError> {
        if record.id.is_empty() {
            return Err(FastqError::EmptyId {
                dest: self.sink.name().to_string(),
            });
        }

        self.sink.line(b"@", &record.id)?;
        self.sink.line(b"", &record.seq)?;

        if record.qual.is_empty() {
            let placeholder = if record.id2.is_empty() {
                &record.id
            } else {
                &record.id2
            };
            self.sink.line(b"+", placeholder)?;
            let zeros = vec![0; placeholder.len()];
            self.sink.line(b"", &record.encoding.encode(&zeros))?;
        } else {
            self.sink.line(b"+", &record.id2)?;
            self.sink.line(b"", &record.encoding.encode(&record.qual))?;
        }

        self.records += 1;
        log::trace!(
            "'{}': wrote record '{}'",
            self.sink.name(),
            String::from_utf8_lossy(&record.id)
        );
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Flush and hand back the underlying output.
    pub fn into_inner(self) -> Result<W, FastqError> {
        self.sink.into_inner()
    }
}

impl<W: FinishWrite> SequenceWriter for FastqWriter<W> {
    fn write_record(&mut self, record: &FastqRecord) -> Result<(), FastqError> {
        self.write(record)
    }

    fn flush(&mut self) -> Result<(), FastqError> {
        self.sink.flush()
    }

    fn finish(&mut self) -> Result<(), FastqError> {
        self.sink.finish()
    }

    fn destination(&self) -> &str {
        self.sink.name()
    }
}
