use crate::error::{FastqError, FormatError, IoContext};
use crate::policy::ReaderOptions;
use crate::quality::QualityEncoding;
use crate::record::FastqRecord;
use crate::util::{has_gz_extension, looks_like_gzip, open_file};
use crate::writer::{Destination, OutputFormat, SequenceWriter, create_writer};

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    Stdin,
    /// Caller-supplied stream with a label used in diagnostics.
    Reader(String),
}

impl Source {
    pub fn name(&self) -> String {
        match self {
            Source::Path(p) => p.display().to_string(),
            Source::Stdin => "stdin".to_string(),
            Source::Reader(label) => label.clone(),
        }
    }
}

/// Position inside the four-line record grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    AwaitId,
    AwaitSeq,
    AwaitSep,
    AwaitQual,
    RecordComplete,
    Exhausted,
    Fatal,
}

impl ReadState {
    fn expecting(self) -> &'static str {
        match self {
            ReadState::AwaitSeq => "nucleotides",
            ReadState::AwaitSep => "ID-2",
            ReadState::AwaitQual => "quality-score",
            _ => "ID",
        }
    }
}

/// Strict, streaming FASTQ reader (plain/.gz).
///
/// Every record is exactly four lines. The first malformed line makes the
/// reader fail permanently; later calls return [`FastqError::Halted`].
pub struct FastqReader {
    src: Source,
    name: String,
    rdr: Box<dyn BufRead + Send>,
    opts: ReaderOptions,
    state: ReadState,
    line_num: u64,
    byte_pos: u64,
    records: u64,
}

impl FastqReader {
    /// Open from a file path; `-` reads stdin. Auto-detect `.gz` by extension or magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, FastqError> {
        let path = path.as_ref();
        if path.as_os_str() == "-" {
            return Ok(Self::stdin(opts));
        }
        let name = path.display().to_string();
        let f = open_file(path).map_err(|e| FastqError::io_err(e, IoContext::start(&name)))?;

        let is_gz = has_gz_extension(path) || looks_like_gzip(&f).unwrap_or(false);
        log::debug!("opening '{name}' (gzip: {is_gz})");

        let rdr: Box<dyn BufRead + Send> = if is_gz {
            #[cfg(feature = "gzip")]
            {
                let dec = flate2::read::MultiGzDecoder::new(f);
                Box::new(BufReader::with_capacity(256 * 1024, dec))
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(FastqError::io_err(
                    crate::util::gzip_disabled(),
                    IoContext::start(&name),
                ));
            }
        } else {
            open_plain(f).map_err(|e| FastqError::io_err(e, IoContext::start(&name)))?
        };

        Ok(Self::with_source(Source::Path(path.to_path_buf()), rdr, opts))
    }

    pub fn stdin(opts: ReaderOptions) -> Self {
        let rdr = BufReader::with_capacity(256 * 1024, io::stdin());
        Self::with_source(Source::Stdin, Box::new(rdr), opts)
    }

    /// Wrap an arbitrary `BufRead`; `label` names it in error messages.
    pub fn from_bufread<R: BufRead + Send + 'static>(
        reader: R,
        label: impl Into<String>,
        opts: ReaderOptions,
    ) -> Self {
        Self::with_source(Source::Reader(label.into()), Box::new(reader), opts)
    }

    fn with_source(src: Source, rdr: Box<dyn BufRead + Send>, opts: ReaderOptions) -> Self {
        Self {
            name: src.name(),
            src,
            rdr,
            opts,
            state: ReadState::AwaitId,
            line_num: 0,
            byte_pos: 0,
            records: 0,
        }
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    pub fn source_name(&self) -> &str {
        &self.name
    }

    /// Number of lines consumed so far.
    pub fn line_num(&self) -> u64 {
        self.line_num
    }

    pub fn records_read(&self) -> u64 {
        self.records
    }

    pub fn fastx_writer(dest: &Destination) -> Result<Box<dyn SequenceWriter + Send>, FastqError> {
        create_writer(OutputFormat::Fastq, dest)
    }

    pub fn tabular_writer(
        dest: &Destination,
    ) -> Result<Box<dyn SequenceWriter + Send>, FastqError> {
        create_writer(OutputFormat::Tabular, dest)
    }

    /// Next record, `Ok(None)` on a clean end of stream at a record boundary.
    pub fn read_next(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        match self.state {
            ReadState::Fatal => {
                return Err(FastqError::Halted {
                    input: self.name.clone(),
                });
            }
            ReadState::Exhausted => return Ok(None),
            _ => self.state = ReadState::AwaitId,
        }

        match self.read_one() {
            Ok(Some(rec)) => {
                self.state = ReadState::RecordComplete;
                self.records += 1;
                log::trace!("'{}': read record '{}'", self.name, rec.id_lossy());
                Ok(Some(rec))
            }
            Ok(None) => {
                self.state = ReadState::Exhausted;
                log::debug!("'{}': end of input after {} records", self.name, self.records);
                Ok(None)
            }
            Err(err) => {
                self.state = ReadState::Fatal;
                log::debug!("'{}': fatal: {err}", self.name);
                Err(err)
            }
        }
    }

    fn read_one(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        let checks = self.opts.validators;

        // Line 1: ID. End of stream here is the only clean stop.
        let Some(id_line) = self.next_line()? else {
            return Ok(None);
        };
        // The marker and a non-empty ID are required whatever the predicate says.
        let id = match id_line.strip_prefix(b"@") {
            Some(id) if !id.is_empty() && (checks.id_line)(&id_line) => id.to_vec(),
            _ => {
                return Err(self.format(FormatError::InvalidIdLine {
                    line: lossy(&id_line),
                }));
            }
        };
        self.state = ReadState::AwaitSeq;

        // Line 2: nucleotides
        let seq = self.expect_line()?;
        if !(checks.nucleotide_line)(&seq) {
            return Err(self.format(FormatError::InvalidNucleotides { line: lossy(&seq) }));
        }
        self.state = ReadState::AwaitSep;

        // Line 3: separator / ID-2
        let sep = self.expect_line()?;
        let id2 = match sep.strip_prefix(b"+") {
            Some(id2) if (checks.separator_line)(&sep) => id2.to_vec(),
            _ => {
                return Err(self.format(FormatError::InvalidSeparator { line: lossy(&sep) }));
            }
        };
        self.state = ReadState::AwaitQual;

        // Line 4: quality
        let qual_line = self.expect_line()?;
        let encoding =
            QualityEncoding::detect(qual_line.len(), seq.len(), self.opts.quality_offset);
        let qual = encoding.decode(&qual_line).map_err(|e| self.format(e))?;
        if qual.len() != seq.len() {
            return Err(self.format(FormatError::QualityLengthMismatch {
                seq: seq.len(),
                qual: qual.len(),
            }));
        }

        Ok(Some(FastqRecord {
            id,
            id2,
            seq,
            qual,
            encoding,
        }))
    }

    fn next_line(&mut self) -> Result<Option<Vec<u8>>, FastqError> {
        let mut buf = Vec::with_capacity(256);
        let n = self
            .rdr
            .read_until(b'\n', &mut buf)
            .map_err(|e| FastqError::io_err(e, self.ctx_next()))?;
        if n == 0 {
            return Ok(None);
        }
        self.line_num += 1;
        self.byte_pos += n as u64;
        if buf.ends_with(b"\n") {
            buf.pop();
        }
        if buf.ends_with(b"\r") {
            buf.pop();
        }
        Ok(Some(buf))
    }

    fn expect_line(&mut self) -> Result<Vec<u8>, FastqError> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(FastqError::fmt_err(
                FormatError::PrematureEof {
                    expecting: self.state.expecting(),
                },
                self.ctx_next(),
            )),
        }
    }

    fn format(&self, source: FormatError) -> FastqError {
        FastqError::fmt_err(source, self.ctx())
    }

    /// Context of the line just read.
    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            source: self.name.clone(),
            line_num: self.line_num,
            byte_pos: self.byte_pos,
        }
    }

    /// Context of the line about to be read.
    #[inline]
    fn ctx_next(&self) -> IoContext {
        IoContext {
            line_num: self.line_num + 1,
            ..self.ctx()
        }
    }
}

impl Iterator for FastqReader {
    type Item = Result<FastqRecord, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_next() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) | Err(FastqError::Halted { .. }) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl FusedIterator for FastqReader {}

#[cfg(feature = "mmap")]
fn open_plain(f: File) -> io::Result<Box<dyn BufRead + Send>> {
    use memmap2::Mmap;
    // Own the Mmap inside Cursor to avoid self-ref problems
    let mmap = unsafe { Mmap::map(&f) }?;
    Ok(Box::new(BufReader::with_capacity(
        512 * 1024,
        io::Cursor::new(mmap),
    )))
}

#[cfg(not(feature = "mmap"))]
fn open_plain(f: File) -> io::Result<Box<dyn BufRead + Send>> {
    Ok(Box::new(BufReader::with_capacity(256 * 1024, f)))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
