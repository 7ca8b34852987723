//! Paired-end reading and writing.
//!
//! Both mates are read strictly in lockstep: record N of the first file, then
//! record N of the second, before anything of record N+1. Pairing is purely
//! positional, so both files must hold the same number of records.

use crate::error::FastqError;
use crate::policy::ReaderOptions;
use crate::reader::FastqReader;
use crate::record::FastqRecord;
use crate::tabular::PairedTabularWriter;
use crate::writer::{
    Destination, FastqWriter, FinishWrite, OutputFormat, OutputStream, SequenceWriter,
};

use std::io::Write;
use std::iter::FusedIterator;
use std::path::Path;

pub type RecordPair = (FastqRecord, FastqRecord);

pub struct PairedFastqReader {
    end1: FastqReader,
    end2: FastqReader,
    pairs: u64,
    halted: bool,
}

impl PairedFastqReader {
    pub fn new(end1: FastqReader, end2: FastqReader) -> Self {
        Self {
            end1,
            end2,
            pairs: 0,
            halted: false,
        }
    }

    /// Open both mates with the same options (and thus the same quality offset).
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        path1: P,
        path2: Q,
        opts: ReaderOptions,
    ) -> Result<Self, FastqError> {
        let end1 = FastqReader::from_path(path1, opts.clone())?;
        let end2 = FastqReader::from_path(path2, opts)?;
        Ok(Self::new(end1, end2))
    }

    pub fn end1(&self) -> &FastqReader {
        &self.end1
    }

    pub fn end2(&self) -> &FastqReader {
        &self.end2
    }

    pub fn pairs_read(&self) -> u64 {
        self.pairs
    }

    pub fn fastx_writer(
        dest1: &Destination,
        dest2: &Destination,
    ) -> Result<Box<dyn PairedSequenceWriter + Send>, FastqError> {
        create_paired_writer(OutputFormat::Fastq, dest1, dest2)
    }

    pub fn tabular_writer(
        dest: &Destination,
    ) -> Result<Box<dyn PairedSequenceWriter + Send>, FastqError> {
        let out = dest.open()?;
        Ok(Box::new(PairedTabularWriter::new(out, dest.name())))
    }

    /// Next pair, `Ok(None)` once both files end together.
    pub fn read_next_pair(&mut self) -> Result<Option<RecordPair>, FastqError> {
        if self.halted {
            return Err(FastqError::Halted {
                input: format!(
                    "{} + {}",
                    self.end1.source_name(),
                    self.end2.source_name()
                ),
            });
        }
        let res = self.read_pair();
        if res.is_err() {
            self.halted = true;
        }
        res
    }

    fn read_pair(&mut self) -> Result<Option<RecordPair>, FastqError> {
        let r1 = self.end1.read_next()?;
        let r2 = self.end2.read_next()?;

        match (r1, r2) {
            (Some(r1), Some(r2)) => {
                self.pairs += 1;
                Ok(Some((r1, r2)))
            }
            (None, None) => Ok(None),
            (None, Some(_)) => Err(self.unequal(&self.end1, &self.end2)),
            (Some(_), None) => Err(self.unequal(&self.end2, &self.end1)),
        }
    }

    fn unequal(&self, ended: &FastqReader, remaining: &FastqReader) -> FastqError {
        log::warn!(
            "'{}' ended after {} records while '{}' still has data",
            ended.source_name(),
            self.pairs,
            remaining.source_name()
        );
        FastqError::UnequalRecordCounts {
            ended: ended.source_name().to_string(),
            remaining: remaining.source_name().to_string(),
        }
    }
}

impl Iterator for PairedFastqReader {
    type Item = Result<RecordPair, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_next_pair() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) | Err(FastqError::Halted { .. }) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl FusedIterator for PairedFastqReader {}

/// Sink for mate pairs.
pub trait PairedSequenceWriter {
    fn write_pair(&mut self, r1: &FastqRecord, r2: &FastqRecord) -> Result<(), FastqError>;
    fn flush(&mut self) -> Result<(), FastqError>;
    /// Flush and complete both outputs (gzip trailers included). Later writes fail.
    fn finish(&mut self) -> Result<(), FastqError>;
}

/// Open writers for a pair of outputs.
///
/// Tabular output puts both mates on one line, so only `dest1` is used.
pub fn create_paired_writer(
    format: OutputFormat,
    dest1: &Destination,
    dest2: &Destination,
) -> Result<Box<dyn PairedSequenceWriter + Send>, FastqError> {
    let writer: Box<dyn PairedSequenceWriter + Send> = match format {
        OutputFormat::Fastq => Box::new(PairedFastqWriter::new(
            FastqWriter::create(dest1)?,
            FastqWriter::create(dest2)?,
        )),
        OutputFormat::Tabular => PairedFastqReader::tabular_writer(dest1)?,
    };
    Ok(writer)
}

/// Two independent FASTQ writers. A failure on the second mate leaves the
/// first one already written.
pub struct PairedFastqWriter<W: Write = OutputStream> {
    end1: FastqWriter<W>,
    end2: FastqWriter<W>,
}

impl<W: Write> PairedFastqWriter<W> {
    pub fn new(end1: FastqWriter<W>, end2: FastqWriter<W>) -> Self {
        Self { end1, end2 }
    }

    pub fn write(&mut self, r1: &FastqRecord, r2: &FastqRecord) -> Result<(), FastqError> {
        self.end1.write(r1)?;
        self.end2.write(r2)
    }

    pub fn into_inner(self) -> Result<(W, W), FastqError> {
        Ok((self.end1.into_inner()?, self.end2.into_inner()?))
    }
}

impl<W: FinishWrite> PairedSequenceWriter for PairedFastqWriter<W> {
    fn write_pair(&mut self, r1: &FastqRecord, r2: &FastqRecord) -> Result<(), FastqError> {
        self.write(r1, r2)
    }

    fn flush(&mut self) -> Result<(), FastqError> {
        self.end1.flush()?;
        self.end2.flush()
    }

    fn finish(&mut self) -> Result<(), FastqError> {
        self.end1.finish()?;
        self.end2.finish()
    }
}
