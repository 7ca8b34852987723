//! Tab-separated output: one line per record (or per pair).
//!
//! Fields are `id`, `nucleotides`, `quality`; a pair puts both mates on the
//! same line. Qualities keep the record's own style and offset, and a record
//! without qualities gets an empty quality field.

use crate::error::FastqError;
use crate::paired::PairedSequenceWriter;
use crate::record::FastqRecord;
use crate::writer::{FinishWrite, LineSink, OutputStream, SequenceWriter};

use std::io::Write;

fn push_fields(line: &mut Vec<u8>, record: &FastqRecord) {
    line.extend_from_slice(&record.id);
    line.push(b'\t');
    line.extend_from_slice(&record.seq);
    line.push(b'\t');
    line.extend_from_slice(&record.encoding.encode(&record.qual));
}

fn check_id(record: &FastqRecord, dest: &str) -> Result<(), FastqError> {
    if record.id.is_empty() {
        return Err(FastqError::EmptyId {
            dest: dest.to_string(),
        });
    }
    Ok(())
}

pub struct TabularWriter<W: Write = OutputStream> {
    sink: LineSink<W>,
    line: Vec<u8>,
}

impl<W: Write> TabularWriter<W> {
    pub fn new(out: W, name: impl Into<String>) -> Self {
        Self {
            sink: LineSink::new(out, name.into()),
            line: Vec::with_capacity(512),
        }
    }

    pub fn into_inner(self) -> Result<W, FastqError> {
        self.sink.into_inner()
    }
}

impl<W: FinishWrite> SequenceWriter for TabularWriter<W> {
    fn write_record(&mut self, record: &FastqRecord) -> Result<(), FastqError> {
        check_id(record, self.sink.name())?;
        self.line.clear();
        push_fields(&mut self.line, record);
        self.sink.line(b"", &self.line)
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

pub struct PairedTabularWriter<W: Write = OutputStream> {
    sink: LineSink<W>,
    line: Vec<u8>,
}

impl<W: Write> PairedTabularWriter<W> {
    pub fn new(out: W, name: impl Into<String>) -> Self {
        Self {
            sink: LineSink::new(out, name.into()),
            line: Vec::with_capacity(1024),
        }
    }

    pub fn into_inner(self) -> Result<W, FastqError> {
        self.sink.into_inner()
    }
}

impl<W: FinishWrite> PairedSequenceWriter for PairedTabularWriter<W> {
    fn write_pair(&mut self, r1: &FastqRecord, r2: &FastqRecord) -> Result<(), FastqError> {
        check_id(r1, self.sink.name())?;
        check_id(r2, self.sink.name())?;
        self.line.clear();
        push_fields(&mut self.line, r1);
        self.line.push(b'\t');
        push_fields(&mut self.line, r2);
        self.sink.line(b"", &self.line)
    }

    fn flush(&mut self) -> Result<(), FastqError> {
        self.sink.flush()
    }

    fn finish(&mut self) -> Result<(), FastqError> {
        self.sink.finish()
    }
}
