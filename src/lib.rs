//! Strict streaming FASTQ reader/writer with paired-end support.
//!
//! - Exactly four lines per record; the first malformed line is fatal.
//! - Quality lines are either one character per base or whitespace-separated
//!   integers, detected per record by length, and normalized with a fixed offset.
//! - Writers reproduce each record's original quality style; quality-less
//!   records get a synthesized separator and quality line.
//! - Paired-end files are read in lockstep and must have equal record counts.
//! - Plain and `.gz` input/output; optional `mmap` for plain input files.

pub mod error;
pub mod paired;
pub mod policy;
pub mod quality;
pub mod reader;
pub mod record;
pub mod tabular;
pub mod writer;
mod util;

pub use crate::error::{ErrorKind, FastqError, FormatError, IoContext};
pub use crate::paired::{
    PairedFastqReader, PairedFastqWriter, PairedSequenceWriter, RecordPair, create_paired_writer,
};
pub use crate::policy::{LinePredicate, LineValidators, ReaderOptions};
pub use crate::quality::{PHRED33_OFFSET, PHRED64_OFFSET, QualityEncoding};
pub use crate::reader::{FastqReader, Source};
pub use crate::record::FastqRecord;
pub use crate::tabular::{PairedTabularWriter, TabularWriter};
pub use crate::writer::{
    Destination, FastqWriter, FinishWrite, OutputFormat, OutputStream, SequenceWriter,
    create_writer,
};
