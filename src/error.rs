use std::fmt;
use std::io;
use thiserror::Error;

/// Where in a stream an error happened.
///
/// `line_num` is 1-based. For read errors it is the offending line, or the
/// line that was expected when the stream ended early. For write errors it is
/// the last line successfully handed to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoContext {
    pub source: String,
    pub line_num: u64,
    pub byte_pos: u64,
}

impl IoContext {
    pub(crate) fn start(source: &str) -> Self {
        Self {
            source: source.to_string(),
            line_num: 0,
            byte_pos: 0,
        }
    }
}

impl fmt::Display for IoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' line {} (byte {})",
            self.source, self.line_num, self.byte_pos
        )
    }
}

/// Coarse classification of every failure this crate can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong marker on the ID line or a malformed separator line.
    StructuralViolation,
    /// Invalid nucleotide alphabet or an unparseable quality token.
    ContentViolation,
    /// Quality/nucleotide count disagreement, or paired files of unequal length.
    LengthMismatch,
    /// The stream ended in the middle of a record.
    PrematureEndOfInput,
    /// The underlying read or write failed.
    IoFailure,
    /// The caller broke an API contract.
    PreconditionViolation,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid FASTQ ID line ({line})")]
    InvalidIdLine { line: String },
    #[error("invalid nucleotides line ({line})")]
    InvalidNucleotides { line: String },
    #[error("invalid FASTQ ID-2 line ({line})")]
    InvalidSeparator { line: String },
    #[error("invalid quality score data ({token})")]
    InvalidQualityToken { token: String },
    #[error("number of quality-score values ({qual}) doesn't match number of nucleotides ({seq})")]
    QualityLengthMismatch { seq: usize, qual: usize },
    #[error("premature end of input: expecting {expecting} line")]
    PrematureEof { expecting: &'static str },
}

impl FormatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdLine { .. } | Self::InvalidSeparator { .. } => {
                ErrorKind::StructuralViolation
            }
            Self::InvalidNucleotides { .. } | Self::InvalidQualityToken { .. } => {
                ErrorKind::ContentViolation
            }
            Self::QualityLengthMismatch { .. } => ErrorKind::LengthMismatch,
            Self::PrematureEof { .. } => ErrorKind::PrematureEndOfInput,
        }
    }
}

#[derive(Debug, Error)]
pub enum FastqError {
    #[error("I/O error at {ctx}: {source}")]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("input error in {ctx}: {source}")]
    Format {
        #[source]
        source: FormatError,
        ctx: IoContext,
    },
    #[error("paired-end record counts differ: '{ended}' ended before '{remaining}'")]
    UnequalRecordCounts { ended: String, remaining: String },
    #[error("refusing to write a record with an empty ID to '{dest}'")]
    EmptyId { dest: String },
    #[error("reader for '{input}' already failed and cannot continue")]
    Halted { input: String },
}

impl FastqError {
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Io { source, ctx }
    }
    pub(crate) fn fmt_err(source: FormatError, ctx: IoContext) -> Self {
        Self::Format { source, ctx }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::Format { source, .. } => source.kind(),
            Self::UnequalRecordCounts { .. } => ErrorKind::LengthMismatch,
            Self::EmptyId { .. } | Self::Halted { .. } => ErrorKind::PreconditionViolation,
        }
    }

    /// Stream position of the failure, when there is one.
    pub fn context(&self) -> Option<&IoContext> {
        match self {
            Self::Io { ctx, .. } | Self::Format { ctx, .. } => Some(ctx),
            _ => None,
        }
    }
}
