use crate::quality::PHRED64_OFFSET;

/// Predicate over one raw input line (line terminator already stripped).
pub type LinePredicate = fn(&[u8]) -> bool;

/// Line checks applied while parsing a record.
#[derive(Debug, Clone, Copy)]
pub struct LineValidators {
    pub id_line: LinePredicate,
    pub nucleotide_line: LinePredicate,
    pub separator_line: LinePredicate,
}

impl Default for LineValidators {
    fn default() -> Self {
        Self {
            id_line: is_fastq_id_line,
            nucleotide_line: is_nucleotide_line,
            separator_line: is_fastq_separator_line,
        }
    }
}

/// `@` followed by a non-empty identifier.
pub fn is_fastq_id_line(line: &[u8]) -> bool {
    line.len() > 1 && line[0] == b'@'
}

/// Only `ACGTN`, in either case.
pub fn is_nucleotide_line(line: &[u8]) -> bool {
    line.iter()
        .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N'))
}

pub fn is_fastq_separator_line(line: &[u8]) -> bool {
    line.first() == Some(&b'+')
}

#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Zero point of the quality encoding. Never auto-detected.
    pub quality_offset: i32,
    pub validators: LineValidators,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            quality_offset: PHRED64_OFFSET,
            validators: LineValidators::default(),
        }
    }
}

impl ReaderOptions {
    pub fn with_offset(quality_offset: i32) -> Self {
        Self {
            quality_offset,
            ..Self::default()
        }
    }
}
