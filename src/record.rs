use crate::quality::QualityEncoding;

/// One FASTQ entry.
///
/// `qual` holds normalized scores (offset already subtracted), one per
/// nucleotide, or nothing at all for records synthesized from a source
/// without qualities. `encoding` remembers the textual style the scores
/// came in so a writer can reproduce it. IDs are kept as raw bytes, without
/// their `@`/`+` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub id: Vec<u8>,
    pub id2: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Vec<i32>,
    pub encoding: QualityEncoding,
}

impl FastqRecord {
    /// A record without qualities, e.g. converted from FASTA.
    pub fn new(id: impl Into<Vec<u8>>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            id2: Vec::new(),
            seq: seq.into(),
            qual: Vec::new(),
            encoding: QualityEncoding::default(),
        }
    }

    pub fn with_quality(
        id: impl Into<Vec<u8>>,
        seq: impl Into<Vec<u8>>,
        qual: Vec<i32>,
        encoding: QualityEncoding,
    ) -> Self {
        Self {
            id: id.into(),
            id2: Vec::new(),
            seq: seq.into(),
            qual,
            encoding,
        }
    }

    /// `id` as text, with invalid UTF-8 replaced.
    pub fn id_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
    #[inline]
    pub fn has_quality(&self) -> bool {
        !self.qual.is_empty()
    }
}
