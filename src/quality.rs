//! Quality score codecs.
//!
//! Two textual forms exist: one character per base (`ASCII`), or
//! whitespace-separated base-10 integers (`numeric`). Both are normalized to
//! `i32` scores by subtracting the same offset.

use crate::error::FormatError;

/// Offset of Sanger / Illumina 1.8+ encoded qualities.
pub const PHRED33_OFFSET: i32 = 33;
/// Offset of Illumina 1.3-1.7 encoded qualities.
pub const PHRED64_OFFSET: i32 = 64;

/// Textual style of a quality line together with its zero point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityEncoding {
    Ascii { offset: i32 },
    Numeric { offset: i32 },
}

impl QualityEncoding {
    /// Chooses the style from the raw line length: equal to the sequence
    /// length means one character per base.
    pub fn detect(quality_line_len: usize, seq_len: usize, offset: i32) -> Self {
        if quality_line_len == seq_len {
            Self::Ascii { offset }
        } else {
            Self::Numeric { offset }
        }
    }

    #[inline]
    pub fn offset(&self) -> i32 {
        match *self {
            Self::Ascii { offset } | Self::Numeric { offset } => offset,
        }
    }

    #[inline]
    pub fn is_ascii(&self) -> bool {
        matches!(self, Self::Ascii { .. })
    }

    pub fn decode(&self, text: &[u8]) -> Result<Vec<i32>, FormatError> {
        match *self {
            Self::Ascii { offset } => Ok(decode_ascii(text, offset)),
            Self::Numeric { offset } => decode_numeric(text, offset),
        }
    }

    pub fn encode(&self, values: &[i32]) -> Vec<u8> {
        match *self {
            Self::Ascii { offset } => encode_ascii(values, offset),
            Self::Numeric { offset } => encode_numeric(values, offset).into_bytes(),
        }
    }
}

impl Default for QualityEncoding {
    fn default() -> Self {
        Self::Ascii {
            offset: PHRED64_OFFSET,
        }
    }
}

/// Each byte minus `offset`. Negative scores are kept as-is.
pub fn decode_ascii(text: &[u8], offset: i32) -> Vec<i32> {
    text.iter().map(|&b| i32::from(b) - offset).collect()
}

/// Parses whitespace-separated integers, subtracting `offset` from each.
///
/// A line with no tokens at all, any token that is not a base-10 integer,
/// or a token whose normalized score does not fit an `i32`, is rejected.
pub fn decode_numeric(text: &[u8], offset: i32) -> Result<Vec<i32>, FormatError> {
    let invalid = |token: &[u8]| FormatError::InvalidQualityToken {
        token: String::from_utf8_lossy(token).into_owned(),
    };

    let mut out = Vec::with_capacity(text.len() / 3 + 1);
    for token in text
        .split(|b| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
    {
        let score = std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .and_then(|v| v.checked_sub(offset))
            .ok_or_else(|| invalid(token))?;
        out.push(score);
    }
    if out.is_empty() {
        return Err(invalid(text));
    }
    Ok(out)
}

/// One byte per score: `value + offset`, truncated to 8 bits.
pub fn encode_ascii(values: &[i32], offset: i32) -> Vec<u8> {
    values
        .iter()
        .map(|&v| (i64::from(v) + i64::from(offset)) as u8)
        .collect()
}

/// Scores plus `offset`, joined by single spaces.
pub fn encode_numeric(values: &[i32], offset: i32) -> String {
    let mut out = String::with_capacity(values.len() * 3);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&(i64::from(*v) + i64::from(offset)).to_string());
    }
    out
}
