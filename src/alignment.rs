use log::debug;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::edit::Edit;
use crate::error::ParseError;
use crate::sequence::Sequence;

/// What an aligned column does, from the point of view of the reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum AlignOp {
    Match = 0,
    Mismatch = 1,
    Insert = 2,
    Delete = 3,
}

/// A pairwise alignment between an observed sequence and a reference.
///
/// Columns pair an observed symbol (or gap) with a reference symbol (or
/// gap). Soft-clip markers name terminal runs of observed symbols that
/// were not aligned; indel runs abutting a clipped end are not treated as
/// evidence of a variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    seq: Sequence,
    reference: Sequence,
    columns: Vec<(Option<char>, Option<char>)>,
    left_clip: usize,
    right_clip: usize,
}

impl Alignment {
    /// Build an alignment from two equal-length gapped rows, `'-'` marking
    /// a gap. The first row is the observed sequence, the second the
    /// reference.
    ///
    /// # Errors
    ///
    /// Fails if the rows differ in length or any column is a gap on both
    /// sides.
    pub fn from_gapped(seq_row: &str, ref_row: &str) -> Result<Self, ParseError> {
        let seq_chars: Vec<char> = seq_row.chars().collect();
        let ref_chars: Vec<char> = ref_row.chars().collect();
        if seq_chars.len() != ref_chars.len() {
            return Err(ParseError::somewhere(
                "aligned rows of equal length",
                format!("{} vs {} columns", seq_chars.len(), ref_chars.len()),
            ));
        }
        let mut columns = Vec::with_capacity(seq_chars.len());
        for (i, (&s, &r)) in seq_chars.iter().zip(ref_chars.iter()).enumerate() {
            let s = if s == '-' { None } else { Some(s) };
            let r = if r == '-' { None } else { Some(r) };
            if s.is_none() && r.is_none() {
                return Err(ParseError::item(
                    "alignment column",
                    i,
                    "a symbol in at least one row",
                    "--".to_string(),
                ));
            }
            columns.push((s, r));
        }
        let seq = Sequence::from_symbols(seq_chars.into_iter().filter(|&c| c != '-').collect());
        let reference =
            Sequence::from_symbols(ref_chars.into_iter().filter(|&c| c != '-').collect());
        Ok(Self {
            seq,
            reference,
            columns,
            left_clip: 0,
            right_clip: 0,
        })
    }

    /// The trivial alignment of a sequence with itself.
    pub fn identity(reference: Sequence) -> Self {
        let columns = reference
            .symbols()
            .iter()
            .map(|&c| (Some(c), Some(c)))
            .collect();
        Self {
            seq: reference.clone(),
            reference,
            columns,
            left_clip: 0,
            right_clip: 0,
        }
    }

    /// Mark `left` and `right` observed symbols as soft-clipped at the
    /// respective alignment ends.
    pub fn with_soft_clips(mut self, left: usize, right: usize) -> Self {
        self.left_clip = left;
        self.right_clip = right;
        self
    }

    pub fn seq(&self) -> &Sequence {
        &self.seq
    }

    pub fn reference(&self) -> &Sequence {
        &self.reference
    }

    pub fn columns(&self) -> &[(Option<char>, Option<char>)] {
        &self.columns
    }

    /// Map a 1-based reference position to the observed sequence.
    ///
    /// For a position aligned to an observed symbol the result is that
    /// symbol's 1-based position and `Match`/`Mismatch`. For a position
    /// falling in a deletion run the result is the number of observed
    /// symbols consumed so far (0 if none) and `Delete`. `None` if `pos`
    /// is outside the aligned reference.
    pub fn ref2seq(&self, pos: usize) -> Option<(usize, AlignOp)> {
        if pos == 0 {
            return None;
        }
        let mut refpos = 0;
        let mut seqpos = 0;
        for &(s, r) in &self.columns {
            if r.is_some() {
                refpos += 1;
            }
            if s.is_some() {
                seqpos += 1;
            }
            if refpos == pos && r.is_some() {
                let op = match (s, r) {
                    (Some(s), Some(r)) if s == r => AlignOp::Match,
                    (Some(_), Some(_)) => AlignOp::Mismatch,
                    _ => AlignOp::Delete,
                };
                return Some((seqpos, op));
            }
        }
        None
    }

    /// Walk the columns and emit the sorted edit list that turns the
    /// reference into the observed sequence.
    ///
    /// Indel runs still open when the traversal ends are discarded if the
    /// alignment is soft-clipped on that end; the clipped bases are not
    /// evidence of a called variant. The same applies to a run starting at
    /// the very first column next to a left clip.
    pub fn edits(&self) -> Vec<Edit> {
        let mut result = Vec::new();
        let mut refpos = 0;

        // pending deletion run
        let mut del_anchor = 0;
        let mut del_len = 0;
        let mut del_leading = false;
        // pending insertion run
        let mut ins_anchor = 0;
        let mut ins_buffer: Vec<char> = Vec::new();
        let mut ins_leading = false;

        for (i, &(s, r)) in self.columns.iter().enumerate() {
            if r.is_some() {
                refpos += 1;
            }

            if s.is_none() {
                // inside a deletion run
                if del_len == 0 {
                    del_anchor = refpos;
                    del_leading = i == 0;
                }
                del_len += 1;
            } else if del_len > 0 {
                if !(del_leading && self.left_clip > 0) {
                    result.push(Edit::deletion(del_anchor, del_len).expect("len > 0"));
                }
                del_len = 0;
            }

            if r.is_none() {
                // inside an insertion run; the anchor is the number of
                // reference symbols consumed before the run
                if ins_buffer.is_empty() {
                    ins_anchor = refpos;
                    ins_leading = i == 0;
                }
                if let Some(symbol) = s {
                    ins_buffer.push(symbol);
                }
            } else if !ins_buffer.is_empty() {
                if !(ins_leading && self.left_clip > 0) {
                    result.push(
                        Edit::insertion(ins_anchor, std::mem::take(&mut ins_buffer))
                            .expect("buffer is non-empty"),
                    );
                }
                ins_buffer.clear();
            }

            if let (Some(s), Some(r)) = (s, r) {
                if s != r {
                    result.push(Edit::substitution(refpos, s));
                }
            }
        }

        // flush runs still open at the end, unless they abut a clip
        if del_len > 0 && self.right_clip == 0 && !(del_leading && self.left_clip > 0) {
            result.push(Edit::deletion(del_anchor, del_len).expect("len > 0"));
        }
        if !ins_buffer.is_empty() && self.right_clip == 0 && !(ins_leading && self.left_clip > 0) {
            result.push(Edit::insertion(ins_anchor, ins_buffer).expect("buffer is non-empty"));
        }

        debug!(
            "extracted {} edit(s) from {} aligned columns",
            result.len(),
            self.columns.len()
        );
        result
    }
}
