use std::fmt;

use crate::alignment::Alignment;
use crate::edit::{Edit, EditKind};
use crate::error::{ConstructionError, SeqVarError, UsageError};
use crate::sequence::Sequence;
use crate::variation::{validate_edit, Variation};

/// An ordered, non-overlapping, validated list of edits applied to one
/// reference.
///
/// The edit list is sorted ascending by anchor and applied strictly
/// left-to-right; construction rejects any list in which two edits claim
/// overlapping reference positions or two insertions share an anchor, so a
/// haplotype always has exactly one interpretation. Never mutated; every
/// derived value is a new object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Haplotype {
    reference: Sequence,
    edits: Vec<Edit>,
}

impl Haplotype {
    /// Sort `edits` by anchor and validate them against `reference`.
    ///
    /// At equal anchors a substitution or deletion orders before an
    /// insertion: the insertion splices in *after* the shared position, so
    /// this is the unique left-to-right application order.
    ///
    /// # Errors
    ///
    /// Fails if the reference is empty, any edit is out of bounds, two
    /// edits overlap, or two insertions share an anchor.
    pub fn new(reference: Sequence, mut edits: Vec<Edit>) -> Result<Self, ConstructionError> {
        if reference.is_empty() {
            return Err(ConstructionError::EmptyReference);
        }
        edits.sort_by_key(|e| {
            (
                e.position(),
                matches!(e.kind(), EditKind::Insertion { .. }),
            )
        });
        validate_edit_list(&edits, &reference)?;
        Ok(Self { reference, edits })
    }

    /// Build without re-validating.
    ///
    /// Escape hatch for internal producers whose edit lists are sorted and
    /// valid by construction (the alignment extractor, the translator).
    /// Passing an unsorted or overlapping list here breaks every guarantee
    /// this type makes; external callers should use [`Haplotype::new`].
    pub fn new_unchecked(reference: Sequence, edits: Vec<Edit>) -> Self {
        Self { reference, edits }
    }

    /// Extract the edit list of an alignment and build a haplotype over
    /// the alignment's reference.
    pub fn from_alignment(alignment: &Alignment) -> Result<Self, ConstructionError> {
        Self::new(alignment.reference().clone(), alignment.edits())
    }

    /// Group variations over one shared reference into a haplotype.
    ///
    /// # Errors
    ///
    /// `UsageError` if the variations are bound to different references;
    /// `ConstructionError` if the list is empty or the combined edits
    /// overlap.
    pub fn from_variations(variations: &[Variation]) -> Result<Self, SeqVarError> {
        let first = match variations.first() {
            Some(first) => first,
            None => return Err(ConstructionError::NoVariations.into()),
        };
        for variation in variations {
            if !first.reference().same_reference(variation.reference()) {
                return Err(UsageError::new("group variations").into());
            }
        }
        let edits = variations.iter().map(|v| v.edit().clone()).collect();
        Ok(Self::new(first.reference().clone(), edits)?)
    }

    pub fn reference(&self) -> &Sequence {
        &self.reference
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// The contained edits as independently usable variations, sharing
    /// this haplotype's reference.
    pub fn variations(&self) -> Vec<Variation> {
        self.edits
            .iter()
            .map(|edit| Variation::new_unchecked(self.reference.clone(), edit.clone()))
            .collect()
    }

    /// Is this variation one of the haplotype's edits?
    ///
    /// # Errors
    ///
    /// `UsageError` if the variation is bound to a different reference.
    pub fn contains(&self, variation: &Variation) -> Result<bool, UsageError> {
        if !self.reference.same_reference(variation.reference()) {
            return Err(UsageError::new("test membership"));
        }
        Ok(self.edits.contains(variation.edit()))
    }

    /// Replay the edits over the reference and materialize the mutant
    /// sequence.
    ///
    /// Linear in reference length plus total edit payload; the output
    /// buffer is allocated at its exact final size up front.
    pub fn reconstruct(&self) -> Sequence {
        let delta: isize = self.edits.iter().map(Edit::length_delta).sum();
        let target_len = (self.reference.len() as isize + delta) as usize;
        let mut out: Vec<char> = Vec::with_capacity(target_len);

        let ref_len = self.reference.len();
        let mut refpos = 1;
        for edit in &self.edits {
            let pos = edit.position();
            match edit.kind() {
                EditKind::Substitution { alt } => {
                    while refpos < pos {
                        out.push(self.reference.get(refpos).expect("validated position"));
                        refpos += 1;
                    }
                    out.push(*alt);
                    refpos += 1;
                }
                EditKind::Deletion { len } => {
                    while refpos < pos {
                        out.push(self.reference.get(refpos).expect("validated position"));
                        refpos += 1;
                    }
                    refpos += len;
                }
                EditKind::Insertion { seq } => {
                    // an insertion goes after its anchor position
                    while refpos <= pos && refpos <= ref_len {
                        out.push(self.reference.get(refpos).expect("validated position"));
                        refpos += 1;
                    }
                    out.extend(seq.iter().copied());
                }
            }
        }
        while refpos <= ref_len {
            out.push(self.reference.get(refpos).expect("validated position"));
            refpos += 1;
        }

        debug_assert_eq!(out.len(), target_len);
        Sequence::from_symbols(out)
    }
}

impl fmt::Display for Haplotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.edits.len();
        write!(
            f,
            "Haplotype with {} edit{}:",
            n,
            if n == 1 { "" } else { "s" }
        )?;
        for variation in self.variations() {
            write!(f, "\n{}", variation)?;
        }
        Ok(())
    }
}

/// The window-shrink check: walk the sorted edits once, tracking the
/// window `[lo, hi]` of reference positions not yet consumed by a prior
/// edit and whether the previous edit was an insertion.
fn validate_edit_list(edits: &[Edit], reference: &Sequence) -> Result<(), ConstructionError> {
    let mut lo = 1;
    let hi = reference.len();
    let mut last_was_insertion = false;
    let mut last_insertion_anchor = 0;

    for edit in edits {
        validate_edit(edit, reference)?;
        let pos = edit.position();
        match edit.kind() {
            EditKind::Substitution { .. } => {
                if pos < lo || pos > hi {
                    return Err(ConstructionError::Overlap {
                        edit: edit.to_string(),
                    });
                }
                lo = pos + 1;
                last_was_insertion = false;
            }
            EditKind::Deletion { len } => {
                if pos < lo || pos + len - 1 > hi {
                    return Err(ConstructionError::Overlap {
                        edit: edit.to_string(),
                    });
                }
                lo = pos + len;
                last_was_insertion = false;
            }
            EditKind::Insertion { .. } => {
                if last_was_insertion && pos == last_insertion_anchor {
                    return Err(ConstructionError::SharedInsertionAnchor { position: pos });
                }
                // anchoring immediately before lo is fine unless the
                // previous edit was an insertion at that exact spot
                let low = lo - 1 + last_was_insertion as usize;
                if pos < low || pos > hi + 1 {
                    return Err(ConstructionError::Overlap {
                        edit: edit.to_string(),
                    });
                }
                last_was_insertion = true;
                last_insertion_anchor = pos;
            }
        }
    }
    Ok(())
}
