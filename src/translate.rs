use log::debug;

use crate::alignment::{AlignOp, Alignment};
use crate::edit::{Edit, EditKind};
use crate::error::UsageError;
use crate::variation::Variation;

/// Outcome of re-anchoring a variation on a new reference.
///
/// All three outcomes are expected, first-class results; callers must
/// handle each explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// The variation re-expressed against the new reference.
    Translated(Variation),
    /// The mutation is already reflected in (or absent from) the new
    /// reference and needs no representation there.
    NoChange,
    /// The mutation cannot be unambiguously expressed on the new
    /// reference.
    Inapplicable,
}

/// Re-anchor `variation` on a new reference via `alignment`.
///
/// The alignment's reference side must be the variation's reference; its
/// observed side is the new reference. A substitution whose position falls
/// in a deletion run of the new reference is `Inapplicable` — the
/// substituted base has no anchor there — matching how insertions into
/// deleted regions are classified.
///
/// # Errors
///
/// `UsageError` if the alignment bridges a different reference than the
/// variation's. The ambiguous and ill-defined mapping cases this function
/// exists to classify are reported as outcomes, never as errors.
pub fn translate(variation: &Variation, alignment: &Alignment) -> Result<Translation, UsageError> {
    if !variation.reference().same_reference(alignment.reference()) {
        return Err(UsageError::new("translate variations"));
    }

    let new_reference = alignment.seq().clone();
    let pos = variation.edit().position();
    let outcome = match variation.edit().kind() {
        EditKind::Substitution { alt } => match alignment.ref2seq(pos) {
            Some((seqpos, AlignOp::Match)) | Some((seqpos, AlignOp::Mismatch)) => {
                if new_reference.get(seqpos) == Some(*alt) {
                    // the new reference already carries the substituted base
                    Translation::NoChange
                } else {
                    Translation::Translated(Variation::new_unchecked(
                        new_reference,
                        Edit::substitution(seqpos, *alt),
                    ))
                }
            }
            _ => Translation::Inapplicable,
        },
        EditKind::Deletion { len } => {
            match (alignment.ref2seq(pos), alignment.ref2seq(pos + len - 1)) {
                (Some((start, op)), Some((stop, _))) => {
                    // an anchor inside a deletion run of the new reference
                    // maps to the position before the run; the deletion
                    // itself starts one later
                    let start = start + (op == AlignOp::Delete) as usize;
                    if stop < start {
                        Translation::NoChange
                    } else {
                        let edit = Edit::deletion(start, stop - start + 1)
                            .expect("span has positive length");
                        Translation::Translated(Variation::new_unchecked(new_reference, edit))
                    }
                }
                _ => Translation::Inapplicable,
            }
        }
        EditKind::Insertion { seq } => translate_insertion(variation, alignment, pos, seq),
    };

    debug!("translated {} -> {:?}", variation, outcome);
    Ok(outcome)
}

fn translate_insertion(
    variation: &Variation,
    alignment: &Alignment,
    pos: usize,
    seq: &[char],
) -> Translation {
    let new_reference = alignment.seq().clone();

    if pos == 0 {
        // only translatable if the very first aligned column is gap-free
        // on both sides; any leading gap leaves no stable anchor
        return match alignment.columns().first() {
            Some(&(Some(_), Some(_))) => Translation::Translated(Variation::new_unchecked(
                new_reference,
                Edit::insertion(0, seq.to_vec()).expect("insertions are non-empty"),
            )),
            _ => Translation::Inapplicable,
        };
    }

    let (seqpos, op) = match alignment.ref2seq(pos) {
        Some(mapped) => mapped,
        None => return Translation::Inapplicable,
    };
    if op != AlignOp::Match && op != AlignOp::Mismatch {
        // the anchor base is deleted in the new reference
        return Translation::Inapplicable;
    }

    // an insertion between the last reference position and the end needs
    // no following-position probe
    if pos < variation.reference().len() {
        let next_is_adjacent = match alignment.ref2seq(pos + 1) {
            Some((next, AlignOp::Match)) | Some((next, AlignOp::Mismatch)) => next == seqpos + 1,
            _ => false,
        };
        if !next_is_adjacent {
            // a gap already claims the slot between the two positions
            return Translation::Inapplicable;
        }
    }

    Translation::Translated(Variation::new_unchecked(
        new_reference,
        Edit::insertion(seqpos, seq.to_vec()).expect("insertions are non-empty"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;

    fn variation(reference: &str, text: &str) -> Variation {
        Variation::parse(Sequence::new(reference), text).unwrap()
    }

    #[test]
    fn test_identity_law() {
        let aln = Alignment::identity(Sequence::new("ACGT"));

        // a substitution to the base already present needs no variant
        let same = variation("ACGT", "C2C");
        assert_eq!(translate(&same, &aln).unwrap(), Translation::NoChange);

        // a real substitution keeps its anchor
        let sub = variation("ACGT", "C2T");
        match translate(&sub, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "C2T"),
            other => panic!("expected Translated, got {:?}", other),
        }

        // deletions and insertions come back unshifted
        let del = variation("ACGT", "Δ2-3");
        match translate(&del, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "Δ2-3"),
            other => panic!("expected Translated, got {:?}", other),
        }
        let ins = variation("ACGT", "2TT");
        match translate(&ins, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "2TT"),
            other => panic!("expected Translated, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_reference_is_a_usage_error() {
        let aln = Alignment::identity(Sequence::new("ACGT"));
        let foreign = variation("TTTT", "T2A");
        assert!(translate(&foreign, &aln).is_err());
    }

    #[test]
    fn test_substitution_shifts_with_leading_insertion() {
        // new reference TTACGT carries two extra leading bases
        let aln = Alignment::from_gapped("TTACGT", "--ACGT").unwrap();
        let sub = variation("ACGT", "C2T");
        match translate(&sub, &aln).unwrap() {
            Translation::Translated(v) => {
                assert_eq!(v.to_string(), "C4T");
                assert_eq!(v.reference().to_string(), "TTACGT");
            }
            other => panic!("expected Translated, got {:?}", other),
        }
    }

    #[test]
    fn test_substitution_into_deleted_region_is_inapplicable() {
        // position 2 of the old reference is gone in the new one
        let aln = Alignment::from_gapped("A-GT", "ACGT").unwrap();
        let sub = variation("ACGT", "C2T");
        assert_eq!(translate(&sub, &aln).unwrap(), Translation::Inapplicable);
    }

    #[test]
    fn test_substitution_already_present_after_shift() {
        // the new reference already has T at the mapped position
        let aln = Alignment::from_gapped("ATGT", "ACGT").unwrap();
        let sub = variation("ACGT", "C2T");
        assert_eq!(translate(&sub, &aln).unwrap(), Translation::NoChange);
    }

    #[test]
    fn test_deletion_fully_absent_from_new_reference() {
        // old positions 2-3 are deleted in the new reference already
        let aln = Alignment::from_gapped("A--T", "ACGT").unwrap();
        let del = variation("ACGT", "Δ2-3");
        assert_eq!(translate(&del, &aln).unwrap(), Translation::NoChange);
    }

    #[test]
    fn test_deletion_anchor_inside_existing_gap() {
        // only old position 2 is already gone; the deletion shrinks to
        // the surviving position
        let aln = Alignment::from_gapped("A-GT", "ACGT").unwrap();
        let del = variation("ACGT", "Δ2-3");
        match translate(&del, &aln).unwrap() {
            Translation::Translated(v) => {
                assert_eq!(v.to_string(), "Δ2-2");
                assert_eq!(v.reference().to_string(), "AGT");
            }
            other => panic!("expected Translated, got {:?}", other),
        }
    }

    #[test]
    fn test_deletion_end_inside_existing_gap() {
        // old position 3 is already gone; the deletion keeps position 2
        let aln = Alignment::from_gapped("AC-T", "ACGT").unwrap();
        let del = variation("ACGT", "Δ2-3");
        match translate(&del, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "Δ2-2"),
            other => panic!("expected Translated, got {:?}", other),
        }
    }

    #[test]
    fn test_deletion_shifts_with_leading_insertion() {
        let aln = Alignment::from_gapped("TTACGT", "--ACGT").unwrap();
        let del = variation("ACGT", "Δ2-3");
        match translate(&del, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "Δ4-5"),
            other => panic!("expected Translated, got {:?}", other),
        }
    }

    #[test]
    fn test_single_position_deletion_in_deleted_region() {
        let aln = Alignment::from_gapped("A-GT", "ACGT").unwrap();
        let del = variation("ACGT", "Δ2-2");
        assert_eq!(translate(&del, &aln).unwrap(), Translation::NoChange);
    }

    #[test]
    fn test_insertion_shifts_position() {
        let aln = Alignment::from_gapped("TTACGT", "--ACGT").unwrap();
        let ins = variation("ACGT", "2TT");
        match translate(&ins, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "4TT"),
            other => panic!("expected Translated, got {:?}", other),
        }
    }

    #[test]
    fn test_insertion_blocked_by_existing_gap() {
        // the new reference already has an insertion between old
        // positions 2 and 3; the anchor is ambiguous
        let aln = Alignment::from_gapped("ACAAGT", "AC--GT").unwrap();
        let ins = variation("ACGT", "2TT");
        assert_eq!(translate(&ins, &aln).unwrap(), Translation::Inapplicable);
    }

    #[test]
    fn test_insertion_next_position_deleted() {
        // old position 3 is deleted in the new reference; the slot after
        // the anchor is claimed by a gap
        let aln = Alignment::from_gapped("AC-T", "ACGT").unwrap();
        let ins = variation("ACGT", "2TT");
        assert_eq!(translate(&ins, &aln).unwrap(), Translation::Inapplicable);
    }

    #[test]
    fn test_insertion_anchor_deleted() {
        let aln = Alignment::from_gapped("A-GT", "ACGT").unwrap();
        let ins = variation("ACGT", "2TT");
        assert_eq!(translate(&ins, &aln).unwrap(), Translation::Inapplicable);
    }

    #[test]
    fn test_insertion_at_last_reference_position() {
        let aln = Alignment::from_gapped("TTACGT", "--ACGT").unwrap();
        let ins = variation("ACGT", "4TT");
        match translate(&ins, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "6TT"),
            other => panic!("expected Translated, got {:?}", other),
        }
    }

    #[test]
    fn test_insertion_before_first_base() {
        // clean first column: translatable at anchor 0
        let aln = Alignment::identity(Sequence::new("ACGT"));
        let ins = variation("ACGT", "0TT");
        match translate(&ins, &aln).unwrap() {
            Translation::Translated(v) => assert_eq!(v.to_string(), "0TT"),
            other => panic!("expected Translated, got {:?}", other),
        }

        // a leading gap on either side makes the anchor ambiguous
        let aln = Alignment::from_gapped("TACGT", "-ACGT").unwrap();
        assert_eq!(translate(&ins, &aln).unwrap(), Translation::Inapplicable);
        let aln = Alignment::from_gapped("-CGT", "ACGT").unwrap();
        assert_eq!(translate(&ins, &aln).unwrap(), Translation::Inapplicable);
    }
}
