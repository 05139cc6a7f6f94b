use std::cmp::Ordering;
use std::fmt;

use crate::edit::{parse_edit, Edit, EditKind};
use crate::error::{ConstructionError, SeqVarError, UsageError};
use crate::sequence::Sequence;

/// Check one edit against a reference, independent of any other edits.
///
/// The rules: substitutions must hit a legal reference index, deletions
/// must fit inside the reference, insertion anchors may range from 0
/// (before the first base) to one past the reference end.
pub(crate) fn validate_edit(edit: &Edit, reference: &Sequence) -> Result<(), ConstructionError> {
    if reference.is_empty() {
        return Err(ConstructionError::EmptyReference);
    }
    let len = reference.len();
    let pos = edit.position();
    let fits = match edit.kind() {
        EditKind::Substitution { .. } => pos >= 1 && pos <= len,
        EditKind::Insertion { .. } => pos <= len + 1,
        EditKind::Deletion { len: dlen } => pos >= 1 && pos + dlen - 1 <= len,
    };
    if fits {
        Ok(())
    } else {
        Err(ConstructionError::OutOfBounds {
            edit: edit.to_string(),
            reference_length: len,
        })
    }
}

/// A single edit bundled with the reference it applies to.
///
/// The unit of membership testing, parsing, printing and translation.
/// Validated on construction; an existing `Variation` always fits its
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variation {
    reference: Sequence,
    edit: Edit,
}

impl Variation {
    pub fn new(reference: Sequence, edit: Edit) -> Result<Self, ConstructionError> {
        validate_edit(&edit, &reference)?;
        Ok(Self { reference, edit })
    }

    /// Build without re-validating.
    ///
    /// Escape hatch for internal producers (the alignment extractor and
    /// the translator) whose output is valid by construction. Callers must
    /// guarantee that `edit` fits `reference`; nothing downstream checks
    /// again.
    pub fn new_unchecked(reference: Sequence, edit: Edit) -> Self {
        Self { reference, edit }
    }

    /// Parse the compact text form against a reference.
    ///
    /// Forms: `Δ<start>-<stop>`, `<pos><letters>`, or
    /// `<refSymbol><pos><altSymbol>`; for the substitution form the
    /// claimed reference symbol must match the actual one.
    pub fn parse(reference: Sequence, text: &str) -> Result<Self, SeqVarError> {
        let (edit, claimed) = parse_edit(text)?;
        if let Some(claimed) = claimed {
            let observed = reference.get(edit.position());
            match observed {
                Some(observed) if observed == claimed => {}
                Some(observed) => {
                    return Err(ConstructionError::ReferenceMismatch {
                        position: edit.position(),
                        claimed,
                        observed,
                    }
                    .into())
                }
                None => {
                    return Err(ConstructionError::OutOfBounds {
                        edit: edit.to_string(),
                        reference_length: reference.len(),
                    }
                    .into())
                }
            }
        }
        Ok(Self::new(reference, edit)?)
    }

    pub fn reference(&self) -> &Sequence {
        &self.reference
    }

    pub fn edit(&self) -> &Edit {
        &self.edit
    }

    pub fn left_position(&self) -> usize {
        self.edit.left_position()
    }

    pub fn right_position(&self) -> usize {
        self.edit.right_position()
    }

    /// Order two variations on the same reference by left position.
    ///
    /// # Errors
    ///
    /// `UsageError` if the references differ; such variations live in
    /// different coordinate systems and have no meaningful order.
    pub fn try_cmp(&self, other: &Variation) -> Result<Ordering, UsageError> {
        if !self.reference.same_reference(&other.reference) {
            return Err(UsageError::new("order variations"));
        }
        Ok(self.left_position().cmp(&other.left_position()))
    }

    /// The reference bases of this variation, VCF style: indels include
    /// one flanking, unmodified base.
    ///
    /// `None` for the one configuration without a flank: a deletion that
    /// covers the entire reference.
    pub fn ref_bases(&self) -> Option<String> {
        let reference = &self.reference;
        let pos = self.edit.position();
        match self.edit.kind() {
            EditKind::Substitution { .. } => Some(
                reference
                    .get(pos)
                    .expect("validated position")
                    .to_string(),
            ),
            EditKind::Deletion { len } => {
                let slice = if pos == 1 {
                    reference.slice(pos, pos + len)
                } else {
                    reference.slice(pos - 1, pos + len - 1)
                };
                slice.map(|bases| bases.into_iter().collect())
            }
            EditKind::Insertion { .. } => {
                // anchor 0 inserts before the first base; the flank is
                // taken after in that case
                let pos = pos.max(1).min(reference.len());
                Some(
                    reference
                        .get(pos)
                        .expect("validated position")
                        .to_string(),
                )
            }
        }
    }

    /// The alternate bases of this variation, VCF style.
    ///
    /// `None` exactly when [`Variation::ref_bases`] is `None`.
    pub fn alt_bases(&self) -> Option<String> {
        let reference = &self.reference;
        let pos = self.edit.position();
        match self.edit.kind() {
            EditKind::Substitution { alt } => Some(alt.to_string()),
            EditKind::Deletion { len } => {
                if pos == 1 && *len == reference.len() {
                    return None; // no unmodified flank exists
                }
                let flank = if pos == 1 { pos + 1 } else { pos - 1 };
                Some(
                    reference
                        .get(flank)
                        .expect("validated position")
                        .to_string(),
                )
            }
            EditKind::Insertion { seq } => {
                let inserted: String = seq.iter().collect();
                if pos == 0 {
                    let flank = reference.get(1).expect("non-empty reference");
                    Some(format!("{}{}", inserted, flank))
                } else {
                    let pos = pos.min(reference.len());
                    let flank = reference.get(pos).expect("validated position");
                    Some(format!("{}{}", flank, inserted))
                }
            }
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.edit.position();
        match self.edit.kind() {
            EditKind::Substitution { alt } => {
                let ref_base = self.reference.get(pos).expect("validated position");
                write!(f, "{}{}{}", ref_base, pos, alt)
            }
            EditKind::Deletion { len } => write!(f, "Δ{}-{}", pos, pos + len - 1),
            EditKind::Insertion { seq } => {
                let seq: String = seq.iter().collect();
                write!(f, "{}{}", pos, seq)
            }
        }
    }
}

impl PartialOrd for Variation {
    /// `None` when the references differ; use [`Variation::try_cmp`] to
    /// surface that as an error.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}
