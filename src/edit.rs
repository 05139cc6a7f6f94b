use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConstructionError, ParseError};

/// The payload of an atomic edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    /// Replace the reference symbol at the anchor position.
    Substitution { alt: char },
    /// Remove `len` reference positions starting at the anchor.
    Deletion { len: usize },
    /// Splice `seq` in after the anchor position. Anchor 0 means before
    /// the first reference base.
    Insertion { seq: Vec<char> },
}

/// One atomic change, anchored at a 1-based reference position.
///
/// The anchor's meaning depends on the kind: the substituted position, the
/// first deleted position, or the position after which a sequence is
/// inserted (0 = before the first base).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    position: usize,
    kind: EditKind,
}

impl Edit {
    pub fn substitution(position: usize, alt: char) -> Self {
        Self {
            position,
            kind: EditKind::Substitution { alt },
        }
    }

    /// A deletion of `len` reference positions.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstructionError::ZeroLengthDeletion`] if `len` is 0.
    pub fn deletion(position: usize, len: usize) -> Result<Self, ConstructionError> {
        if len == 0 {
            Err(ConstructionError::ZeroLengthDeletion)
        } else {
            Ok(Self {
                position,
                kind: EditKind::Deletion { len },
            })
        }
    }

    /// An insertion of `seq` after `position`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstructionError::EmptyInsertion`] if `seq` is empty.
    pub fn insertion(position: usize, seq: Vec<char>) -> Result<Self, ConstructionError> {
        if seq.is_empty() {
            Err(ConstructionError::EmptyInsertion)
        } else {
            Ok(Self {
                position,
                kind: EditKind::Insertion { seq },
            })
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &EditKind {
        &self.kind
    }

    /// 1 for a substitution, the deleted span length for a deletion, the
    /// inserted length for an insertion.
    pub fn len(&self) -> usize {
        match &self.kind {
            EditKind::Substitution { .. } => 1,
            EditKind::Deletion { len } => *len,
            EditKind::Insertion { seq } => seq.len(),
        }
    }

    /// Leftmost reference coordinate claimed by this edit.
    pub fn left_position(&self) -> usize {
        self.position
    }

    /// Rightmost reference coordinate claimed by this edit, for ordering
    /// purposes. An insertion between positions p and p+1 has right bound
    /// p+1.
    pub fn right_position(&self) -> usize {
        match &self.kind {
            EditKind::Substitution { .. } => self.position,
            EditKind::Deletion { len } => self.position + len - 1,
            EditKind::Insertion { .. } => self.position + 1,
        }
    }

    /// Change in sequence length caused by applying this edit.
    pub fn length_delta(&self) -> isize {
        match &self.kind {
            EditKind::Substitution { .. } => 0,
            EditKind::Deletion { len } => -(*len as isize),
            EditKind::Insertion { seq } => seq.len() as isize,
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EditKind::Substitution { alt } => {
                write!(f, "substitution to {} at position {}", alt, self.position)
            }
            EditKind::Deletion { len } => {
                write!(f, "deletion of length {} at position {}", len, self.position)
            }
            EditKind::Insertion { seq } => {
                let seq: String = seq.iter().collect();
                write!(f, "insertion of {} at position {}", seq, self.position)
            }
        }
    }
}

/// Parse the compact edit grammar, also reporting the reference symbol
/// claimed by the substitution form so callers that hold the reference
/// can verify it.
///
/// The three mutually exclusive forms, decided by the first character:
/// `Δ<start>-<stop>` (deletion), `<pos><letters>` (insertion),
/// `<refSymbol><pos><altSymbol>` (substitution).
pub(crate) fn parse_edit(text: &str) -> Result<(Edit, Option<char>), ParseError> {
    if let Some(range) = text.strip_prefix('Δ') {
        let parts: Vec<&str> = range.split('-').collect();
        if parts.len() != 2 {
            return Err(ParseError::somewhere("Δstart-stop", text.to_string()));
        }
        let start = parts[0]
            .parse::<usize>()
            .map_err(|_| ParseError::somewhere("usize", parts[0].to_string()))?;
        let stop = parts[1]
            .parse::<usize>()
            .map_err(|_| ParseError::somewhere("usize", parts[1].to_string()))?;
        if stop < start {
            return Err(ParseError::somewhere("start<=stop", text.to_string()));
        }
        // stop >= start, so the length is at least 1
        let edit = Edit {
            position: start,
            kind: EditKind::Deletion {
                len: stop - start + 1,
            },
        };
        return Ok((edit, None));
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Err(ParseError::somewhere(
            "a deletion, insertion or substitution",
            text.to_string(),
        ));
    }

    if chars[0].is_ascii_digit() {
        // insertion: <pos><letters>
        let digits: String = chars.iter().take_while(|c| c.is_ascii_digit()).collect();
        let letters: Vec<char> = chars[digits.len()..].to_vec();
        if letters.is_empty() || !letters.iter().all(|c| c.is_alphabetic()) {
            return Err(ParseError::somewhere("pos+sequence", text.to_string()));
        }
        let position = digits
            .parse::<usize>()
            .map_err(|_| ParseError::somewhere("usize", digits))?;
        let edit = Edit {
            position,
            kind: EditKind::Insertion { seq: letters },
        };
        return Ok((edit, None));
    }

    // substitution: <refSymbol><pos><altSymbol>
    if chars.len() >= 3 && chars[0].is_alphabetic() && chars[chars.len() - 1].is_alphabetic() {
        let digits: String = chars[1..chars.len() - 1].iter().collect();
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            let position = digits
                .parse::<usize>()
                .map_err(|_| ParseError::somewhere("usize", digits))?;
            let edit = Edit {
                position,
                kind: EditKind::Substitution {
                    alt: chars[chars.len() - 1],
                },
            };
            return Ok((edit, Some(chars[0])));
        }
    }

    Err(ParseError::somewhere(
        "a deletion, insertion or substitution",
        text.to_string(),
    ))
}

impl TryFrom<&str> for Edit {
    type Error = ParseError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        parse_edit(text).map(|(edit, _claimed_ref)| edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deletion() {
        let edit = Edit::try_from("Δ2-3").unwrap();
        assert_eq!(edit, Edit::deletion(2, 2).unwrap());
        assert_eq!(edit.left_position(), 2);
        assert_eq!(edit.right_position(), 3);

        let single = Edit::try_from("Δ7-7").unwrap();
        assert_eq!(single, Edit::deletion(7, 1).unwrap());

        assert!(Edit::try_from("Δ3-2").is_err());
        assert!(Edit::try_from("Δ2").is_err());
        assert!(Edit::try_from("Δ2-x").is_err());
    }

    #[test]
    fn test_parse_insertion() {
        let edit = Edit::try_from("2TT").unwrap();
        assert_eq!(edit, Edit::insertion(2, vec!['T', 'T']).unwrap());
        assert_eq!(edit.right_position(), 3);

        // anchor 0 = before the first base
        let edit = Edit::try_from("0AC").unwrap();
        assert_eq!(edit, Edit::insertion(0, vec!['A', 'C']).unwrap());

        assert!(Edit::try_from("2").is_err());
        assert!(Edit::try_from("2T-").is_err());
    }

    #[test]
    fn test_parse_substitution() {
        let (edit, claimed) = parse_edit("C2T").unwrap();
        assert_eq!(edit, Edit::substitution(2, 'T'));
        assert_eq!(claimed, Some('C'));
        assert_eq!(edit.left_position(), 2);
        assert_eq!(edit.right_position(), 2);

        assert!(Edit::try_from("CT").is_err());
        assert!(Edit::try_from("C2").is_err());
        assert!(Edit::try_from("").is_err());
        assert!(Edit::try_from("?2T").is_err());
    }

    #[test]
    fn test_degenerate_payloads() {
        assert!(Edit::deletion(1, 0).is_err());
        assert!(Edit::insertion(1, Vec::new()).is_err());
    }

    #[test]
    fn test_lengths_and_deltas() {
        assert_eq!(Edit::substitution(3, 'A').len(), 1);
        assert_eq!(Edit::substitution(3, 'A').length_delta(), 0);
        assert_eq!(Edit::deletion(3, 4).unwrap().len(), 4);
        assert_eq!(Edit::deletion(3, 4).unwrap().length_delta(), -4);
        assert_eq!(Edit::insertion(3, vec!['A', 'C']).unwrap().len(), 2);
        assert_eq!(Edit::insertion(3, vec!['A', 'C']).unwrap().length_delta(), 2);
    }
}
