//! Canonical edit-list descriptions of how a biological sequence differs
//! from a reference, and the machinery to move them between references.
//!
//! A [`Haplotype`] is an ordered, validated list of atomic [`Edit`]s
//! (substitution, insertion, deletion) over one shared reference
//! [`Sequence`]; it can be built from an edit list, extracted from a
//! pairwise [`Alignment`], or grouped from [`Variation`]s. A `Variation`
//! is a single reference-bound edit with a compact text form and
//! VCF-style ref/alt bases. [`translate`] re-anchors a variation on a new
//! reference through a bridging alignment, classifying every mapping
//! outcome as [`Translation::Translated`], [`Translation::NoChange`] or
//! [`Translation::Inapplicable`].

mod alignment;
mod edit;
pub mod error;
mod haplotype;
mod sequence;
mod translate;
mod variation;

pub use crate::alignment::{AlignOp, Alignment};
pub use crate::edit::{Edit, EditKind};
pub use crate::error::{ConstructionError, ParseError, SeqVarError, UsageError};
pub use crate::haplotype::Haplotype;
pub use crate::sequence::Sequence;
pub use crate::translate::{translate, Translation};
pub use crate::variation::Variation;
