//! PBWT-driven identity-by-state (IBS) state selection for phasing and
//! imputation.
//!
//! Given a target haplotype at a window of markers, this crate's job is to
//! efficiently pick a bounded set of "pseudo-reference" haplotypes —
//! mosaics stitched together from IBS-matching reference haplotypes — to
//! serve as hidden states for a downstream Li-Stephens HMM. It does not
//! parse variant-call files, read binary reference panels, slice windows,
//! run the HMM itself, or write output: those are all collaborator
//! concerns reached only through the traits in [`collab`].
//!
//! The pipeline, leaves first:
//!
//! - [`pbwt`] — the prefix-array updater (one marker at a time) and its
//!   supporting growable integer lists.
//! - [`ibs`] — forward/backward IBS neighbor selectors built on top of the
//!   PBWT updater, and the bidirectional table that serves `O(1)` lookups.
//! - [`states`] — the composite-haplotype builder (with its random
//!   fallback) and the materializer that expands mosaics into the dense
//!   `(marker x state)` matrices an HMM consumes.

pub mod collab;
pub mod config;
pub mod errors;
pub mod ibs;
pub mod pbwt;
pub mod states;

pub use collab::{CodedStepIndex, StepIndex, VariantSource};
pub use config::WindowConfig;
pub use errors::CoreError;
pub use ibs::IbsTable;
pub use pbwt::{pbwt_update, Direction, PbwtUpdater};
pub use states::{par_materialize_cohort, CompositeHaplotypeBuilder, ImpStates, Mosaic};
