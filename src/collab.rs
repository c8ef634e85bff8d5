//! Collaborator contracts (§6). The core never implements these itself —
//! the VCF parser/writer, the binary reference-panel reader, window
//! slicing, and the CLI front end all live outside this crate and are
//! reached only through these traits.

/// The cohort of haplotypes and their alleles at each marker.
///
/// Reference haplotypes occupy `[0, n_ref_haps())`; target haplotypes
/// occupy `[n_ref_haps(), n_haps())`.
pub trait VariantSource {
    fn n_markers(&self) -> usize;
    fn n_haps(&self) -> usize;
    fn n_ref_haps(&self) -> usize;
    fn n_alleles(&self, m: usize) -> usize;
    /// Allele value in `[0, n_alleles(m))` for haplotype `h` at marker `m`.
    fn allele(&self, m: usize, h: usize) -> usize;
}

/// Partition of `[0, n_markers)` into contiguous, strictly increasing
/// "steps" — the coarse granularity at which IBS neighbors are recorded.
pub trait StepIndex {
    fn n_steps(&self) -> usize;
    /// First marker of step `s`. Invariants: `step_start(0) == 0`,
    /// `step_start(n_steps()) == n_markers`, strictly increasing.
    fn step_start(&self, s: usize) -> usize;
}

/// Convenience facade combining a [`VariantSource`] and a [`StepIndex`] so
/// the IBS selector can ask for "the allele at this step" without ever
/// re-deriving marker bounds itself (§4.C).
pub struct CodedStepIndex<'v, 's> {
    variants: &'v dyn VariantSource,
    steps: &'s dyn StepIndex,
}

impl<'v, 's> CodedStepIndex<'v, 's> {
    pub fn new(variants: &'v dyn VariantSource, steps: &'s dyn StepIndex) -> Self {
        Self { variants, steps }
    }

    pub fn n_steps(&self) -> usize {
        self.steps.n_steps()
    }

    pub fn step_start(&self, s: usize) -> usize {
        self.steps.step_start(s)
    }

    /// Allele value for haplotype `h` at the first marker of step `s` —
    /// the "coded allele" used as a representative value when a caller
    /// needs one allele per step rather than one per marker.
    pub fn coded_allele(&self, s: usize, h: usize) -> usize {
        self.variants.allele(self.step_start(s), h)
    }

    pub fn variants(&self) -> &'v dyn VariantSource {
        self.variants
    }
}

/// Panics with a [`crate::errors::CoreError::MalformedStepIndex`] diagnostic
/// unless `steps` satisfies the invariants from §3: `stepStart(0) == 0`,
/// `stepStart(nSteps) == nMarkers`, strictly increasing.
pub fn validate_step_index(steps: &dyn StepIndex, n_markers: usize) {
    use crate::errors::{fail, CoreError};

    let n_steps = steps.n_steps();
    if n_steps == 0 {
        if n_markers != 0 {
            fail(CoreError::MalformedStepIndex {
                detail: format!("nSteps == 0 but nMarkers == {n_markers}"),
            });
        }
        return;
    }
    if steps.step_start(0) != 0 {
        fail(CoreError::MalformedStepIndex {
            detail: format!("stepStart(0) == {} (expected 0)", steps.step_start(0)),
        });
    }
    if steps.step_start(n_steps) != n_markers {
        fail(CoreError::MalformedStepIndex {
            detail: format!(
                "stepStart(nSteps) == {} (expected nMarkers == {n_markers})",
                steps.step_start(n_steps)
            ),
        });
    }
    for s in 1..=n_steps {
        if steps.step_start(s - 1) >= steps.step_start(s) {
            fail(CoreError::MalformedStepIndex {
                detail: format!(
                    "stepStart not strictly increasing at step {s}: {} >= {}",
                    steps.step_start(s - 1),
                    steps.step_start(s)
                ),
            });
        }
    }
}
