use crate::collab::{validate_step_index, CodedStepIndex, StepIndex, VariantSource};
use crate::config::WindowConfig;
use crate::ibs::selector::{IbsDirectionTable, IbsNeighborSelector};
use crate::pbwt::Direction;

/// Owns one forward and one backward [`IbsNeighborSelector`] result and
/// serves combined `(direction, target, step) -> reference hap or -1`
/// queries in O(1) (§4.E).
pub struct IbsTable {
    n_ref_haps: usize,
    fwd: IbsDirectionTable,
    bwd: IbsDirectionTable,
}

impl IbsTable {
    /// Runs both directions across the same marker set and returns the
    /// combined, read-only table.
    ///
    /// Validates `config` (§10.C) once per window before doing any work,
    /// even though the table itself only needs `variants`/`steps` — this
    /// is the same per-window configuration record the composite builder
    /// validates, so a bad `K` is caught before either structure is built.
    pub fn build(variants: &dyn VariantSource, steps: &dyn StepIndex, config: &WindowConfig) -> Self {
        config.validate();
        validate_step_index(steps, variants.n_markers());
        let coded = CodedStepIndex::new(variants, steps);

        let n_haps = variants.n_haps();
        let n_ref_haps = variants.n_ref_haps();

        log::debug!(
            "building IBS table: {} markers, {} steps, {} ref haps, {} target haps",
            variants.n_markers(),
            coded.n_steps(),
            n_ref_haps,
            n_haps - n_ref_haps
        );

        let fwd_selector = IbsNeighborSelector::new(Direction::Forward, n_haps, n_ref_haps);
        let fwd = fwd_selector.build(variants, &coded);

        let bwd_selector = IbsNeighborSelector::new(Direction::Backward, n_haps, n_ref_haps);
        let bwd = bwd_selector.build(variants, &coded);

        Self {
            n_ref_haps,
            fwd,
            bwd,
        }
    }

    /// `-1` when no IBS neighbor was found for `(targ_hap, step)`.
    ///
    /// `targ_hap` is the *global* haplotype index, i.e. in
    /// `[n_ref_haps, n_haps)` (§3), matching the collaborator-facing API
    /// in §6 — not a 0-based offset within the target range.
    pub fn lookup(&self, direction: Direction, targ_hap: usize, step: usize) -> i64 {
        let local = targ_hap - self.n_ref_haps;
        match direction {
            Direction::Forward => self.fwd.lookup(local, step),
            Direction::Backward => self.bwd.lookup(local, step),
        }
    }

    pub fn n_steps(&self) -> usize {
        self.fwd.n_steps()
    }

    pub fn n_targets(&self) -> usize {
        self.fwd.n_targets()
    }
}
