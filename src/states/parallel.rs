use ndarray::Array2;
use rayon::prelude::*;

use crate::collab::{StepIndex, VariantSource};
use crate::config::WindowConfig;
use crate::ibs::IbsTable;
use crate::states::composite_builder::CompositeHaplotypeBuilder;
use crate::states::materializer::materialize_into;

/// One target haplotype's materialized output: its `(n_markers,
/// max_states)` matrices plus the number of composite haplotypes actually
/// produced.
pub struct TargetStates {
    pub hap: Array2<i64>,
    pub m: Array2<bool>,
    pub n_comp_haps: usize,
}

/// Materializes every target haplotype in the cohort, fanning out across
/// target haplotypes with one private [`CompositeHaplotypeBuilder`] scratch
/// per worker (§5: "each worker owns a private Composite-Haplotype
/// Builder scratch and a private PBWT Updater scratch... no shared mutable
/// state exists within the core").
///
/// The [`IbsTable`] is built once up front and shared read-only by every
/// worker, since §4.E documents it as safe for concurrent readers once
/// constructed.
pub fn par_materialize_cohort(
    variants: &(dyn VariantSource + Sync),
    steps: &(dyn StepIndex + Sync),
    config: &WindowConfig,
) -> Vec<TargetStates> {
    let table = IbsTable::build(variants, steps, config);
    let n_markers = variants.n_markers();
    let n_ref_haps = variants.n_ref_haps();
    let n_targets = variants.n_haps() - n_ref_haps;
    let max_states = config.max_states;
    let seed = config.seed;

    (0..n_targets)
        .into_par_iter()
        .map_init(
            || CompositeHaplotypeBuilder::new(config, n_ref_haps),
            |builder, targ_hap_idx| {
                let targ_hap = n_ref_haps + targ_hap_idx;
                let mut hap = Array2::<i64>::zeros((n_markers, max_states));
                let mut m = Array2::<bool>::default((n_markers, max_states));
                let n_comp_haps = materialize_into(
                    variants, steps, &table, builder, targ_hap, seed, &mut hap, &mut m,
                );
                TargetStates {
                    hap,
                    m,
                    n_comp_haps,
                }
            },
        )
        .collect()
}
