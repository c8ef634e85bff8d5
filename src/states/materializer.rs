use ndarray::Array2;

use crate::collab::{StepIndex, VariantSource};
use crate::config::WindowConfig;
use crate::ibs::IbsTable;
use crate::states::composite_builder::{CompositeHaplotypeBuilder, Mosaic};

/// Expands per-target-haplotype mosaics into the dense `(nMarkers x
/// nCompHaps)` reference-haplotype and allele-match matrices the outer HMM
/// consumes (§4.H).
pub struct ImpStates<'v, 's> {
    variants: &'v dyn VariantSource,
    steps: &'s dyn StepIndex,
    table: IbsTable,
    builder: CompositeHaplotypeBuilder,
    seed: Option<u64>,
}

impl<'v, 's> ImpStates<'v, 's> {
    pub fn new(variants: &'v dyn VariantSource, steps: &'s dyn StepIndex, config: &WindowConfig) -> Self {
        let table = IbsTable::build(variants, steps, config);
        let builder = CompositeHaplotypeBuilder::new(config, variants.n_ref_haps());
        Self {
            variants,
            steps,
            table,
            builder,
            seed: config.seed,
        }
    }

    pub fn table(&self) -> &IbsTable {
        &self.table
    }

    /// Fills `hap_out`/`match_out` (both shaped `(n_markers, max_states)`,
    /// caller-owned) for target haplotype `targ_hap` — the *global*
    /// haplotype index, in `[n_ref_haps, n_haps)` — and returns the number
    /// of composite haplotypes actually produced.
    ///
    /// Columns `[nCompHaps, max_states)` of both matrices are left
    /// untouched — callers must only read the first `nCompHaps` columns
    /// of the returned shape.
    pub fn materialize(
        &mut self,
        targ_hap: usize,
        hap_out: &mut Array2<i64>,
        match_out: &mut Array2<bool>,
    ) -> usize {
        materialize_into(
            self.variants,
            self.steps,
            &self.table,
            &mut self.builder,
            targ_hap,
            self.seed,
            hap_out,
            match_out,
        )
    }

    fn materialize_mosaic(
        &self,
        mosaic: &Mosaic,
        c: usize,
        shifted_targ: usize,
        hap_out: &mut Array2<i64>,
        match_out: &mut Array2<bool>,
    ) {
        materialize_mosaic_into(self.variants, mosaic, c, shifted_targ, hap_out, match_out)
    }
}

/// Standalone form of [`ImpStates::materialize`] taking the shared,
/// read-only `table` and a caller-supplied `builder` by mutable reference,
/// so a parallel driver can give each worker its own builder while sharing
/// one `IbsTable` across all of them (§5).
pub fn materialize_into(
    variants: &dyn VariantSource,
    steps: &dyn StepIndex,
    table: &IbsTable,
    builder: &mut CompositeHaplotypeBuilder,
    targ_hap: usize,
    seed: Option<u64>,
    hap_out: &mut Array2<i64>,
    match_out: &mut Array2<bool>,
) -> usize {
    let n_markers = variants.n_markers();

    let mosaics = builder.build_for_target(targ_hap, table, steps, n_markers, seed);

    for (c, mosaic) in mosaics.iter().enumerate() {
        materialize_mosaic_into(variants, mosaic, c, targ_hap, hap_out, match_out);
    }

    mosaics.len()
}

fn materialize_mosaic_into(
    variants: &dyn VariantSource,
    mosaic: &Mosaic,
    c: usize,
    shifted_targ: usize,
    hap_out: &mut Array2<i64>,
    match_out: &mut Array2<bool>,
) {
    let mut cursor = 0usize;
    let mut m = 0usize;
    let n_markers = variants.n_markers();
    while m < n_markers {
        if m >= mosaic.comp_end[cursor] {
            cursor += 1;
        }
        let hap = mosaic.comp_hap[cursor];
        hap_out[[m, c]] = hap as i64;
        match_out[[m, c]] = variants.allele(m, shifted_targ) == variants.allele(m, hap);
        m += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        n_markers: usize,
        n_haps: usize,
        n_ref_haps: usize,
        alleles: Vec<Vec<usize>>,
    }

    impl VariantSource for Fixed {
        fn n_markers(&self) -> usize {
            self.n_markers
        }
        fn n_haps(&self) -> usize {
            self.n_haps
        }
        fn n_ref_haps(&self) -> usize {
            self.n_ref_haps
        }
        fn n_alleles(&self, _m: usize) -> usize {
            2
        }
        fn allele(&self, m: usize, h: usize) -> usize {
            self.alleles[m][h]
        }
    }

    struct UniformSteps {
        size: usize,
        n_markers: usize,
    }

    impl StepIndex for UniformSteps {
        fn n_steps(&self) -> usize {
            (self.n_markers + self.size - 1) / self.size
        }
        fn step_start(&self, s: usize) -> usize {
            (s * self.size).min(self.n_markers)
        }
    }

    #[test]
    fn materialize_produces_rectangular_matrices_across_a_segment_boundary() {
        // Hand-construct mosaics directly, bypassing the IBS search, to
        // pin down the marker-walk/match logic in isolation. Target
        // carries [0,1,0]; reference hap 5 carries [0,0,1] and hap 1
        // carries [1,1,0] at markers 0..3.
        let variants = Fixed {
            n_markers: 3,
            n_haps: 7, // haps 0..5 reference, hap 6 the (only) target
            n_ref_haps: 6,
            alleles: vec![
                vec![0, 1, 0, 0, 0, 0, 0],
                vec![0, 1, 0, 0, 0, 0, 1],
                vec![0, 0, 0, 0, 0, 1, 0],
            ],
        };
        // One mosaic spans hap 5 for the whole window via two segments
        // that happen to reuse the same haplotype either side of the
        // marker-2 split; the other is hap 1 as a single segment.
        let m1 = Mosaic {
            comp_hap: vec![5, 5],
            comp_end: vec![2, 3],
        };
        let m2 = Mosaic {
            comp_hap: vec![1],
            comp_end: vec![3],
        };

        let steps = UniformSteps {
            size: 1,
            n_markers: 3,
        };
        let config = WindowConfig::new(2, None);
        let im = ImpStates {
            variants: &variants,
            steps: &steps,
            table: IbsTable::build(&variants, &steps, &config),
            builder: CompositeHaplotypeBuilder::new(&config, 6),
            seed: None,
        };

        let mut hap_out = Array2::<i64>::zeros((3, 2));
        let mut match_out = Array2::<bool>::default((3, 2));
        im.materialize_mosaic(&m1, 0, 6, &mut hap_out, &mut match_out);
        im.materialize_mosaic(&m2, 1, 6, &mut hap_out, &mut match_out);

        assert_eq!(
            hap_out,
            Array2::from_shape_vec((3, 2), vec![5, 1, 5, 1, 5, 1]).unwrap()
        );
        assert_eq!(
            match_out,
            Array2::from_shape_vec((3, 2), vec![true, false, false, true, false, true]).unwrap()
        );
    }
}
