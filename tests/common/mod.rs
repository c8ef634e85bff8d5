use pbwt_states::{StepIndex, VariantSource};

/// A small, fully in-memory cohort for tests: alleles given directly as a
/// `(marker, haplotype) -> allele` table, binary at every marker unless
/// overridden.
pub struct InMemoryCohort {
    pub n_markers: usize,
    pub n_haps: usize,
    pub n_ref_haps: usize,
    pub alleles: Vec<Vec<usize>>,
    pub n_alleles: usize,
}

impl InMemoryCohort {
    pub fn biallelic(n_ref_haps: usize, n_targets: usize, alleles: Vec<Vec<usize>>) -> Self {
        let n_markers = alleles.len();
        let n_haps = n_ref_haps + n_targets;
        for row in &alleles {
            assert_eq!(row.len(), n_haps);
        }
        Self {
            n_markers,
            n_haps,
            n_ref_haps,
            alleles,
            n_alleles: 2,
        }
    }
}

impl VariantSource for InMemoryCohort {
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
        self.n_alleles
    }
    fn allele(&self, m: usize, h: usize) -> usize {
        self.alleles[m][h]
    }
}

/// Uniform-size step partition: every step covers `step_size` markers
/// except possibly the last, which is truncated to `n_markers`.
pub struct UniformSteps {
    pub step_size: usize,
    pub n_markers: usize,
}

impl StepIndex for UniformSteps {
    fn n_steps(&self) -> usize {
        if self.n_markers == 0 {
            0
        } else {
            (self.n_markers + self.step_size - 1) / self.step_size
        }
    }
    fn step_start(&self, s: usize) -> usize {
        (s * self.step_size).min(self.n_markers)
    }
}

/// Deterministic pseudo-random biallelic cohort, useful for exercising the
/// PBWT/IBS machinery at a scale where hand-written fixtures would be
/// unwieldy. Not cryptographically anything — just a cheap xorshift so
/// tests don't need an extra dependency.
pub fn pseudo_random_cohort(
    n_markers: usize,
    n_ref_haps: usize,
    n_targets: usize,
    seed: u64,
) -> InMemoryCohort {
    let n_haps = n_ref_haps + n_targets;
    let mut state = seed | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let alleles = (0..n_markers)
        .map(|_| (0..n_haps).map(|_| (next() & 1) as usize).collect())
        .collect();
    InMemoryCohort::biallelic(n_ref_haps, n_targets, alleles)
}
