use crate::collab::{CodedStepIndex, VariantSource};
use crate::pbwt::{Direction, PbwtUpdater};

/// One direction (forward or backward) of the IBS neighbor search.
///
/// For every target haplotype and every step, finds one reference
/// haplotype that is IBS with it across the block of markers ending at (or
/// starting from, for backward) the step boundary. Maintains a single PBWT
/// permutation, updated marker by marker, and scans it once per step
/// boundary.
pub struct IbsNeighborSelector {
    direction: Direction,
    n_haps: usize,
    n_ref_haps: usize,
}

impl IbsNeighborSelector {
    pub fn new(direction: Direction, n_haps: usize, n_ref_haps: usize) -> Self {
        Self {
            direction,
            n_haps,
            n_ref_haps,
        }
    }

    fn is_ref(&self, h: usize) -> bool {
        h < self.n_ref_haps
    }

    /// Marker order for this direction across `[0, n_markers)`.
    fn marker_order(&self, n_markers: usize) -> Box<dyn Iterator<Item = usize>> {
        match self.direction {
            Direction::Forward => Box::new(0..n_markers),
            Direction::Backward => Box::new((0..n_markers).rev()),
        }
    }

    /// Step order: forward visits steps `0..n_steps` ascending on the
    /// natural marker axis; backward visits them in the same ascending
    /// step-index order but on the reversed marker axis (§4.D).
    fn step_boundaries(&self, coded: &CodedStepIndex, n_markers: usize) -> Vec<(usize, usize)> {
        // Returns, for each step s in emission order, the exclusive end of
        // the marker range swept so far on this direction's axis.
        let n_steps = coded.n_steps();
        let mut out = Vec::with_capacity(n_steps);
        match self.direction {
            Direction::Forward => {
                for s in 0..n_steps {
                    let end = if s + 1 < n_steps {
                        coded.step_start(s + 1)
                    } else {
                        n_markers
                    };
                    out.push((s, end));
                }
            }
            Direction::Backward => {
                // Backward step `s` covers the suffix [stepStart(s), nMarkers):
                // it becomes decidable once that many markers have been
                // consumed from the end, so boundaries are emitted with `s`
                // descending (consumed count ascending).
                for s in (0..n_steps).rev() {
                    let consumed = n_markers - coded.step_start(s);
                    out.push((s, consumed));
                }
            }
        }
        out
    }

    /// Builds the `[target][step] -> reference haplotype or -1` table for
    /// this single direction.
    pub fn build(&self, variants: &dyn VariantSource, coded: &CodedStepIndex) -> IbsDirectionTable {
        let n_markers = variants.n_markers();
        let n_targets = self.n_haps - self.n_ref_haps;
        let n_steps = coded.n_steps();

        let mut table = vec![-1i64; n_targets * n_steps];
        if self.n_ref_haps == 0 || n_markers == 0 {
            return IbsDirectionTable {
                n_targets,
                n_steps,
                table,
            };
        }

        let boundaries = self.step_boundaries(coded, n_markers);
        let mut prefix: Vec<usize> = (0..self.n_haps).collect();
        let mut updater = PbwtUpdater::new(self.n_haps);

        let mut markers_consumed = 0usize;
        let mut boundary_idx = 0usize;
        let mut alleles = vec![0usize; self.n_haps];

        for m in self.marker_order(n_markers) {
            let n_alleles = variants.n_alleles(m);
            for (h, slot) in alleles.iter_mut().enumerate() {
                *slot = variants.allele(m, h);
            }
            updater.update(&alleles, n_alleles, &mut prefix);
            markers_consumed += 1;

            while boundary_idx < boundaries.len() && boundaries[boundary_idx].1 == markers_consumed
            {
                let s = boundaries[boundary_idx].0;
                self.scan_boundary(&prefix, s, n_targets, n_steps, &mut table);
                boundary_idx += 1;
            }
        }

        IbsDirectionTable {
            n_targets,
            n_steps,
            table,
        }
    }

    /// Scans the PBWT permutation `prefix` at a step boundary: for every
    /// position occupied by a target haplotype, finds the nearest
    /// reference haplotype above and below (skipping other targets) and
    /// records the closer one. Ties (both neighbors equidistant) prefer
    /// the lower haplotype index — a deterministic rule fixed because the
    /// upstream tie-break policy isn't part of the observable contract
    /// (§4.D open question).
    fn scan_boundary(
        &self,
        prefix: &[usize],
        s: usize,
        n_targets: usize,
        n_steps: usize,
        table: &mut [i64],
    ) {
        let n = prefix.len();
        for i in 0..n {
            let h = prefix[i];
            if self.is_ref(h) {
                continue;
            }
            let target_idx = h - self.n_ref_haps;

            let mut above = None;
            for j in (0..i).rev() {
                if self.is_ref(prefix[j]) {
                    above = Some((i - j, prefix[j]));
                    break;
                }
            }
            let mut below = None;
            for j in (i + 1)..n {
                if self.is_ref(prefix[j]) {
                    below = Some((j - i, prefix[j]));
                    break;
                }
            }

            let chosen = match (above, below) {
                (Some((da, ha)), Some((db, hb))) => {
                    if da < db {
                        Some(ha)
                    } else if db < da {
                        Some(hb)
                    } else {
                        Some(ha.min(hb))
                    }
                }
                (Some((_, ha)), None) => Some(ha),
                (None, Some((_, hb))) => Some(hb),
                (None, None) => None,
            };

            if let Some(hap) = chosen {
                table[target_idx * n_steps + s] = hap as i64;
            }
            debug_assert!(target_idx < n_targets);
        }
    }
}

/// One direction's `[target][step] -> reference haplotype or -1` table.
#[derive(Debug, Clone)]
pub struct IbsDirectionTable {
    n_targets: usize,
    n_steps: usize,
    table: Vec<i64>,
}

impl IbsDirectionTable {
    pub fn lookup(&self, targ_hap_idx: usize, step: usize) -> i64 {
        self.table[targ_hap_idx * self.n_steps + step]
    }

    pub fn n_targets(&self) -> usize {
        self.n_targets
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }
}
