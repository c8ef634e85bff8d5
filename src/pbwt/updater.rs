use crate::errors::{fail, CoreError};
use crate::pbwt::int_list::IntList;

/// Maintains a prefix permutation of haplotypes across one-marker updates.
///
/// State is a set of growable per-allele buckets (`buckets[v]` holds, in
/// arrival order, every haplotype that carries allele `v` at the current
/// marker). `buckets` grows lazily the first time an allele index exceeds
/// its current length, rather than being pre-sized for a global maximum
/// allele count — most markers in a cohort are biallelic so most buckets
/// vectors never grow past length 2.
#[derive(Debug, Clone)]
pub struct PbwtUpdater {
    n_haps: usize,
    buckets: Vec<IntList>,
    seen: Vec<bool>,
}

impl PbwtUpdater {
    pub fn new(n_haps: usize) -> Self {
        Self {
            n_haps,
            buckets: Vec::new(),
            seen: vec![false; n_haps],
        }
    }

    pub fn n_haps(&self) -> usize {
        self.n_haps
    }

    fn ensure_buckets(&mut self, n_alleles: usize) {
        if self.buckets.len() < n_alleles {
            self.buckets.resize(n_alleles, IntList::new());
        }
    }

    /// Confirms `prefix` touches every value in `[0, nHaps)` exactly once,
    /// reusing the `seen` scratch buffer rather than allocating one per
    /// call.
    fn check_permutation(&mut self, prefix: &[usize]) {
        for &h in prefix {
            if h >= self.n_haps || self.seen[h] {
                fail(CoreError::NotAPermutation {
                    n_haps: self.n_haps,
                    detail: if h >= self.n_haps {
                        format!("value {h} is out of range [0, {})", self.n_haps)
                    } else {
                        format!("value {h} appears more than once")
                    },
                });
            }
            self.seen[h] = true;
        }
        for &h in prefix {
            self.seen[h] = false;
        }
    }

    /// Rewrites `prefix` in place into the PBWT state just after the
    /// current marker.
    ///
    /// For each haplotype `h`, traversed in the order given by the
    /// incoming `prefix`, appends `h` to `buckets[alleles[h]]`; then
    /// concatenates the buckets in ascending allele order back into
    /// `prefix`. Stable within each bucket — this is what gives PBWT its
    /// "sorted by reverse prefix" property (testable property 2, §8).
    ///
    /// Panics (contract violation, §7) if `n_alleles < 1`, if `prefix`'s
    /// length doesn't match `nHaps`, if `alleles`'s length doesn't match
    /// `prefix`'s, if any observed allele is out of range, or if `prefix`
    /// isn't a permutation of `[0, nHaps)`.
    pub fn update(&mut self, alleles: &[usize], n_alleles: usize, prefix: &mut [usize]) {
        if n_alleles < 1 {
            fail(CoreError::InvalidAlleleCount(n_alleles));
        }
        if prefix.len() != self.n_haps {
            fail(CoreError::PrefixLengthMismatch {
                got: prefix.len(),
                want: self.n_haps,
            });
        }
        if alleles.len() != prefix.len() {
            fail(CoreError::AlleleLengthMismatch {
                got: alleles.len(),
                want: prefix.len(),
            });
        }
        self.check_permutation(prefix);

        self.ensure_buckets(n_alleles);
        for bucket in &mut self.buckets[..n_alleles] {
            bucket.clear();
        }

        for &h in prefix.iter() {
            let allele = alleles[h];
            if allele >= n_alleles {
                fail(CoreError::AlleleOutOfRange {
                    hap: h,
                    allele,
                    n_alleles,
                });
            }
            self.buckets[allele].push(h);
        }

        let mut i = 0;
        for bucket in &self.buckets[..n_alleles] {
            for pos in 0..bucket.len() {
                prefix[i] = bucket.get(pos);
                i += 1;
            }
        }
        debug_assert_eq!(i, prefix.len());

        for bucket in &mut self.buckets[..n_alleles] {
            bucket.clear();
        }
    }
}

/// Free-function form of [`PbwtUpdater::update`], for one-shot callers that
/// don't need to amortize bucket allocation across many markers (§6).
pub fn pbwt_update(n_haps: usize, alleles: &[usize], n_alleles: usize, prefix: &mut [usize]) {
    let mut updater = PbwtUpdater::new(n_haps);
    updater.update(alleles, n_alleles, prefix);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(p: &[usize], n: usize) -> bool {
        let mut seen = vec![false; n];
        for &x in p {
            if x >= n || seen[x] {
                return false;
            }
            seen[x] = true;
        }
        true
    }

    #[test]
    fn s1_single_marker_two_alleles() {
        let mut prefix = [0usize, 1, 2, 3];
        let mut u = PbwtUpdater::new(4);
        u.update(&[0, 1, 0, 1], 2, &mut prefix);
        assert_eq!(prefix, [0, 2, 1, 3]);
    }

    #[test]
    fn s2_identity_under_monomorphic() {
        let mut prefix = [2usize, 4, 1, 0, 3];
        let mut u = PbwtUpdater::new(5);
        u.update(&[0, 0, 0, 0, 0], 1, &mut prefix);
        assert_eq!(prefix, [2, 4, 1, 0, 3]);
    }

    #[test]
    fn s3_two_markers() {
        let mut prefix = [0usize, 1, 2, 3];
        let mut u = PbwtUpdater::new(4);
        u.update(&[0, 1, 0, 1], 2, &mut prefix);
        assert_eq!(prefix, [0, 2, 1, 3]);
        u.update(&[1, 1, 0, 0], 2, &mut prefix);
        // Traversal order is [0, 2, 1, 3]; allele-0 bucket collects [2, 3],
        // allele-1 bucket collects [0, 1], so bucket0 ++ bucket1 = [2, 3, 0, 1].
        assert_eq!(prefix, [2, 3, 0, 1]);
    }

    #[test]
    fn preserves_permutation_invariant() {
        let mut prefix: Vec<usize> = (0..37).collect();
        let mut u = PbwtUpdater::new(37);
        let alleles: Vec<usize> = (0..37).map(|h| h % 4).collect();
        u.update(&alleles, 4, &mut prefix);
        assert!(is_permutation(&prefix, 37));
    }

    #[test]
    fn bucket_ordering_invariant() {
        let mut prefix = [0usize, 1, 2, 3, 4, 5];
        let mut u = PbwtUpdater::new(6);
        u.update(&[2, 0, 1, 0, 2, 1], 3, &mut prefix);
        // all allele-0 haps precede all allele-1 haps precede all allele-2 haps
        let allele_of = |h: usize| -> usize { [2, 0, 1, 0, 2, 1][h] };
        let coded: Vec<usize> = prefix.iter().map(|&h| allele_of(h)).collect();
        for w in coded.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn stability_within_allele() {
        // haplotypes 1 and 3 both carry allele 0; 1 precedes 3 on input, so
        // must precede 3 on output too.
        let mut prefix = [3usize, 1, 0, 2];
        let mut u = PbwtUpdater::new(4);
        u.update(&[1, 0, 1, 0], 2, &mut prefix);
        let pos = |h: usize| prefix.iter().position(|&x| x == h).unwrap();
        assert!(pos(1) < pos(3));
    }

    #[test]
    fn empty_cohort() {
        let mut prefix: [usize; 0] = [];
        let mut u = PbwtUpdater::new(0);
        u.update(&[], 2, &mut prefix);
        assert_eq!(prefix.len(), 0);
    }

    #[test]
    #[should_panic]
    fn rejects_n_alleles_below_one() {
        let mut prefix = [0usize];
        let mut u = PbwtUpdater::new(1);
        u.update(&[0], 0, &mut prefix);
    }

    #[test]
    #[should_panic]
    fn rejects_allele_out_of_range() {
        let mut prefix = [0usize, 1];
        let mut u = PbwtUpdater::new(2);
        u.update(&[0, 5], 2, &mut prefix);
    }

    #[test]
    #[should_panic]
    fn rejects_length_mismatch() {
        let mut prefix = [0usize, 1, 2];
        let mut u = PbwtUpdater::new(3);
        u.update(&[0, 1], 2, &mut prefix);
    }

    #[test]
    #[should_panic]
    fn rejects_prefix_with_repeated_value() {
        let mut prefix = [0usize, 1, 1, 3];
        let mut u = PbwtUpdater::new(4);
        u.update(&[0, 1, 0, 1], 2, &mut prefix);
    }

    #[test]
    #[should_panic]
    fn rejects_prefix_wrong_length_for_n_haps() {
        let mut prefix = [0usize, 1, 2];
        let mut u = PbwtUpdater::new(4);
        u.update(&[0, 1, 0], 2, &mut prefix);
    }

    #[test]
    fn check_permutation_is_reusable_across_valid_calls() {
        // The `seen` scratch must be fully cleared after each successful
        // call, not just after a failure.
        let mut prefix = [0usize, 1, 2, 3];
        let mut u = PbwtUpdater::new(4);
        u.update(&[0, 1, 0, 1], 2, &mut prefix);
        u.update(&[1, 1, 0, 0], 2, &mut prefix);
        assert!(is_permutation(&prefix, 4));
    }
}
