use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::collab::StepIndex;
use crate::config::WindowConfig;
use crate::ibs::IbsTable;
use crate::pbwt::Direction;

/// One mosaic segment under construction: which reference haplotype is
/// currently spliced in, where its segment started, and the step at which
/// it was most recently re-observed as an IBS neighbor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct QueueEntry {
    last_step: usize,
    hap: usize,
    start_marker: usize,
    slot: usize,
}

// Reversed so a std `BinaryHeap` (a max-heap) pops the *smallest*
// `last_step` first, i.e. behaves as the min-priority queue §4.F requires.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.last_step.cmp(&self.last_step)
    }
}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One completed (or in-progress) mosaic: a piecewise-constant sequence of
/// reference haplotypes, `comp_hap[i]` used up to (exclusive) `comp_end[i]`.
#[derive(Debug, Clone, Default)]
pub struct Mosaic {
    pub comp_hap: Vec<usize>,
    pub comp_end: Vec<usize>,
}

/// Builds, for one target haplotype at a time, up to `K` mosaic composite
/// reference haplotypes spanning all markers (§4.F, §4.G).
///
/// All scratch (`hap_to_last_step`, `touched`, `queue`, `mosaics`) is
/// cleared — never reallocated — between target haplotypes, per §3's
/// ownership rules.
pub struct CompositeHaplotypeBuilder {
    k: usize,
    n_ref_haps: usize,
    hap_to_last_step: Vec<i64>,
    touched: Vec<usize>,
    queue: BinaryHeap<QueueEntry>,
    mosaics: Vec<Mosaic>,
}

const ABSENT: i64 = -1;

impl CompositeHaplotypeBuilder {
    /// Validates `config` (§10.C: `K >= 1`) once per window, then sizes
    /// scratch from `config.max_states` and `n_ref_haps`.
    pub fn new(config: &WindowConfig, n_ref_haps: usize) -> Self {
        config.validate();
        let k = config.max_states;
        Self {
            k,
            n_ref_haps,
            hap_to_last_step: vec![ABSENT; n_ref_haps],
            touched: Vec::new(),
            queue: BinaryHeap::with_capacity(k),
            mosaics: (0..k).map(|_| Mosaic::default()).collect(),
        }
    }

    /// Resets all scratch to empty, ready for the next target haplotype.
    /// Only previously-touched `hap_to_last_step` entries are reset, not
    /// the whole (potentially huge) `nRefHaps`-sized array.
    fn reset(&mut self) {
        for &h in &self.touched {
            self.hap_to_last_step[h] = ABSENT;
        }
        self.touched.clear();
        self.queue.clear();
        for m in &mut self.mosaics {
            m.comp_hap.clear();
            m.comp_end.clear();
        }
    }

    fn mark_seen(&mut self, hap: usize, step: usize) {
        if self.hap_to_last_step[hap] == ABSENT {
            self.touched.push(hap);
        }
        self.hap_to_last_step[hap] = step as i64;
    }

    /// One feeding step for observed IBS hit `(hap, step)` (§4.F).
    fn feed_hit(&mut self, hap: usize, step: usize, step_start: &dyn Fn(usize) -> usize) {
        if self.hap_to_last_step[hap] != ABSENT {
            // Case 1: already tracked — just refresh the map; the queue
            // head may now be stale, rebalanced lazily on the next miss.
            self.hap_to_last_step[hap] = step as i64;
            return;
        }

        // Case 2a: rebalance the head until it agrees with the map.
        while let Some(&head) = self.queue.peek() {
            let fresh = self.hap_to_last_step[head.hap];
            if fresh == head.last_step as i64 {
                break;
            }
            let mut stale = self.queue.pop().unwrap();
            stale.last_step = fresh as usize;
            self.queue.push(stale);
        }

        if self.queue.len() < self.k {
            // Case 2b: a free slot.
            let slot = self.queue.len();
            self.mosaics[slot].comp_hap.push(hap);
            self.queue.push(QueueEntry {
                last_step: step,
                hap,
                start_marker: 0,
                slot,
            });
        } else {
            // Case 2c: evict the (now-fresh) minimum.
            let head = self.queue.pop().expect("K >= 1 implies a non-empty queue");
            let split_marker = step_start((head.last_step + step) >> 1);
            self.hap_to_last_step[head.hap] = ABSENT;

            let mosaic = &mut self.mosaics[head.slot];
            mosaic.comp_end.push(split_marker);
            mosaic.comp_hap.push(hap);

            self.queue.push(QueueEntry {
                last_step: step,
                hap,
                start_marker: split_marker,
                slot: head.slot,
            });
        }

        self.mark_seen(hap, step);
    }

    /// Feeds every recorded hit (forward ascending, then backward ascending
    /// on its own reversed axis — the pattern §5 requires) for `targ_hap`,
    /// finalizes open segments, and falls back to random reference
    /// haplotypes if nothing was ever observed (§4.G).
    ///
    /// Returns the produced mosaics; `mosaics.len() <= K`.
    pub fn build_for_target(
        &mut self,
        targ_hap: usize,
        table: &IbsTable,
        steps: &dyn StepIndex,
        n_markers: usize,
        seed: Option<u64>,
    ) -> Vec<Mosaic> {
        self.reset();

        let step_start = |s: usize| steps.step_start(s);
        for dir in [Direction::Forward, Direction::Backward] {
            for s in 0..table.n_steps() {
                let hit = table.lookup(dir, targ_hap, s);
                if hit >= 0 {
                    self.feed_hit(hit as usize, s, &step_start);
                }
            }
        }

        if self.queue.is_empty() {
            log::trace!("no IBS neighbors for target haplotype {targ_hap}; using random fallback");
            self.random_fallback(targ_hap, n_markers, seed);
        } else {
            for entry in self.queue.iter() {
                self.mosaics[entry.slot].comp_end.push(n_markers);
            }
        }

        self.queue
            .iter()
            .map(|entry| self.mosaics[entry.slot].clone())
            .collect()
    }

    /// §4.G: seeds `min(K, nRefHaps)` distinct reference haplotypes chosen
    /// by a generator seeded from `targ_hap` (and, if present, the window
    /// seed), rejecting the target haplotype itself. Each fallback state
    /// spans the whole window as a single segment.
    fn random_fallback(&mut self, targ_hap: usize, n_markers: usize, seed: Option<u64>) {
        let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0) ^ (targ_hap as u64).wrapping_mul(0x9E3779B97F4A7C15));

        let candidates: Vec<usize> = (0..self.n_ref_haps).filter(|&h| h != targ_hap).collect();
        let n_picks = self.k.min(candidates.len());
        let mut pool = candidates;
        pool.shuffle(&mut rng);

        for (slot, &hap) in pool.iter().take(n_picks).enumerate() {
            self.mosaics[slot].comp_hap.push(hap);
            self.mosaics[slot].comp_end.push(n_markers);
            self.queue.push(QueueEntry {
                last_step: 0,
                hap,
                start_marker: 0,
                slot,
            });
        }
    }
}
