use crate::errors::{fail, CoreError};

/// Per-window configuration supplied by the host.
///
/// Mirrors the "configuration" collaborator contract: a plain record with
/// at least `maxStates` and an optional RNG seed. The core never reads
/// configuration from a file or environment itself — that belongs to the
/// host CLI, which is out of scope here.
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// `K`: upper bound on the number of composite haplotypes built per
    /// target haplotype. Must be `>= 1`.
    pub max_states: usize,
    /// Seed for the random-fallback generator (§4.G). When absent, the
    /// fallback still seeds deterministically from the target haplotype
    /// index alone.
    pub seed: Option<u64>,
}

impl WindowConfig {
    pub fn new(max_states: usize, seed: Option<u64>) -> Self {
        let cfg = Self { max_states, seed };
        cfg.validate();
        cfg
    }

    /// Panics with [`CoreError::InvalidMaxStates`] if `max_states == 0`.
    pub fn validate(&self) {
        if self.max_states < 1 {
            fail(CoreError::InvalidMaxStates(self.max_states));
        }
    }
}
