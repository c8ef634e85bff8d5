use thiserror::Error;

/// Diagnostics for programmer-error ("contract violation") conditions.
///
/// Every variant here corresponds to a precondition called out in the core's
/// error handling design: wrong-sized inputs, out-of-range alleles, a
/// malformed `K`, or a `prefix`/`stepStart` array that isn't what it claims
/// to be. None of these are recoverable — callers are expected to fix the
/// caller, not catch the error — so every construction site immediately
/// logs the diagnostic and panics with it (see [`crate::errors::fail`]).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("nAlleles must be >= 1, got {0}")]
    InvalidAlleleCount(usize),

    #[error("alleles array length {got} does not match nHaps {want}")]
    AlleleLengthMismatch { got: usize, want: usize },

    #[error("observed allele {allele} at haplotype {hap} is out of range [0, {n_alleles})")]
    AlleleOutOfRange {
        hap: usize,
        allele: usize,
        n_alleles: usize,
    },

    #[error("prefix array length {got} does not match nHaps {want}")]
    PrefixLengthMismatch { got: usize, want: usize },

    #[error("prefix is not a permutation of [0, {n_haps}): {detail}")]
    NotAPermutation { n_haps: usize, detail: String },

    #[error("maxStates (K) must be >= 1, got {0}")]
    InvalidMaxStates(usize),

    #[error(
        "step index is malformed: {detail} (stepStart must start at 0, end at nMarkers, and be strictly increasing)"
    )]
    MalformedStepIndex { detail: String },
}

/// Logs `err` at `error!` and then panics with it.
///
/// This is the single choke point through which every contract violation in
/// the crate is reported, so the last log line a caller sees always matches
/// the panic message.
pub fn fail(err: CoreError) -> ! {
    log::error!("{err}");
    panic!("{err}");
}
