pub mod composite_builder;
pub mod materializer;
pub mod parallel;

pub use composite_builder::{CompositeHaplotypeBuilder, Mosaic};
pub use materializer::ImpStates;
pub use parallel::par_materialize_cohort;
