pub mod crossover;
pub mod distribution;
pub mod mutation;
pub mod population;
pub mod ranking;
pub mod runner;

// Re-export specific structs for easier access
pub use self::distribution::{Distribution, GroupOrder};
pub use self::population::Population;
pub use self::ranking::{BucketRanking, BucketTotal, Order};
pub use self::runner::{
    EvolutionOptions, GenerationStats, Optimizer, ProgressCallback, Silent, TrialResult,
};
