pub mod config;
pub mod error;
pub mod optimizer;
pub mod results;
pub mod workload;
// cmd and reports belong to the binary crate (main.rs).

pub use error::{BalanceError, BalanceResult};
