//! Human-readable and on-disk renderings of a resolution.
pub mod report;

pub use report::{format_beliefs, solution_path, write_solution};
