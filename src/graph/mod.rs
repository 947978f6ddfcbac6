//! Defines the core data structures for the unrolled network.
pub mod dag;
pub mod node;
pub mod storage;

// Re-export key types for convenient access
pub use dag::BayesNet;
pub use node::{Cpt, LocationId, NodeKey, SensorId};
pub use storage::NodeId;
