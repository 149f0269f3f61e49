pub mod tracker;

pub use tracker::{ProgressTracker, ProgressTrackerBuilder, global_multi_progress};
