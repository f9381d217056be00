pub mod checkpoint;

pub use checkpoint::{current_utc_offset, Checkpoint, CheckpointError, CheckpointStore};
