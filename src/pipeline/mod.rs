pub mod runner;

pub use runner::{RunError, RunOutcome, Runner};
