pub mod cli;
pub mod config;
pub mod notify;
pub mod pipeline;
pub mod source;
pub mod storage;
