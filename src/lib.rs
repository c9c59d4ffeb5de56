// review-translator - Bad review translator HTTP service
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod server;
pub mod store;
pub mod translation;
pub mod utils;
