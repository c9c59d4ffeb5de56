//! Utility functions and helpers for the review translator.
//!
//! - `logging`: Tracing initialization and secret redaction for logged
//!   upstream error bodies.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
