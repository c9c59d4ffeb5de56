// Generation API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::ChatCompletionClient;

use crate::error::Result;
use async_trait::async_trait;

/// Anything that turns one instruction into generated text.
///
/// The HTTP handler only talks to this trait so tests can swap in a
/// deterministic implementation.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
