//! Data models for the review translator API.
//!
//! - `review`: inbound request, outbound result and trial status bodies.
//! - `chat`: wire types for the upstream chat-completion endpoint.

// Author: kelexine (https://github.com/kelexine)

pub mod chat;
pub mod review;

pub use chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use review::{
    Language, Perspectives, SourceCategory, TranslationRequest, TranslationResult, TrialStatus,
};
