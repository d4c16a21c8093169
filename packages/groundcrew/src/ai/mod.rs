//! LLM implementations.
//!
//! Reference implementation of the `LanguageModel` trait. Users can use it
//! directly or implement their own.

mod openai;

pub use openai::OpenAiModel;
