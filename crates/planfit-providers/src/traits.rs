//! Text generator traits

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::ProviderError;

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, ProviderError>;

/// Stream of generated text chunks, in arrival order
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// Trait for text-generation clients
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and get the complete generated text
    async fn generate(&self, prompt: &str) -> GeneratorResult<String>;

    /// Send a prompt and get a streaming response
    async fn generate_stream(&self, prompt: &str) -> GeneratorResult<TextStream>;

    /// Get the model identifier
    fn model(&self) -> &str;

    /// Get the provider name
    fn provider(&self) -> &str;
}
