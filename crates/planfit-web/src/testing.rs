//! Test doubles for the plan generation path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;

use planfit_providers::{GeneratorResult, ProviderError, TextGenerator, TextStream};

/// A [`TextGenerator`] that replays a configured response.
pub struct MockGenerator {
    response_text: String,
    delay: Option<Duration>,
    error: Mutex<Option<ProviderError>>,
    call_count: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response_text: response.to_string(),
            delay: None,
            error: Mutex::new(None),
            call_count: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_error(self, error: ProviderError) -> Self {
        *self.error.lock().unwrap() = Some(error);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    async fn begin_call(&self, prompt: &str) -> Option<ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        // ProviderError is not Clone, so error mode is single-use
        self.error.lock().unwrap().take()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> GeneratorResult<String> {
        if let Some(error) = self.begin_call(prompt).await {
            return Err(error);
        }
        Ok(self.response_text.clone())
    }

    async fn generate_stream(&self, prompt: &str) -> GeneratorResult<TextStream> {
        if let Some(error) = self.begin_call(prompt).await {
            return Err(error);
        }

        // Split the response so consumers exercise chunk accumulation.
        let text = self.response_text.clone();
        let mid = (0..=text.len() / 2)
            .rev()
            .find(|i| text.is_char_boundary(*i))
            .unwrap_or(0);
        let (head, tail) = text.split_at(mid);
        let chunks: Vec<GeneratorResult<String>> =
            vec![Ok(head.to_string()), Ok(tail.to_string())];
        Ok(Box::pin(stream::iter(chunks)))
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn provider(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_returns_configured_response() {
        let generator = MockGenerator::new("Hello from mock");
        let response = generator.generate("prompt").await.unwrap();

        assert_eq!(response, "Hello from mock");
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.last_prompt().as_deref(), Some("prompt"));

        let _ = generator.generate("again").await.unwrap();
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_error_mode_is_single_use() {
        let generator = MockGenerator::new("ignored")
            .with_error(ProviderError::InvalidResponse("test error".to_string()));

        let result = generator.generate("prompt").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("test error"));

        let result = generator.generate("prompt").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mock_stream_reassembles_to_response() {
        let generator = MockGenerator::new("streamed text");
        let mut stream = generator.generate_stream("prompt").await.unwrap();

        let mut text = String::new();
        let mut chunks = 0;
        while let Some(chunk) = stream.next().await {
            text.push_str(&chunk.unwrap());
            chunks += 1;
        }

        assert_eq!(text, "streamed text");
        assert!(chunks > 1, "response should arrive in multiple chunks");
    }
}
