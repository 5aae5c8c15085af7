//! Mock model backend for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::ModelClient;

/// A configurable canned response for [`MockModel`].
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Return this text as the reply.
    Text(String),
    /// Simulate a model-call failure with this description.
    Error(String),
}

/// A hand-rolled mock implementing [`ModelClient`] for tests. Records the
/// prompts it was called with and counts calls.
pub struct MockModel {
    reply: MockReply,
    call_count: AtomicUsize,
    last_prompt: std::sync::Mutex<Option<String>>,
}

impl MockModel {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            call_count: AtomicUsize::new(0),
            last_prompt: std::sync::Mutex::new(None),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self::new(MockReply::Error(error.into()))
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

impl ModelClient for MockModel {
    fn name(&self) -> &str {
        "Mock"
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        _client: &'a reqwest::Client,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        let reply = self.reply.clone();
        Box::pin(async move {
            match reply {
                MockReply::Text(text) => Ok(text),
                MockReply::Error(error) => Err(error),
            }
        })
    }
}
