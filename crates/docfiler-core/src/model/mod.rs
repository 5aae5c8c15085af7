//! Generative-model client trait and implementations.

pub mod gemini;
pub mod mock;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use gemini::GeminiClient;

/// A generative model that turns a prompt into raw reply text.
///
/// The reply carries no schema guarantee; callers that need structure run it
/// through [`crate::reply::parse_reply`]. Errors are plain strings: the relay
/// folds them into the reply text rather than propagating a fault.
pub trait ModelClient: Send + Sync {
    /// The canonical name of this model backend (e.g., "Gemini").
    fn name(&self) -> &str;

    /// Generate a reply for the given prompt.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;
}
