pub mod upload;

/// Readiness probe. Clients poll this before their first upload instead of
/// guessing at startup timing.
pub async fn healthz() -> &'static str {
    "ok"
}
