use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends a prepared request. Wrappers layer headers on top; tests swap in
/// canned responses.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
