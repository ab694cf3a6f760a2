use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that sets a fixed header on every request.
pub struct WithHeader<C> {
    pub inner: C,
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl<C> WithHeader<C> {
    /// Asks caches between us and the API to revalidate, so each run sees
    /// the latest published snapshot.
    pub fn no_cache(inner: C) -> Self {
        Self {
            inner,
            name: CACHE_CONTROL,
            value: HeaderValue::from_static("no-cache"),
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for WithHeader<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(self.name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}
