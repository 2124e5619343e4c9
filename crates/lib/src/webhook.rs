//! Webhook transport: one authenticated JSON request per call, no retries.

use crate::error::Result;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Method;

/// Production webhook base URL.
pub const PRODUCTION_WEBHOOK_URL: &str = "https://api.weekday.sh/v1/webhook";
/// Development webhook base URL.
pub const DEVELOPMENT_WEBHOOK_URL: &str = "http://localhost:8181/v1/webhook";

/// HTTP client bound to a webhook base URL.
#[derive(Clone)]
pub struct Webhook {
    base_url: String,
    client: reqwest::Client,
}

impl Webhook {
    /// Build a client for `base_url` (trailing `/` trimmed). Redirects are
    /// followed and no `Referer` header is sent.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .referer(false)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base (`/a/b` or `a/b`).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform a single request and return the raw response.
    ///
    /// Network-level failure is `Err(Transport)`; any HTTP status, including
    /// non-2xx, is returned as `Ok` and left for the caller to inspect.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        log::debug!("webhook {} {}", method, url);
        let mut req = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .bearer_auth(token);
        if let Some(body) = body {
            req = req.body(serde_json::to_vec(body)?);
        }
        let res = req.send().await?;
        log::debug!("webhook {} {} -> {}", method, url, res.status());
        Ok(res)
    }
}
