use std::fmt;

use super::{TokenProvider, require_success};

/// Obtains a plain-text bearer token by POSTing to a trigger endpoint.
///
/// The endpoint expects a JSON body (an empty object is enough) and answers
/// with the raw token as `text/plain`.
pub struct HttpTokenProvider {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTokenProvider {
    pub const fn new(client: reqwest::blocking::Client, url: String) -> Self {
        Self { client, url }
    }
}

// The endpoint URL usually embeds a signature; keep it out of debug output.
impl fmt::Debug for HttpTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTokenProvider")
            .field("url", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TokenProvider for HttpTokenProvider {
    fn access_token(&self) -> anyhow::Result<String> {
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({}))
            .send()
            .map_err(|e| anyhow::anyhow!("could not reach token endpoint: {e}"))?;
        let resp = require_success("token endpoint", resp)?;
        let token = resp
            .text()
            .map_err(|e| anyhow::anyhow!("could not read token response: {e}"))?;
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("received an empty access token");
        }
        Ok(token.to_string())
    }
}
