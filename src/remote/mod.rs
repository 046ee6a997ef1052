pub mod http;
pub mod odata;
pub mod token;
pub mod worker;

use crate::model::ODataPage;

/// Source of bearer tokens for the data service.
pub trait TokenProvider: Send {
    /// # Errors
    ///
    /// Returns an error if no token can be obtained.
    fn access_token(&self) -> anyhow::Result<String>;
}

/// Fetches one page of dataflows.
pub trait DataFetcher: Send {
    /// Fetch the page at `url`, authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, answers with a
    /// non-success status, or returns a body that is not an OData page.
    fn fetch(&self, token: &str, url: &str) -> anyhow::Result<ODataPage>;
}

impl<T: TokenProvider + ?Sized> TokenProvider for Box<T> {
    fn access_token(&self) -> anyhow::Result<String> {
        (**self).access_token()
    }
}

impl<F: DataFetcher + ?Sized> DataFetcher for Box<F> {
    fn fetch(&self, token: &str, url: &str) -> anyhow::Result<ODataPage> {
        (**self).fetch(token, url)
    }
}

/// Stand-in used when no service is configured: every call fails, which
/// drives the dashboard into its sample-data fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl TokenProvider for Unconfigured {
    fn access_token(&self) -> anyhow::Result<String> {
        anyhow::bail!("no token endpoint configured (set DFTRACK_TOKEN_URL or --token-url)")
    }
}

impl DataFetcher for Unconfigured {
    fn fetch(&self, _token: &str, _url: &str) -> anyhow::Result<ODataPage> {
        anyhow::bail!("no data service configured (set DFTRACK_BASE_URL or --base-url)")
    }
}

/// Obtain a fresh token and fetch the page at `url` with it.
///
/// # Errors
///
/// Propagates the token provider's or the fetcher's error.
pub fn load_page(
    tokens: &dyn TokenProvider,
    fetcher: &dyn DataFetcher,
    url: &str,
) -> anyhow::Result<ODataPage> {
    let token = tokens.access_token()?;
    fetcher.fetch(&token, url)
}

/// Consume a response and return it if the status is successful.
///
/// On 401 Unauthorized, returns an error pointing at the token endpoint.
/// On other non-2xx statuses, includes the response body in the error message.
///
/// # Errors
///
/// Returns an error for any non-2xx status code.
pub(crate) fn require_success(
    what: &str,
    resp: reqwest::blocking::Response,
) -> anyhow::Result<reqwest::blocking::Response> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        anyhow::bail!(
            "{what} returned HTTP 401 Unauthorized: check that the token endpoint issues tokens for this service"
        );
    }
    if !status.is_success() {
        let text = resp
            .text()
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        anyhow::bail!("{what} returned HTTP {status}: {text}");
    }
    Ok(resp)
}
