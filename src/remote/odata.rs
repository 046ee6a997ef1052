use super::{DataFetcher, require_success};
use crate::model::ODataPage;

/// `Prefer` value asking the service to include formatted-value annotations
/// (owner display name, option-set labels).
const PREFER_ANNOTATIONS: &str = "odata.include-annotations=\"*\"";

/// Fetches dataflow pages from an OData v4 endpoint.
#[derive(Debug, Clone)]
pub struct ODataClient {
    client: reqwest::blocking::Client,
}

impl ODataClient {
    pub const fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl DataFetcher for ODataClient {
    fn fetch(&self, token: &str, url: &str) -> anyhow::Result<ODataPage> {
        tracing::debug!(url, "fetching dataflow page");
        let resp = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0")
            .header("Prefer", PREFER_ANNOTATIONS)
            .send()
            .map_err(|e| anyhow::anyhow!("could not reach data service: {e}"))?;
        let resp = require_success("data service", resp)?;
        resp.json::<ODataPage>()
            .map_err(|e| anyhow::anyhow!("invalid response from data service: {e}"))
    }
}
