use serde::{Deserialize, Deserializer, Serialize};

use crate::history::{self, HistoryEntry, RunSummary};

/// A dataflow record as returned by the data service.
///
/// Field names follow the wire format; the payload fields are opaque strings
/// that are only ever displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Dataflow {
    #[serde(rename = "msdyn_dataflowid", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "msdyn_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "msdyn_description")]
    pub description: Option<String>,
    #[serde(rename = "modifiedon")]
    pub modified_on: Option<String>,
    #[serde(rename = "createdon")]
    pub created_on: Option<String>,
    #[serde(rename = "_ownerid_value@OData.Community.Display.V1.FormattedValue")]
    pub owner: Option<String>,
    #[serde(rename = "msdyn_refreshhistory")]
    pub refresh_history: Option<String>,
    #[serde(rename = "msdyn_mashupdocument")]
    pub mashup_document: Option<String>,
    #[serde(rename = "msdyn_mashupsettings")]
    pub mashup_settings: Option<String>,
    #[serde(rename = "msdyn_refreshsettings")]
    pub refresh_settings: Option<String>,
    #[serde(rename = "msdyn_emailsettings")]
    pub email_settings: Option<String>,
    #[serde(rename = "msdyn_gatewayobjectid")]
    pub gateway_object_id: Option<String>,
    #[serde(rename = "msdyn_internalversion")]
    pub internal_version: Option<String>,
    #[serde(rename = "msdyn_originaldataflowid")]
    pub original_dataflow_id: Option<String>,
    #[serde(rename = "msdyn_destinationadls")]
    pub destination_adls: Option<bool>,
    #[serde(rename = "msdyn_destinationadls@OData.Community.Display.V1.FormattedValue")]
    pub destination_adls_label: Option<String>,
}

// The service sends `null` rather than omitting unset columns.
fn null_as_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(d).map(Option::unwrap_or_default)
}

/// One page of an OData collection response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ODataPage {
    #[serde(rename = "value", default)]
    pub records: Vec<Dataflow>,
    /// Continuation URL for the following page.
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    /// Total matching records. Only the first page of a query carries it.
    #[serde(rename = "@odata.count")]
    pub count: Option<u64>,
}

/// A dataflow together with its normalized refresh history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataflowView {
    pub record: Dataflow,
    pub history: Vec<HistoryEntry>,
    pub summary: RunSummary,
}

impl DataflowView {
    pub fn new(record: Dataflow) -> Self {
        let history = history::normalize_for(&record.name, record.refresh_history.as_deref());
        let summary = RunSummary::from_history(&history);
        Self {
            record,
            history,
            summary,
        }
    }

    /// Whether `key` names this dataflow, by exact id or case-insensitive name.
    pub fn matches(&self, key: &str) -> bool {
        self.record.id == key || self.record.name.eq_ignore_ascii_case(key)
    }
}
