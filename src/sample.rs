use crate::model::Dataflow;

/// Built-in records shown when the data service cannot be reached.
const SAMPLE_JSON: &str = include_str!("../sample/dataflows.json");

/// The built-in sample dataset.
///
/// Returns an empty list (and logs) if the embedded document does not parse.
pub fn dataflows() -> Vec<Dataflow> {
    serde_json::from_str(SAMPLE_JSON).unwrap_or_else(|e| {
        tracing::error!("embedded sample dataset is invalid: {e}");
        Vec::new()
    })
}
