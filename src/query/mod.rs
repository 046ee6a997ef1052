//! OData request construction for the dataflow collection.

/// Fields requested for every dataflow.
pub const DATAFLOW_FIELDS: [&str; 15] = [
    "msdyn_dataflowid",
    "msdyn_name",
    "modifiedon",
    "createdon",
    "msdyn_mashupdocument",
    "msdyn_description",
    "msdyn_destinationadls",
    "msdyn_emailsettings",
    "msdyn_gatewayobjectid",
    "msdyn_internalversion",
    "msdyn_mashupsettings",
    "msdyn_originaldataflowid",
    "msdyn_refreshhistory",
    "msdyn_refreshsettings",
    "_ownerid_value",
];

/// Records per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const ACTIVE_ONLY: &str = "statecode eq 0";
const ORDER_BY: &str = "msdyn_name asc";
const OWNER_EXPAND: &str = "owninguser($select=fullname)";

/// A fully-formed collection query, independent of the service base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub select: String,
    /// Predicates joined with `and`; always starts with the active-only check.
    pub filter: String,
    pub count: bool,
    pub top: u32,
    pub order_by: String,
    /// Navigation property to expand, present only when filtering by owner.
    pub expand: Option<String>,
}

impl QueryDescriptor {
    /// Query parameters in the order they are sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("$select", self.select.clone()),
            ("$filter", self.filter.clone()),
            ("$count", self.count.to_string()),
            ("$top", self.top.to_string()),
            ("$orderby", self.order_by.clone()),
        ];
        if let Some(expand) = &self.expand {
            params.push(("$expand", expand.clone()));
        }
        params
    }

    /// The percent-encoded query string, without a leading `?`.
    pub fn query_string(&self) -> String {
        self.params()
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full request URL against the collection at `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!(
            "{}?{}",
            base_url.trim_end_matches(['?', '/']),
            self.query_string()
        )
    }
}

/// Double single quotes so `text` can sit inside an OData string literal.
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// Build the dataflow query for the given search inputs.
///
/// `name_filter` matches name or description; `owner_filter` matches the
/// owning user's full name and pulls in the owner relation so the filter can
/// reference it. Empty inputs add no predicate. Never fails.
pub fn build_query(name_filter: &str, owner_filter: &str, page_size: u32) -> QueryDescriptor {
    let mut predicates = vec![ACTIVE_ONLY.to_string()];

    if !name_filter.is_empty() {
        let safe = escape_literal(name_filter);
        predicates.push(format!(
            "(contains(msdyn_name, '{safe}') or contains(msdyn_description, '{safe}'))"
        ));
    }

    let expand = if owner_filter.is_empty() {
        None
    } else {
        let safe = escape_literal(owner_filter);
        predicates.push(format!("contains(owninguser/fullname, '{safe}')"));
        Some(OWNER_EXPAND.to_string())
    };

    QueryDescriptor {
        select: DATAFLOW_FIELDS.join(","),
        filter: predicates.join(" and "),
        count: true,
        top: page_size.max(1),
        order_by: ORDER_BY.to_string(),
        expand,
    }
}

#[cfg(test)]
mod tests;
