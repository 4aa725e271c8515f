//! DTOs shaped for the lead list and lead form templates.

use serde::Serialize;

use crate::domain::lead::{Lead, LeadSource, LeadStatus};
use crate::domain::query::QueryState;
use crate::forms::filter::FilterForm;
use crate::forms::lead::LeadForm;
use crate::pagination::PageLinks;
use crate::services::controller::{FetchStatus, ListView};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

fn source_options() -> Vec<SelectOption> {
    LeadSource::ALL
        .into_iter()
        .map(|source| SelectOption {
            value: source.as_str(),
            label: source.label(),
        })
        .collect()
}

fn status_options() -> Vec<SelectOption> {
    LeadStatus::ALL
        .into_iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

/// One table row.
#[derive(Debug, Serialize)]
pub struct LeadRow {
    #[serde(flatten)]
    pub lead: Lead,
    pub full_name: String,
    pub status_label: String,
}

impl From<Lead> for LeadRow {
    fn from(lead: Lead) -> Self {
        Self {
            full_name: lead.full_name(),
            status_label: lead.status.as_str().to_uppercase(),
            lead,
        }
    }
}

/// Data required to render `leads/index.html`.
#[derive(Debug, Serialize)]
pub struct LeadsPageData {
    pub rows: Vec<LeadRow>,
    pub pager: PageLinks,
    /// Current filter values for refilling the filter panel.
    pub filters: FilterForm,
    pub active_filters: Vec<String>,
    pub status: FetchStatus,
    pub sources: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
}

impl LeadsPageData {
    pub fn new(view: ListView, query: &QueryState) -> Self {
        Self {
            rows: view.rows.into_iter().map(LeadRow::from).collect(),
            pager: PageLinks::new(&view.pagination),
            filters: FilterForm::from_descriptor(&query.filters),
            active_filters: query.filters.summary(),
            status: view.status,
            sources: source_options(),
            statuses: status_options(),
        }
    }
}

/// Data required to render `leads/form.html`.
#[derive(Debug, Serialize)]
pub struct LeadFormPageData {
    pub form: LeadForm,
    /// Present when editing an existing lead.
    pub lead_id: Option<String>,
    pub error: Option<String>,
    pub sources: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
}

impl LeadFormPageData {
    pub fn new(form: LeadForm, lead_id: Option<String>, error: Option<String>) -> Self {
        Self {
            form,
            lead_id,
            error,
            sources: source_options(),
            statuses: status_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_expose_name_and_upper_case_status() {
        let lead: Lead = serde_json::from_value(json!({
            "id": "a1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@x.com",
            "status": "qualified"
        }))
        .unwrap();

        let row = serde_json::to_value(LeadRow::from(lead)).unwrap();

        assert_eq!(row["full_name"], json!("Ada Lovelace"));
        assert_eq!(row["status_label"], json!("QUALIFIED"));
        assert_eq!(row["id"], json!("a1"));
        assert_eq!(row["email"], json!("ada@x.com"));
    }
}
