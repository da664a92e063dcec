//! Ticket field extraction
//!
//! Flattens a raw helpdesk ticket into the fields the rest of the triage flow
//! uses. Extraction never fails: absent fields fall back to empty values.

use crate::helpdesk::TicketPayload;
use std::fmt;

/// Custom-field values that mark a field as carrying the issue type
const ISSUE_TYPE_MARKERS: [&str; 2] = ["issue_type", "problem_type"];

/// Issue type resolved from the ticket's custom fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IssueType {
    Known(String),
    #[default]
    Unknown,
}

impl IssueType {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(label) => f.write_str(label),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Ticket fields needed downstream
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketInfo {
    pub subject: String,
    pub description: String,
    /// Tags in the order the helpdesk returned them
    pub tags: Vec<String>,
    pub issue_type: IssueType,
    pub requester_id: Option<String>,
    pub group_id: Option<String>,
    pub form_id: Option<String>,
}

impl TicketInfo {
    /// Extract the triage fields from a raw ticket
    ///
    /// Issue type: the first custom field whose *value* equals `issue_type`
    /// or `problem_type` (case-insensitively) supplies the issue type. This
    /// compares the value, not the field's identifier, so real tickets almost
    /// always end up with [`IssueType::Unknown`]. Kept as-is; see DESIGN.md.
    pub fn extract(ticket: &TicketPayload) -> Self {
        let issue_type = ticket
            .custom_fields
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|field| field.value_str())
            .find(|value| {
                ISSUE_TYPE_MARKERS
                    .iter()
                    .any(|marker| value.eq_ignore_ascii_case(marker))
            })
            .map(|value| IssueType::Known(value.to_string()))
            .unwrap_or_default();

        Self {
            subject: ticket.subject.clone().unwrap_or_default(),
            description: ticket.description.clone().unwrap_or_default(),
            tags: ticket.tags.clone().unwrap_or_default(),
            issue_type,
            requester_id: ticket.requester_id.clone(),
            group_id: ticket.group_id.clone(),
            form_id: ticket.ticket_form_id.clone(),
        }
    }
}
