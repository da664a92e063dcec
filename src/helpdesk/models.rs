//! Helpdesk API payload types
//!
//! Every field that the helpdesk may omit is decoded as optional with an
//! explicit default, so a sparse payload never fails to decode. Resource ids
//! are accepted as JSON numbers or strings and normalized to strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `GET /api/v2/tickets/{id}.json`
#[derive(Debug, Clone, Deserialize)]
pub struct TicketEnvelope {
    pub ticket: TicketPayload,
}

/// Raw ticket as returned by the helpdesk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPayload {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomField>>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub requester_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub group_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub ticket_form_id: Option<String>,
}

/// Helpdesk-defined key/value extension attached to a ticket
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomField {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl CustomField {
    /// The field value when it is a JSON string
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// `GET /api/v2/users/{id}.json`
#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: NamedResource,
}

/// `GET /api/v2/groups/{id}.json`
#[derive(Debug, Clone, Deserialize)]
pub struct GroupEnvelope {
    pub group: NamedResource,
}

/// The subset of a user or group record the triage flow needs
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /api/v2/help_center/articles/{id}.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleEnvelope {
    pub article: ArticlePayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticlePayload {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Help-center article content handed to the routing extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: Option<String>,
    /// Rendered HTML body
    pub body: String,
}

/// Accept `123`, `"123"` or `null`; an empty string is treated as absent
fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a numeric or string id, got {}",
            other
        ))),
    }
}
