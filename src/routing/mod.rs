//! Routing-rule extraction from help-center articles
//!
//! Articles are hand-authored HTML, so extraction uses two strategies:
//!
//! - [`table`]: the first `<table>` in the article, one rule per row
//!   (first cell = key, second cell = value). Used whenever a table exists.
//! - [`keyword`]: free-text fallback, only when the article has no table.
//!   Lines mentioning a routing keyword become rules.
//!
//! Both strategies are deterministic; there is no scoring or NLP involved.

pub mod keyword;
pub mod table;

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use scraper::Html;
use std::fmt;

/// Which strategy produced a routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    Table,
    Keyword,
}

impl ExtractionStrategy {
    /// Convert to string representation for logging and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Keyword => "keyword",
        }
    }
}

/// Routing rules extracted from one article
///
/// Keys are unique; iteration order is the order of first appearance in the
/// article. A later duplicate key overwrites the value but keeps the original
/// position. A successfully extracted table is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    entries: IndexMap<String, String>,
    strategy: ExtractionStrategy,
}

impl RoutingTable {
    fn new(entries: IndexMap<String, String>, strategy: ExtractionStrategy) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::NoRoutingInfoFound);
        }
        Ok(Self { entries, strategy })
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rules in article order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Renders one `key: value` line per rule, in article order
impl fmt::Display for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

/// Extract routing rules from an article's HTML body
///
/// If the article contains a table, only the first table is consulted and the
/// keyword fallback is never attempted, even when that table yields no rows.
///
/// # Errors
/// `AppError::NoRoutingInfoFound` when the strategy that ran produced nothing.
pub fn parse_routing_information(html: &str) -> AppResult<RoutingTable> {
    let fragment = Html::parse_fragment(html);

    if let Some(entries) = table::extract_first_table(&fragment) {
        tracing::debug!(
            entries = entries.len(),
            "Routing table found in article, keyword fallback skipped"
        );
        return RoutingTable::new(entries, ExtractionStrategy::Table);
    }

    let entries = keyword::extract_keyword_lines(&fragment);
    tracing::debug!(
        entries = entries.len(),
        "No table in article, used keyword fallback"
    );
    RoutingTable::new(entries, ExtractionStrategy::Keyword)
}
