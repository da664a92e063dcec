//! Ticket form to routing article resolution
//!
//! Each ticket-submission form has exactly one help-center article holding the
//! routing rules for tickets created through it. The table is loaded once from
//! configuration (or the built-in defaults) and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Help-center site and article that encode routing rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleReference {
    pub subdomain: String,
    pub article_id: String,
}

/// One configured form → article mapping
///
/// Fields are private; instances come from deserialization or [`FormArticle::new`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormArticle {
    form_id: String,
    subdomain: String,
    article_id: String,
}

impl FormArticle {
    pub fn new(
        form_id: impl Into<String>,
        subdomain: impl Into<String>,
        article_id: impl Into<String>,
    ) -> Self {
        Self {
            form_id: form_id.into(),
            subdomain: subdomain.into(),
            article_id: article_id.into(),
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    pub fn article_id(&self) -> &str {
        &self.article_id
    }
}

/// Forms known out of the box, used when the config has no `[[forms]]` section
pub fn builtin_form_articles() -> Vec<FormArticle> {
    [
        // ACRM
        ("360001529340", "support.acrm.aurea.com", "360020118499"),
        // Influitive
        ("15690572875666", "support.influitive.com", "15883286599058"),
        // Alpha
        (
            "10746755231378",
            "alpha-school-support.zendesk.com",
            "11998839408786",
        ),
        // CFIN
        ("8982987496978", "central-finance.zendesk.com", "9081827578130"),
        // Crossover
        ("360000071353", "support.crossover.com", "360008529373"),
        // FogBugz
        ("360000337594", "support.fogbugz.com", "360013086800"),
        // Kandy
        ("10791313891474", "supportportal.kandy.io", "11713628235922"),
        // Skyvera Monetization and CxM
        (
            "10855255360274",
            "skyvera-monetization.zendesk.com",
            "16268337936914",
        ),
        // PeerApp
        ("17348612826386", "support.skyvera.com", "360013199420"),
    ]
    .into_iter()
    .map(|(form_id, subdomain, article_id)| FormArticle::new(form_id, subdomain, article_id))
    .collect()
}

/// Immutable lookup from form id to article reference
#[derive(Debug, Clone, Default)]
pub struct FormArticleMap {
    entries: HashMap<String, ArticleReference>,
}

impl FormArticleMap {
    /// Build the lookup table from configured entries
    ///
    /// Duplicate form ids are rejected by `Config::validate`; if one slips
    /// through, the last entry wins.
    pub fn new(forms: &[FormArticle]) -> Self {
        let entries = forms
            .iter()
            .map(|form| {
                (
                    form.form_id.clone(),
                    ArticleReference {
                        subdomain: form.subdomain.clone(),
                        article_id: form.article_id.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Exact-match lookup on the string form of the id
    ///
    /// `None` means routing rules are unavailable for this form; the caller
    /// decides how to fail.
    pub fn resolve(&self, form_id: &str) -> Option<&ArticleReference> {
        self.entries.get(form_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
