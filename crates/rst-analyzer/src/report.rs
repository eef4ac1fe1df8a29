//! The structured report produced by [`crate::analyze`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inventory of the RST constructs used by one document.
///
/// Serialises to the JSON shape printed by `rst2md --report`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    /// Directive name → occurrences.
    pub directives: BTreeMap<String, usize>,
    /// Interpreted-text role → occurrences. Bare `` `text` `` counts as
    /// `title_reference`.
    pub roles: BTreeMap<String, usize>,
    /// Admonition kind → occurrences.
    pub admonitions: BTreeMap<String, usize>,
    /// Section titles in document order.
    pub sections: Vec<Section>,
    /// Element kinds outside the ordinary set, in first-seen order.
    pub custom_elements: Vec<String>,
}

/// Totals derived from the detailed tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_directives: usize,
    pub unique_directives: usize,
    pub total_raw_html: usize,
    pub total_admonitions: usize,
    pub total_sections: usize,
}

/// One section title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// Nesting depth, 1 for top-level sections. RST has no fixed adornment
    /// per level: the first style seen is level 1, the next new one level 2,
    /// and so on.
    pub level: usize,
}

impl Report {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
