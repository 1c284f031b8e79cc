//! Page-level metadata signals supplied alongside blocks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePriority {
    High,
    Medium,
    Low,
}

/// Optional metadata about a page. Every field defaults to "no signal".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSignals {
    pub has_unique_content: bool,
    pub has_cms_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    pub duplicate_content: bool,
    pub manual_noindex: bool,
    pub manual_index: bool,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PagePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_citations: Option<u32>,
}

impl PageSignals {
    pub fn is_featured(&self) -> bool {
        self.featured || self.priority == Some(PagePriority::High)
    }

    pub fn engagement_at_least(&self, threshold: f64) -> bool {
        self.engagement_score.is_some_and(|score| score >= threshold)
    }

    pub fn citations_at_least(&self, threshold: u32) -> bool {
        self.external_citations.is_some_and(|count| count >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_no_signal() {
        let signals: PageSignals = serde_json::from_value(serde_json::json!({
            "manualIndex": true,
            "priority": "high"
        }))
        .expect("signals should parse");
        assert!(signals.manual_index);
        assert!(signals.is_featured());
        assert!(!signals.has_cms_content);
        assert!(!signals.engagement_at_least(0.8));
        assert!(!signals.citations_at_least(3));
    }
}
