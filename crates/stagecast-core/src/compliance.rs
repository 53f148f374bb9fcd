//! Content compliance check for generated copy.

use serde::Serialize;

const RESTRICTED_TERMS: [&str; 4] = ["medical claim", "cure", "treat disease", "fda approved"];
const HERITAGE_TERMS: [&str; 3] = ["indigenous", "first nations", "traditional"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComplianceReport {
    pub compliant: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub content_length: usize,
}

/// Flag restricted health claims and suggest heritage context when it is missing.
pub fn check_compliance(content: &str) -> ComplianceReport {
    let lower = content.to_lowercase();

    let issues: Vec<String> = RESTRICTED_TERMS
        .iter()
        .filter(|term| lower.contains(*term))
        .map(|term| format!("Restricted term: \"{}\"", term))
        .collect();

    let mut suggestions = Vec::new();
    if !HERITAGE_TERMS.iter().any(|term| lower.contains(term)) {
        suggestions.push("Consider adding indigenous heritage context".to_string());
    }

    ComplianceReport {
        compliant: issues.is_empty(),
        issues,
        suggestions,
        content_length: content.chars().count(),
    }
}
