//! Input validation and status normalization.
//!
//! Provides O(1) validation sets and synonym maps so callers can use
//! natural language for pipeline statuses. Three-tier resolution:
//! exact match → synonym lookup → error with suggestion.

use crate::error::{Error, Result};
use crate::model::{OpportunityDraft, Status};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// ── Synonym maps ─────────────────────────────────────────────

pub static STATUS_SYNONYMS: LazyLock<HashMap<&str, Status>> = LazyLock::new(|| {
    [
        ("new", Status::Reception),
        ("inbox", Status::Reception),
        ("intake", Status::Reception),
        ("analysis", Status::Analyse),
        ("analyzing", Status::Analyse),
        ("proposal", Status::Proposition),
        ("offer", Status::Proposition),
        ("review", Status::Validation),
        ("won", Status::ClotureGagne),
        ("win", Status::ClotureGagne),
        ("gagne", Status::ClotureGagne),
        ("lost", Status::CloturePerdu),
        ("lose", Status::CloturePerdu),
        ("perdu", Status::CloturePerdu),
    ]
    .into_iter()
    .collect()
});

/// Closing an opportunity requires an explicit won/lost choice; these
/// inputs name the closed column without making it.
static AMBIGUOUS_CLOSED: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    ["cloture", "closed", "close", "done", "finished"]
        .into_iter()
        .collect()
});

/// Normalize a status string via exact match or synonym lookup.
///
/// Inputs that name the closed column without choosing won or lost
/// ("closed", "cloture") are rejected with a hint to pick one.
///
/// # Errors
///
/// Returns [`Error::InvalidStatus`] with an optional suggestion.
pub fn normalize_status(input: &str) -> Result<Status> {
    let lower = input.to_lowercase();

    // Tier 1: exact match
    if let Some(status) = Status::parse(&lower) {
        return Ok(status);
    }

    // Tier 2: synonym lookup
    if let Some(&status) = STATUS_SYNONYMS.get(lower.as_str()) {
        return Ok(status);
    }

    if AMBIGUOUS_CLOSED.contains(lower.as_str()) {
        return Err(Error::InvalidStatus {
            input: input.to_string(),
            suggestion: Some("cloture_gagne (won) or cloture_perdu (lost)".to_string()),
        });
    }

    // Tier 3: find closest suggestion
    let suggestion = find_closest_status(&lower);
    Err(Error::InvalidStatus {
        input: input.to_string(),
        suggestion,
    })
}

/// Find the closest matching status across canonical names and synonyms.
fn find_closest_status(input: &str) -> Option<String> {
    let mut best: Option<(String, usize)> = None;

    let canonical = Status::ALL.iter().map(|s| (s.as_str(), *s));
    let synonyms = STATUS_SYNONYMS.iter().map(|(k, v)| (*k, *v));

    for (name, status) in canonical.chain(synonyms) {
        let dist = levenshtein_distance(input, name);
        if dist <= 3 && best.as_ref().is_none_or(|(_, d)| dist < *d) {
            // For synonyms, show the canonical status they map to
            best = Some((status.as_str().to_string(), dist));
        }
    }

    best.map(|(s, _)| s)
}

// ── Field validation ─────────────────────────────────────────

/// Validate a draft before inserting it.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] for empty names,
/// [`Error::InvalidArgument`] for a negative budget or an
/// unparseable deadline.
pub fn validate_draft(draft: &OpportunityDraft) -> Result<()> {
    require_non_empty("client name", &draft.client_name)?;
    require_non_empty("project name", &draft.project_name)?;
    validate_budget(draft.budget)?;
    validate_deadline(&draft.deadline)?;
    Ok(())
}

/// Require a non-empty, non-whitespace value.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] naming the field.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::RequiredField(field));
    }
    Ok(())
}

/// Budgets are never negative.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for negative or non-finite values.
pub fn validate_budget(budget: f64) -> Result<()> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "budget must be a non-negative number, got {budget}"
        )));
    }
    Ok(())
}

/// Deadlines are ISO dates (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the date does not parse.
pub fn validate_deadline(deadline: &str) -> Result<()> {
    chrono::NaiveDate::parse_from_str(deadline, "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!("deadline must be YYYY-MM-DD, got '{deadline}'"))
    })?;
    Ok(())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find existing IDs similar to the searched ID.
///
/// Returns up to `max` suggestions with edit distance ≤ 3,
/// sorted by distance then alphabetically.
#[must_use]
pub fn find_similar_ids(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| (levenshtein_distance(searched, id), id.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max)
        .map(|(_, id)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> OpportunityDraft {
        OpportunityDraft {
            client_name: "Acme".to_string(),
            project_name: "Portal".to_string(),
            budget: 5000.0,
            deadline: "2025-01-01".to_string(),
            needs: "CRM integration".to_string(),
            technologies: vec!["React".to_string()],
            status: Status::Reception,
        }
    }

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status("reception").unwrap(), Status::Reception);
        assert_eq!(normalize_status("ANALYSE").unwrap(), Status::Analyse);
        assert_eq!(normalize_status("won").unwrap(), Status::ClotureGagne);
        assert_eq!(normalize_status("lost").unwrap(), Status::CloturePerdu);
        assert!(normalize_status("nonsense").is_err());
    }

    #[test]
    fn test_closing_requires_won_or_lost() {
        for input in ["cloture", "closed", "done"] {
            match normalize_status(input) {
                Err(Error::InvalidStatus { suggestion, .. }) => {
                    assert!(suggestion.unwrap().contains("cloture_gagne"));
                }
                other => panic!("expected InvalidStatus for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_typo_gets_suggestion() {
        match normalize_status("recepton") {
            Err(Error::InvalidStatus { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("reception"));
            }
            other => panic!("expected InvalidStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_draft() {
        assert!(validate_draft(&draft()).is_ok());

        let mut d = draft();
        d.client_name = "  ".to_string();
        assert!(matches!(validate_draft(&d), Err(Error::RequiredField("client name"))));

        let mut d = draft();
        d.budget = -1.0;
        assert!(validate_draft(&d).is_err());

        let mut d = draft();
        d.deadline = "01/01/2025".to_string();
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar_ids() {
        let ids = vec![
            "avv_a1b2".to_string(),
            "avv_a1b3".to_string(),
            "avv_xxxx".to_string(),
        ];
        let result = find_similar_ids("avv_a1b1", &ids, 3);
        assert!(!result.is_empty());
        assert!(result.contains(&"avv_a1b2".to_string()));
    }
}
