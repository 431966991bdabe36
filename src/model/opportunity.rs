//! Opportunity model: one pre-sales (avant-vente) record.
//!
//! Opportunities move through a five-stage pipeline and close as
//! either won or lost. Every tracked-field change is mirrored into
//! the history table by the storage layer.

use serde::{Deserialize, Serialize};

/// Pipeline status of an opportunity.
///
/// `reception → analyse → proposition → validation` and then one of
/// the two closed states. Transitions are not constrained by the
/// store; any status may be set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Reception,
    Analyse,
    Proposition,
    Validation,
    ClotureGagne,
    CloturePerdu,
}

impl Status {
    /// All statuses in pipeline order.
    pub const ALL: [Status; 6] = [
        Status::Reception,
        Status::Analyse,
        Status::Proposition,
        Status::Validation,
        Status::ClotureGagne,
        Status::CloturePerdu,
    ];

    /// Storage/display string for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reception => "reception",
            Self::Analyse => "analyse",
            Self::Proposition => "proposition",
            Self::Validation => "validation",
            Self::ClotureGagne => "cloture_gagne",
            Self::CloturePerdu => "cloture_perdu",
        }
    }

    /// Human-readable column label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Reception => "Reception",
            Self::Analyse => "Analysis",
            Self::Proposition => "Proposal",
            Self::Validation => "Validation",
            Self::ClotureGagne => "Closed (won)",
            Self::CloturePerdu => "Closed (lost)",
        }
    }

    /// Parse an exact status string as stored in the database.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reception" => Some(Self::Reception),
            "analyse" => Some(Self::Analyse),
            "proposition" => Some(Self::Proposition),
            "validation" => Some(Self::Validation),
            "cloture_gagne" => Some(Self::ClotureGagne),
            "cloture_perdu" => Some(Self::CloturePerdu),
            _ => None,
        }
    }

    /// Whether this is one of the two closed states.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::ClotureGagne | Self::CloturePerdu)
    }

    /// Whether records in this status are protected from deletion.
    ///
    /// Enforced at the CLI boundary, not in the store.
    #[must_use]
    pub const fn is_delete_protected(&self) -> bool {
        matches!(self, Self::Validation) || self.is_closed()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pre-sales opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Unique identifier (`avv_` prefix)
    pub id: String,

    /// Client (account) name
    pub client_name: String,

    /// Project name
    pub project_name: String,

    /// Estimated budget; never negative
    pub budget: f64,

    /// Deadline as an ISO date string (`YYYY-MM-DD`)
    pub deadline: String,

    /// Free-text description of the client's needs
    pub needs: String,

    /// Ordered list of technologies involved
    pub technologies: Vec<String>,

    /// Pipeline status
    pub status: Status,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl Opportunity {
    /// Technologies joined for display and history comparison.
    ///
    /// The history table stores old/new values as display strings;
    /// lists compare as their comma-joined form.
    #[must_use]
    pub fn technologies_display(&self) -> String {
        self.technologies.join(",")
    }

    /// Budget formatted the way history rows store it.
    #[must_use]
    pub fn budget_display(&self) -> String {
        display_budget(self.budget)
    }
}

/// Budget display string: integral budgets print without a decimal
/// point ("5000", not "5000.0").
#[must_use]
pub fn display_budget(budget: f64) -> String {
    format!("{budget}")
}

/// Input for creating a new opportunity; id and timestamps are
/// generated by the store.
#[derive(Debug, Clone)]
pub struct OpportunityDraft {
    pub client_name: String,
    pub project_name: String,
    pub budget: f64,
    pub deadline: String,
    pub needs: String,
    pub technologies: Vec<String>,
    pub status: Status,
}

/// Partial update of an opportunity's tracked fields.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct OpportunityPatch {
    pub client_name: Option<String>,
    pub project_name: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<String>,
    pub needs: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub status: Option<Status>,
}

impl OpportunityPatch {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.project_name.is_none()
            && self.budget.is_none()
            && self.deadline.is_none()
            && self.needs.is_none()
            && self.technologies.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("nonsense"), None);
    }

    #[test]
    fn test_delete_protection() {
        assert!(!Status::Reception.is_delete_protected());
        assert!(!Status::Proposition.is_delete_protected());
        assert!(Status::Validation.is_delete_protected());
        assert!(Status::ClotureGagne.is_delete_protected());
        assert!(Status::CloturePerdu.is_delete_protected());
    }

    #[test]
    fn test_display_budget_integral() {
        assert_eq!(display_budget(5000.0), "5000");
        assert_eq!(display_budget(1234.5), "1234.5");
        assert_eq!(display_budget(0.0), "0");
    }

    #[test]
    fn test_serde_status_naming() {
        let json = serde_json::to_string(&Status::ClotureGagne).unwrap();
        assert_eq!(json, "\"cloture_gagne\"");
    }
}
