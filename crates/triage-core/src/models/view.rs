use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Triage list views. Every view except `Hidden` excludes hidden groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Active,
    Hidden,
    Seen,
    Unseen,
    Mine,
    Unclaimed,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Active,
        View::Hidden,
        View::Seen,
        View::Unseen,
        View::Mine,
        View::Unclaimed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Active => "active",
            View::Hidden => "hidden",
            View::Seen => "seen",
            View::Unseen => "unseen",
            View::Mine => "mine",
            View::Unclaimed => "unclaimed",
        }
    }

    /// Whether the view's predicate depends on who is looking.
    pub fn uses_viewer(self) -> bool {
        matches!(self, View::Seen | View::Unseen | View::Mine)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidField {
                field: "view",
                reason: format!("unknown view '{s}'"),
            })
    }
}
