use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Column holding a person's identity
pub const STAFF_NAME_COLUMN: &str = "Staff Name";
/// Column holding a person's team
pub const TEAM_COLUMN: &str = "Team #";
/// Column holding a person's site
pub const SITE_COLUMN: &str = "Site";
/// Number of "Previous match #N" history columns read per row
pub const PREVIOUS_MATCH_COLUMNS: usize = 5;

/// One spreadsheet row, keyed by column header
pub type RawRow = HashMap<String, String>;

/// Header of the N-th (1-based) history column
pub fn previous_match_column(index: usize) -> String {
    format!("Previous match #{}", index)
}

/// Canonical identity key for a name: trimmed and lowercased.
///
/// Every place that compares names (roster index, history lookup,
/// forced-pair reservation, used-set) goes through this function.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A roster member, normalized from one spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Display name as entered, trimmed
    pub name: String,
    pub team: String,
    pub site: String,
    /// Normalized names of previous partners
    pub past_partners: HashSet<String>,
}

impl Person {
    pub fn new(name: &str, team: &str, site: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            team: team.trim().to_string(),
            site: site.trim().to_string(),
            past_partners: HashSet::new(),
        }
    }

    /// Builder-style helper to record a previous partner
    pub fn with_past_partner(mut self, partner: &str) -> Self {
        let key = normalize_name(partner);
        if !key.is_empty() {
            self.past_partners.insert(key);
        }
        self
    }

    /// Identity key of this person
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether `other_key` (already normalized) is recorded as a past partner
    #[inline]
    pub fn has_met(&self, other_key: &str) -> bool {
        self.past_partners.contains(other_key)
    }
}

/// Operator-mandated pairing, taken verbatim from the forced-pair text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedPair {
    pub first: String,
    pub second: String,
}

impl ForcedPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// One output row: a pair, or a single person when `second` is `None`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub first: String,
    pub second: Option<String>,
}

impl Assignment {
    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: Some(second.into()),
        }
    }

    pub fn unmatched(first: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        self.second.is_none()
    }

    /// Whether this assignment names `name` on either side (any spelling)
    pub fn involves(&self, name: &str) -> bool {
        let key = normalize_name(name);
        normalize_name(&self.first) == key
            || self
                .second
                .as_deref()
                .is_some_and(|second| normalize_name(second) == key)
    }
}

impl From<&ForcedPair> for Assignment {
    fn from(pair: &ForcedPair) -> Self {
        Assignment::pair(pair.first.clone(), pair.second.clone())
    }
}

/// Ordered outcome of one matching run.
///
/// Layout: forced pairs (input order), matched pairs (matching order),
/// unmatched singles (scan order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    assignments: Vec<Assignment>,
    forced: usize,
    matched: usize,
}

impl AssignmentResult {
    pub fn assemble(
        forced: Vec<Assignment>,
        matched: Vec<Assignment>,
        unmatched: Vec<Assignment>,
    ) -> Self {
        let forced_len = forced.len();
        let matched_len = matched.len();
        let mut assignments = forced;
        assignments.extend(matched);
        assignments.extend(unmatched);

        Self {
            assignments,
            forced: forced_len,
            matched: matched_len,
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn forced(&self) -> &[Assignment] {
        &self.assignments[..self.forced]
    }

    pub fn matched(&self) -> &[Assignment] {
        &self.assignments[self.forced..self.forced + self.matched]
    }

    pub fn unmatched(&self) -> &[Assignment] {
        &self.assignments[self.forced + self.matched..]
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of assignments naming `name` (any spelling)
    pub fn occurrences(&self, name: &str) -> usize {
        self.assignments.iter().filter(|a| a.involves(name)).count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.occurrences(name) > 0
    }
}

impl<'a> IntoIterator for &'a AssignmentResult {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Pairing strategy for the non-forced pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// First-fit, single pass, no backtracking
    #[default]
    Greedy,
    /// Maximum-cardinality matching over the eligibility graph
    Maximum,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Maximum => write!(f, "maximum"),
        }
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "maximum" | "max" => Ok(Self::Maximum),
            other => Err(format!("unknown match strategy: {}", other)),
        }
    }
}

/// File format of the downloadable pairing sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Excel workbook with a single "Matches" sheet
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}
