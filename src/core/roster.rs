use crate::models::{
    normalize_name, previous_match_column, Person, RawRow, PREVIOUS_MATCH_COLUMNS,
    SITE_COLUMN, STAFF_NAME_COLUMN, TEAM_COLUMN,
};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while normalizing roster rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Malformed roster row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

/// Normalized, indexed roster for one matching run
#[derive(Debug, Clone, Default)]
pub struct RosterModel {
    people: Vec<Person>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl RosterModel {
    /// Build a roster, failing on the first row without a usable name.
    ///
    /// Row numbers in errors are 0-based positions in `rows`.
    pub fn build(rows: &[RawRow]) -> Result<Self, RosterError> {
        let mut roster = Self::default();
        for (row, raw) in rows.iter().enumerate() {
            let person = person_from_row(row, raw)?;
            roster.insert(person);
        }
        Ok(roster)
    }

    /// Build a roster, skipping rows without a usable name.
    ///
    /// Returns the roster and the positions of the skipped rows.
    pub fn build_lenient(rows: &[RawRow]) -> (Self, Vec<usize>) {
        let mut roster = Self::default();
        let mut skipped = Vec::new();
        for (row, raw) in rows.iter().enumerate() {
            match person_from_row(row, raw) {
                Ok(person) => roster.insert(person),
                Err(e) => {
                    tracing::warn!("Skipping roster row: {}", e);
                    skipped.push(row);
                }
            }
        }
        (roster, skipped)
    }

    /// Build directly from already-normalized people (row order kept)
    pub fn from_people(people: impl IntoIterator<Item = Person>) -> Self {
        let mut roster = Self::default();
        for person in people {
            roster.insert(person);
        }
        roster
    }

    fn insert(&mut self, person: Person) {
        let key = person.key();
        if self.index.contains_key(&key) {
            tracing::warn!("Duplicate roster entry for '{}', keeping the first row", person.name);
            self.duplicates.push(person.name);
            return;
        }
        self.index.insert(key, self.people.len());
        self.people.push(person);
    }

    /// People in roster row order
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Look up a person by any spelling of their name
    pub fn get(&self, name: &str) -> Option<&Person> {
        self.index
            .get(&normalize_name(name))
            .map(|&i| &self.people[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&normalize_name(name))
    }

    /// Names of rows dropped because their identity was already present
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

fn cell<'a>(raw: &'a RawRow, column: &str) -> &'a str {
    raw.get(column).map(|v| v.trim()).unwrap_or("")
}

fn person_from_row(row: usize, raw: &RawRow) -> Result<Person, RosterError> {
    let name = cell(raw, STAFF_NAME_COLUMN);
    if name.is_empty() {
        return Err(RosterError::MalformedRow {
            row,
            reason: format!("missing or empty '{}'", STAFF_NAME_COLUMN),
        });
    }

    let mut person = Person::new(name, cell(raw, TEAM_COLUMN), cell(raw, SITE_COLUMN));
    for i in 1..=PREVIOUS_MATCH_COLUMNS {
        person = person.with_past_partner(cell(raw, &previous_match_column(i)));
    }

    Ok(person)
}
