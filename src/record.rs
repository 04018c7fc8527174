//! Record types - the single entity kept in the registry
//!
//! A `Record` is a named user identified by a store-assigned integer id.
//! Write operations that target an id report a `WriteOutcome` instead of
//! silently succeeding when no row matched.

use serde::{Deserialize, Serialize};

/// A single user entry.
///
/// `id` is assigned by the store on creation and never changes. `name` may be
/// empty at the storage layer; emptiness is only rejected by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
}

impl Record {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Label shown in list views, e.g. `1 : Mostapha`
    pub fn label(&self) -> String {
        format!("{} : {}", self.id, self.name)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of an update or delete that targets a single id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Exactly one row matched and was written
    Applied,
    /// No row has that id; nothing changed
    NotFound,
}

impl WriteOutcome {
    /// Map an affected-row count to an outcome
    pub fn from_affected(rows: usize) -> Self {
        if rows == 0 {
            WriteOutcome::NotFound
        } else {
            WriteOutcome::Applied
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Applied => "applied",
            WriteOutcome::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_label() {
        let record = Record::new(1, "Mostapha");
        assert_eq!(record.label(), "1 : Mostapha");
        assert_eq!(record.to_string(), "1 : Mostapha");
    }

    #[test]
    fn test_outcome_from_affected() {
        assert_eq!(WriteOutcome::from_affected(0), WriteOutcome::NotFound);
        assert_eq!(WriteOutcome::from_affected(1), WriteOutcome::Applied);
        assert!(!WriteOutcome::NotFound.is_applied());
    }

    #[test]
    fn test_record_json() {
        let record = Record::new(2, "Amine");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 2, "name": "Amine" }));
        assert_eq!(serde_json::to_value(WriteOutcome::NotFound).unwrap(), "not_found");
    }
}
