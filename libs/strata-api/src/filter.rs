use serde::{Deserialize, Serialize};

/// Typed value of a filter predicate.
///
/// Whatever the declared kind, the stored form is the string rendering:
/// the filter map column is text→text and is never decoded back into a
/// structured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl FilterValue {
    /// String form written into the filter map and matched on scans.
    pub fn storage_repr(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Int(i) => i.to_string(),
            FilterValue::Bool(b) => b.to_string(),
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.storage_repr())
    }
}

/// Named equality predicate attached to a record.
///
/// Scans AND together every supplied predicate. There is no range,
/// prefix or OR matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub value: FilterValue,
}

impl Filter {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: FilterValue::Text(value.into()) }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self { name: name.into(), value: FilterValue::Int(value) }
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self { name: name.into(), value: FilterValue::Bool(value) }
    }

    /// (name, stored value) entry for the filter map column.
    pub fn map_entry(&self) -> (String, String) {
        (self.name.clone(), self.value.storage_repr())
    }
}
