//! Flat named parameter tables
//!
//! Model parameterizations arrive as a flat mapping from parameter names to
//! numeric values, typically one row of a tabular file whose column headers
//! are the parameter names, or a TOML table of scalars. The table is the
//! handoff point between external loaders and the validated parameter
//! structures in [`crate::pools`]: lookups of absent keys fail with
//! [`SOCMError::MissingParameter`] so a misspelled or dropped column
//! surfaces before any numerics run.

use crate::errors::{SOCMError, SOCMResult};
use crate::trajectory::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flat mapping of named numeric parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTable {
    values: BTreeMap<String, FloatValue>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from name/value pairs.
    pub fn from_pairs<N, I>(pairs: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, FloatValue)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Build a table from a header row and a matching value row.
    ///
    /// This is the in-memory form of the one-row parameter files produced
    /// by external loaders.
    pub fn from_row<S: AsRef<str>>(names: &[S], values: &[FloatValue]) -> SOCMResult<Self> {
        if names.len() != values.len() {
            return Err(SOCMError::Parse(format!(
                "header row has {} names but value row has {} values",
                names.len(),
                values.len()
            )));
        }
        Ok(Self::from_pairs(
            names
                .iter()
                .map(|name| name.as_ref().to_string())
                .zip(values.iter().copied()),
        ))
    }

    /// Parse a table from TOML text containing only numeric scalars.
    pub fn from_toml_str(text: &str) -> SOCMResult<Self> {
        let values: BTreeMap<String, FloatValue> =
            toml::from_str(text).map_err(|e| SOCMError::Parse(e.to_string()))?;
        Ok(Self { values })
    }

    /// Insert or overwrite a single parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: FloatValue) {
        self.values.insert(name.into(), value);
    }

    /// Look up a required parameter.
    pub fn get(&self, name: &str) -> SOCMResult<FloatValue> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| SOCMError::MissingParameter(name.to_string()))
    }

    /// Look up an optional parameter, falling back to a default.
    pub fn get_or(&self, name: &str, default: FloatValue) -> FloatValue {
        self.values.get(name).copied().unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FloatValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_present_and_missing() {
        let table = ParameterTable::from_pairs([("tau_fast", 12.0), ("input_rate", 0.26)]);

        assert_eq!(table.get("tau_fast").unwrap(), 12.0);
        let err = table.get("tau_slow").unwrap_err();
        assert!(
            matches!(err, SOCMError::MissingParameter(ref name) if name == "tau_slow"),
            "expected MissingParameter, got {err:?}"
        );
    }

    #[test]
    fn test_get_or_default() {
        let table = ParameterTable::from_pairs([("input_rate", 0.26)]);
        assert_eq!(table.get_or("input_rate", 1.0), 0.26);
        assert_eq!(table.get_or("phase", 0.0), 0.0);
    }

    #[test]
    fn test_from_row() {
        let table =
            ParameterTable::from_row(&["tau_fast", "tau_slow"], &[12.0, 50.0]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("tau_slow").unwrap(), 50.0);

        let err = ParameterTable::from_row(&["tau_fast"], &[12.0, 50.0]).unwrap_err();
        assert!(matches!(err, SOCMError::Parse(_)));
    }

    #[test]
    fn test_from_toml() {
        let table = ParameterTable::from_toml_str(
            r#"
            tau_fast = 12.0
            tau_slow = 50
            input_rate = 0.26
            "#,
        )
        .unwrap();

        assert_eq!(table.get("tau_fast").unwrap(), 12.0);
        // Integers are accepted as numeric parameters
        assert_eq!(table.get("tau_slow").unwrap(), 50.0);
    }

    #[test]
    fn test_from_toml_rejects_non_numeric() {
        let err = ParameterTable::from_toml_str(r#"name = "century""#).unwrap_err();
        assert!(matches!(err, SOCMError::Parse(_)));
    }

    #[test]
    fn test_serialization_round_trip() {
        let table = ParameterTable::from_pairs([("tau_fast", 12.0)]);
        let json = serde_json::to_string(&table).expect("Serialization failed");
        let parsed: ParameterTable = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(parsed, table);
    }
}
