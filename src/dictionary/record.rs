//! Entity records as they arrive from the dataset
//!
//! Each dataset line is one JSON object in the FollowTheMoney layout:
//!
//! ```json
//! {"id": "Q7747", "schema": "Person",
//!  "properties": {"name": ["Vladimir Putin"], "alias": ["Putin"]}}
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::automaton::EntityId;
use crate::error::RecordError;

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Option<String>,
    schema: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, Vec<String>>,
}

/// A parsed entity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: EntityId,
    /// Schema (type tag), e.g. `Person` or `Company`
    pub schema: String,
    /// Property name -> values
    pub properties: BTreeMap<String, Vec<String>>,
}

impl EntityRecord {
    pub fn new(id: impl Into<EntityId>, schema: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema: schema.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach property values
    pub fn with_property<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties
            .entry(name.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Parse one dataset line.
    pub fn from_json_line(line: &str) -> Result<Self, RecordError> {
        let raw: RawRecord = serde_json::from_str(line)?;
        let id = raw
            .id
            .filter(|id| !id.is_empty())
            .ok_or(RecordError::MissingField("id"))?;
        let schema = raw
            .schema
            .filter(|schema| !schema.is_empty())
            .ok_or(RecordError::MissingField("schema"))?;

        Ok(Self {
            id: EntityId::from(id),
            schema,
            properties: raw.properties,
        })
    }

    /// Values of one property (empty when absent)
    pub fn get(&self, property: &str) -> &[String] {
        self.properties
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let line = r#"{"id": "Q7747", "schema": "Person", "properties": {"name": ["Vladimir Putin"], "alias": ["Putin", "V. Putin"]}}"#;
        let record = EntityRecord::from_json_line(line).unwrap();
        assert_eq!(record.id.as_str(), "Q7747");
        assert_eq!(record.schema, "Person");
        assert_eq!(record.get("name"), ["Vladimir Putin".to_string()]);
        assert_eq!(record.get("alias").len(), 2);
        assert!(record.get("previousName").is_empty());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let line = r#"{"id": "x1", "schema": "Company", "caption": "ACME", "datasets": ["a"], "properties": {}}"#;
        assert!(EntityRecord::from_json_line(line).is_ok());
    }

    #[test]
    fn test_missing_properties_is_empty() {
        let record = EntityRecord::from_json_line(r#"{"id": "x1", "schema": "Company"}"#).unwrap();
        assert!(record.properties.is_empty());
    }

    #[test]
    fn test_missing_id() {
        let err = EntityRecord::from_json_line(r#"{"schema": "Person"}"#).unwrap_err();
        assert!(matches!(err, RecordError::MissingField("id")));
        let err = EntityRecord::from_json_line(r#"{"id": "", "schema": "Person"}"#).unwrap_err();
        assert!(matches!(err, RecordError::MissingField("id")));
    }

    #[test]
    fn test_missing_schema() {
        let err = EntityRecord::from_json_line(r#"{"id": "x1"}"#).unwrap_err();
        assert!(matches!(err, RecordError::MissingField("schema")));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EntityRecord::from_json_line("{not json").unwrap_err(),
            RecordError::Json(_)
        ));
        // Non-string property values make the record unusable
        assert!(matches!(
            EntityRecord::from_json_line(r#"{"id": "x", "schema": "Person", "properties": {"name": [1]}}"#)
                .unwrap_err(),
            RecordError::Json(_)
        ));
    }

    #[test]
    fn test_with_property() {
        let record = EntityRecord::new("e1", "Person")
            .with_property("name", ["Ivan Petrov"])
            .with_property("name", ["Ivan Petroff"]);
        assert_eq!(record.get("name").len(), 2);
    }
}
