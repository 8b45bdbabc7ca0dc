//! Schema metadata for entity records
//!
//! Decides which records are legal entities (people, organizations) and
//! which of their properties hold matchable names. Schemata inherit both
//! facts through `extends`, the way the FollowTheMoney model does.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// What the dictionary builder needs to know about a record's schema
pub trait RecordSchema: Send + Sync {
    /// Whether records of `schema` should be indexed at all
    fn is_legal_entity(&self, schema: &str) -> bool;

    /// Properties of `schema` whose values are matchable names
    fn matchable_name_properties(&self, schema: &str) -> &[String];
}

/// Declarative schema model, loadable from configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SchemaModel {
    /// Schema that indexable records must descend from
    #[serde(default = "default_legal_entity")]
    pub legal_entity: String,
    pub schemata: BTreeMap<String, SchemaDef>,
}

/// A single schema definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SchemaDef {
    /// Parent schemata
    #[serde(default)]
    pub extends: Vec<String>,
    /// Matchable name properties declared on this schema
    #[serde(default)]
    pub matchable_names: Vec<String>,
}

fn default_legal_entity() -> String {
    "LegalEntity".to_string()
}

impl Default for SchemaModel {
    /// The FollowTheMoney schemata that matter for name matching.
    ///
    /// `weakAlias` is a name property but not matchable, so it is left out.
    fn default() -> Self {
        let defs: &[(&str, &[&str], &[&str])] = &[
            ("Thing", &[], &["name", "alias", "previousName"]),
            ("LegalEntity", &["Thing"], &[]),
            ("Person", &["LegalEntity"], &[]),
            ("Organization", &["LegalEntity"], &[]),
            ("Company", &["Organization", "Asset"], &[]),
            ("PublicBody", &["Organization"], &[]),
            ("Asset", &["Thing"], &[]),
            ("Vehicle", &["Asset"], &[]),
            ("Vessel", &["Vehicle"], &[]),
            ("Airplane", &["Vehicle"], &[]),
            ("Address", &["Thing"], &[]),
        ];

        let schemata = defs
            .iter()
            .map(|(name, extends, names)| {
                (
                    name.to_string(),
                    SchemaDef {
                        extends: extends.iter().map(|s| s.to_string()).collect(),
                        matchable_names: names.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect();

        Self {
            legal_entity: default_legal_entity(),
            schemata,
        }
    }
}

impl SchemaModel {
    /// Whether `schema` is `ancestor` or inherits from it
    pub fn is_a(&self, schema: &str, ancestor: &str) -> bool {
        self.ancestors(schema).iter().any(|s| s == ancestor)
    }

    /// `schema` followed by all its ancestors, depth-first, each once.
    /// Unknown schemata have no ancestors and yield an empty list.
    pub fn ancestors(&self, schema: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![schema.to_string()];

        while let Some(name) = stack.pop() {
            let Some(def) = self.schemata.get(&name) else {
                continue;
            };
            if !seen.insert(name.clone()) {
                continue;
            }
            stack.extend(def.extends.iter().rev().cloned());
            out.push(name);
        }

        out
    }

    /// Matchable name properties of `schema`, inherited ones included
    pub fn name_properties(&self, schema: &str) -> Vec<String> {
        let mut props: Vec<String> = Vec::new();
        for name in self.ancestors(schema) {
            if let Some(def) = self.schemata.get(&name) {
                for prop in &def.matchable_names {
                    if !props.contains(prop) {
                        props.push(prop.clone());
                    }
                }
            }
        }
        props
    }

    /// Resolve inheritance once for every schema.
    pub fn index(&self) -> SchemaIndex {
        let resolved = self
            .schemata
            .keys()
            .map(|name| {
                (
                    name.clone(),
                    ResolvedSchema {
                        legal_entity: self.is_a(name, &self.legal_entity),
                        name_properties: self.name_properties(name),
                    },
                )
            })
            .collect();

        SchemaIndex { resolved }
    }
}

#[derive(Debug, Clone)]
struct ResolvedSchema {
    legal_entity: bool,
    name_properties: Vec<String>,
}

/// Schema model with inheritance resolved, ready for per-record lookups
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    resolved: HashMap<String, ResolvedSchema>,
}

impl Default for SchemaIndex {
    fn default() -> Self {
        SchemaModel::default().index()
    }
}

impl RecordSchema for SchemaIndex {
    fn is_legal_entity(&self, schema: &str) -> bool {
        self.resolved
            .get(schema)
            .map(|s| s.legal_entity)
            .unwrap_or(false)
    }

    fn matchable_name_properties(&self, schema: &str) -> &[String] {
        self.resolved
            .get(schema)
            .map(|s| s.name_properties.as_slice())
            .unwrap_or(&[])
    }
}
